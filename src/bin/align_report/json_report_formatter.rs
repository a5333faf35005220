use kata_align::report::Report;

pub fn render_report(report: &Report) -> Result<String, String> {
    let mut rendered = serde_json::to_string_pretty(report)
        .map_err(|err| format!("Failed to serialize report JSON: {err}"))?;
    rendered.push('\n');
    Ok(rendered)
}
