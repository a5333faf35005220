use thiserror::Error;

/// Failures surfaced by engine construction, preference storage and translation
/// providers. Alignment itself never fails; malformed tokens degrade instead.
#[derive(Debug, Error)]
pub enum AlignmentError {
    /// Reading a config, dictionary or settings file.
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    /// A config, dictionary, settings or provider payload that is not valid JSON.
    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// Raised by a translation provider; `context` names the provider stage.
    #[error("{context} failed: {message}")]
    Runtime {
        context: &'static str,
        message: String,
    },
    /// Well-formed input with an unusable value, such as an unknown color scheme
    /// or a zero cache capacity.
    #[error("invalid {context}: {message}")]
    InvalidInput {
        context: &'static str,
        message: String,
    },
}

impl AlignmentError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub fn runtime(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Runtime {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(context: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            context,
            message: message.into(),
        }
    }
}
