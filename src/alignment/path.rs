use crate::alignment::similarity::SimilarityMatrix;
use crate::types::AlignmentEdge;

/// Global (Needleman-Wunsch style) alignment over a similarity matrix.
///
/// Each cell `(i, j)` of the score table is reached by one of three moves:
/// 1. diagonal: align source `i-1` with target `j-1`, gaining the matrix score
/// 2. skip a source token, paying `skip_penalty`
/// 3. skip a target token, paying `skip_penalty`
///
/// The backtrace re-derives the winning move with that same priority order and
/// only diagonal moves emit edges, so the returned path is strictly increasing
/// in both indices.
pub fn global_alignment_path(matrix: &SimilarityMatrix, skip_penalty: f64) -> Vec<AlignmentEdge> {
    let s_len = matrix.rows();
    let t_len = matrix.cols();
    if s_len == 0 || t_len == 0 {
        return Vec::new();
    }

    let width = t_len + 1;
    let mut dp = vec![f64::NEG_INFINITY; (s_len + 1) * width];
    dp[0] = 0.0;

    for i in 0..=s_len {
        for j in 0..=t_len {
            let mut best = dp[i * width + j];
            if i > 0 && j > 0 {
                best = best.max(dp[(i - 1) * width + j - 1] + matrix.get(i - 1, j - 1));
            }
            if i > 0 {
                best = best.max(dp[(i - 1) * width + j] - skip_penalty);
            }
            if j > 0 {
                best = best.max(dp[i * width + j - 1] - skip_penalty);
            }
            dp[i * width + j] = best;
        }
    }

    let mut path = Vec::with_capacity(s_len.min(t_len));
    let (mut i, mut j) = (s_len, t_len);
    while i > 0 || j > 0 {
        let here = dp[i * width + j];
        if i > 0 && j > 0 && here == dp[(i - 1) * width + j - 1] + matrix.get(i - 1, j - 1) {
            path.push(AlignmentEdge {
                source: i - 1,
                target: j - 1,
                confidence: matrix.get(i - 1, j - 1),
            });
            i -= 1;
            j -= 1;
        } else if i > 0 && here == dp[(i - 1) * width + j] - skip_penalty {
            i -= 1;
        } else if j > 0 && here == dp[i * width + j - 1] - skip_penalty {
            j -= 1;
        } else {
            // No predecessor reproduces this cell; only reachable with non-finite scores.
            tracing::warn!(i, j, "alignment backtrace stopped early");
            break;
        }
    }

    path.reverse();
    tracing::debug!(
        source_len = s_len,
        target_len = t_len,
        edges = path.len(),
        score = dp[s_len * width + t_len],
        "alignment: global path"
    );
    path
}
