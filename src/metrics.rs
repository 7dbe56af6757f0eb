//! Evaluation metrics
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MetricError {
    #[error("{refs} references but {hyps} hypotheses")]
    LengthMismatch { refs: usize, hyps: usize },
    #[error("no references")]
    Empty,
}

/// Fraction of hypotheses exactly equal to their reference.
///
/// # Example
/// ```
/// use seq2tree::metrics::exact_match;
///
/// let refs = [vec!["a", "b"], vec!["c"]];
/// let hyps = [vec!["a", "b"], vec!["d"]];
/// assert_eq!(exact_match(&refs, &hyps), Ok(0.5));
/// ```
///
/// # Errors
/// If `refs` and `hyps` have different lengths or are empty.
#[allow(clippy::cast_precision_loss)]
pub fn exact_match<T: PartialEq>(refs: &[T], hyps: &[T]) -> Result<f64, MetricError> {
    if refs.len() != hyps.len() {
        return Err(MetricError::LengthMismatch {
            refs: refs.len(),
            hyps: hyps.len(),
        });
    }
    if refs.is_empty() {
        return Err(MetricError::Empty);
    }
    let matches = refs.iter().zip(hyps).filter(|(r, h)| r == h).count();
    Ok(matches as f64 / refs.len() as f64)
}
