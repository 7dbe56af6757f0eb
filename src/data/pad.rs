//! Padding variable-length sequences to a common length.
use ndarray::Array2;

/// Right-pad every sequence with `pad_id` to the length of the longest sequence.
///
/// # Example
/// ```
/// use seq2tree::data::pad_sents;
///
/// let padded = pad_sents(&[vec![1, 2, 3], vec![4]], 0);
/// assert_eq!(padded, vec![vec![1, 2, 3], vec![4, 0, 0]]);
/// ```
pub fn pad_sents<T: Clone>(sents: &[Vec<T>], pad_id: T) -> Vec<Vec<T>> {
    let max_len = sents.iter().map(Vec::len).max().unwrap_or(0);
    sents
        .iter()
        .map(|sent| {
            let mut padded = Vec::with_capacity(max_len);
            padded.extend_from_slice(sent);
            padded.resize(max_len, pad_id.clone());
            padded
        })
        .collect()
}

/// Pad sequences into a `[num_sents, max_len]` array.
pub fn pad_to_array<T: Clone>(sents: &[Vec<T>], pad_id: T) -> Array2<T> {
    let max_len = sents.iter().map(Vec::len).max().unwrap_or(0);
    Array2::from_shape_fn((sents.len(), max_len), |(i, j)| {
        sents[i].get(j).cloned().unwrap_or_else(|| pad_id.clone())
    })
}
