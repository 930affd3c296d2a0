use rand::Rng;

use crate::error::QuizError;

/// Deal `round_count` distinct items from `catalog` in uniformly random order.
///
/// Runs a partial Fisher-Yates pass over a copy of the catalog, so every
/// ordered selection is equally likely. When `round_count` equals the catalog
/// size the result is a full permutation.
pub fn build_session<T, R>(catalog: &[T], round_count: usize, rng: &mut R) -> Result<Vec<T>, QuizError>
where
    T: Clone,
    R: Rng + ?Sized,
{
    if catalog.is_empty() {
        return Err(QuizError::config("catalog is empty"));
    }
    if round_count > catalog.len() {
        return Err(QuizError::config(format!(
            "{round_count} rounds requested but catalog only has {} items",
            catalog.len()
        )));
    }

    let mut items = catalog.to_vec();
    for i in 0..round_count {
        let j = rng.gen_range(i..items.len());
        items.swap(i, j);
    }
    items.truncate(round_count);
    Ok(items)
}
