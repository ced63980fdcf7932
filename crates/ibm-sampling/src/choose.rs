//! Uniform sampling of `k` elements without replacement.

use ibm_core::{IbmError, IbmResult};
use rand::Rng;

/// Return `k` distinct positions of `collection`, chosen uniformly, in the
/// order they were drawn.
///
/// `k > collection.len()` fails with `InvalidParameter`.  (A negative `k` is
/// unrepresentable.)
pub fn choose<T, R>(collection: &[T], k: usize, rng: &mut R) -> IbmResult<Vec<T>>
where
    T: Clone,
    R: Rng + ?Sized,
{
    if k > collection.len() {
        return Err(IbmError::InvalidParameter(format!(
            "cannot choose {k} elements from a collection of {}",
            collection.len()
        )));
    }
    Ok(rand::seq::index::sample(rng, collection.len(), k)
        .into_iter()
        .map(|i| collection[i].clone())
        .collect())
}
