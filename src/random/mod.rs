//! Random identifiers and weighted selection

use rand::Rng;

/// Default length of [`generate_base58_id`] output
pub const DEFAULT_BASE58_LENGTH: usize = 8;

/// Base58 alphabet: digits and letters without `0`, `O`, `I` and `l`
pub const BASE58_ALPHABET: &[u8; 58] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Generate a random Base58 string of `length` characters
///
/// Characters are drawn uniformly from the thread-local CSPRNG.
///
/// # Example
///
/// ```rust
/// use helperbox::random::{generate_base58_id, DEFAULT_BASE58_LENGTH};
///
/// let id = generate_base58_id(DEFAULT_BASE58_LENGTH);
/// assert_eq!(id.len(), 8);
/// ```
pub fn generate_base58_id(length: usize) -> String {
    generate_base58_id_with(&mut rand::rng(), length)
}

/// Same as [`generate_base58_id`] with an explicit generator
pub fn generate_base58_id_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(BASE58_ALPHABET[rng.random_range(0..BASE58_ALPHABET.len())]))
        .collect()
}

/// Pick a key with probability proportional to its weight
///
/// Draws one number in `1..=sum` and subtracts weights in order until the
/// remainder drops to zero. Returns `None` when the weights sum to zero.
///
/// # Example
///
/// ```rust
/// use helperbox::random::get_random_weighted_element;
///
/// let only = [("a", 0), ("b", 5)];
/// assert_eq!(get_random_weighted_element(&only), Some(&"b"));
/// assert_eq!(get_random_weighted_element::<&str>(&[]), None);
/// ```
pub fn get_random_weighted_element<K>(weights: &[(K, u64)]) -> Option<&K> {
    get_random_weighted_element_with(&mut rand::rng(), weights)
}

/// Same as [`get_random_weighted_element`] with an explicit generator
pub fn get_random_weighted_element_with<'a, K, R>(
    rng: &mut R,
    weights: &'a [(K, u64)],
) -> Option<&'a K>
where
    R: Rng + ?Sized,
{
    let total = weights
        .iter()
        .try_fold(0_u64, |sum, (_, weight)| sum.checked_add(*weight))?;
    if total == 0 {
        return None;
    }

    let mut remaining = rng.random_range(1..=total);
    for (key, weight) in weights {
        if remaining <= *weight {
            return Some(key);
        }
        remaining -= weight;
    }
    None
}
