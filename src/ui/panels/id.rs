//! Panel identifiers

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Characters identifiers are drawn from.
pub const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length used when the caller does not ask for one.
pub const DEFAULT_ID_LENGTH: usize = 8;

/// Identifier of a panel inside a stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PanelId(String);

impl PanelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Draws a random identifier of `length` characters (or the default length).
    pub fn random<R: Rng + ?Sized>(rng: &mut R, length: Option<usize>) -> Self {
        let length = length.unwrap_or(DEFAULT_ID_LENGTH);
        let id = (0..length)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect::<String>();
        Self(id)
    }

    /// Draws random identifiers until one is not rejected by `taken`.
    pub fn random_unique<R, F>(rng: &mut R, length: Option<usize>, taken: F) -> Self
    where
        R: Rng + ?Sized,
        F: Fn(&PanelId) -> bool,
    {
        loop {
            let candidate = Self::random(rng, length);
            if !taken(&candidate) {
                return candidate;
            }
            log::debug!("Panel id {} already in use, drawing again", candidate);
        }
    }
}

impl Display for PanelId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PanelId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_alphabet_is_alphanumeric() {
        assert_eq!(ID_ALPHABET.len(), 62);
        assert!(ID_ALPHABET.iter().all(|c| c.is_ascii_alphanumeric()));
        let unique: HashSet<_> = ID_ALPHABET.iter().collect();
        assert_eq!(unique.len(), ID_ALPHABET.len());
    }

    #[test]
    fn test_random_id_has_requested_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for length in [1, 6, 12, 32] {
            let id = PanelId::random(&mut rng, Some(length));
            assert_eq!(id.as_str().len(), length);
            assert!(id.as_str().bytes().all(|c| ID_ALPHABET.contains(&c)));
        }
    }

    #[test]
    fn test_random_id_defaults_to_fixed_length() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            assert_eq!(
                PanelId::random(&mut rng, None).as_str().len(),
                DEFAULT_ID_LENGTH
            );
        }
    }

    #[test]
    fn test_random_unique_skips_taken_ids() {
        // One-character ids collide often.
        let mut rng = StdRng::seed_from_u64(3);
        let mut taken: HashSet<PanelId> = HashSet::new();
        for _ in 0..40 {
            let id = PanelId::random_unique(&mut rng, Some(1), |id| taken.contains(id));
            assert!(taken.insert(id));
        }
        assert_eq!(taken.len(), 40);
    }
}
