//! Decoder configuration.

/// Default maximum nesting depth for arrays and objects.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// What to do when an object repeats a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// The last occurrence replaces earlier ones.
    #[default]
    LastWins,
    /// Fail with `JsonParseError::DuplicateKey`.
    Reject,
}

/// Options accepted by [`crate::decode_with`].
///
/// ```
/// use jsonq_core::{decode_with, DecodeOptions, DuplicateKeys};
///
/// let options = DecodeOptions::default().duplicate_keys(DuplicateKeys::Reject);
/// assert!(decode_with(r#"{"a":1,"a":2}"#, &options).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub duplicate_keys: DuplicateKeys,
    /// Arrays and objects nested deeper than this fail with `NestingTooDeep`.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            duplicate_keys: DuplicateKeys::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
