/// The default limit on nesting depth, for both directions.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Limits applied while converting.
///
/// The output format is fixed (compact UTF-8), so the only knob is how deep a tree may nest
/// before it is rejected instead of exhausting the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Maximum nesting depth.
    ///
    /// When encoding, every JSON object and array counts as one level.
    /// When decoding, every open element counts as one level.
    pub max_depth: usize,
}
impl ConvertConfig {
    /// Returns a copy of this config with the given depth limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
