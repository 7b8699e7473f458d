//! Sampling parameters applied to every model call in a session.

use serde::{Deserialize, Serialize};

/// Generation settings sent with each message.
///
/// A session always starts from [`GenerationConfig::default`] and returns to
/// it on reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Upper bound on tokens in one reply.
    pub max_output_tokens: u32,
    /// Sampling temperature (0.0 = deterministic).
    pub temperature: f32,
    /// Nucleus sampling probability mass.
    pub top_p: f32,
    /// Number of highest-probability tokens considered.
    pub top_k: u32,
}

impl GenerationConfig {
    pub const MAX_OUTPUT_TOKENS: u32 = 2048;
    pub const TEMPERATURE: f32 = 0.7;
    pub const TOP_P: f32 = 0.8;
    pub const TOP_K: u32 = 40;
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_output_tokens: Self::MAX_OUTPUT_TOKENS,
            temperature: Self::TEMPERATURE,
            top_p: Self::TOP_P,
            top_k: Self::TOP_K,
        }
    }
}
