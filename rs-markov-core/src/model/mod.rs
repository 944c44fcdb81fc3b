//! Top-level module for the character-window Markov model.
//!
//! This module provides:
//! - Per-window follower counts and probabilities (`FrequencyTable`)
//! - The window-to-table mapping built by training (`WindowIndex`)
//! - Validated construction parameters (`ModelConfig`)
//! - The training and generation interface (`LanguageModel`)

/// Follower counts, probability computation and weighted sampling
/// for a single window.
pub mod frequency_table;

/// Ordered mapping from observed windows to their frequency tables.
pub mod window_index;

/// Window length and optional seed, validated once.
pub mod model_config;

/// Model orchestrator: training, generation and debug rendering.
///
/// Owns the pseudo-random source and the learned `WindowIndex`.
pub mod language_model;
