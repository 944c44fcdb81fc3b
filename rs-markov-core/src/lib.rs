//! Character-level Markov chain text generation library.
//!
//! This crate provides a fixed-window Markov text model including:
//! - Sliding-window training over any character source
//! - Per-window follower frequencies with cumulative probabilities
//! - Seedable weighted sampling to extend a seed text
//! - A UTF-8 character reader for files and streams
//!
//! ```
//! use rs_markov_core::model::language_model::LanguageModel;
//!
//! let mut model = LanguageModel::with_seed(1, 42)?;
//! model.train_str("aab")?;
//! let text = model.generate("a", 1)?;
//! assert!(text == "aa" || text == "ab");
//! # Ok::<(), rs_markov_core::error::ModelError>(())
//! ```

/// Frequency tables, window index and the `LanguageModel` itself.
pub mod model;

/// Error taxonomy shared by training and generation.
pub mod error;

/// Character sources (UTF-8 decoding, file opening).
pub mod io;

pub use error::{ModelError, Result};
pub use model::language_model::LanguageModel;
