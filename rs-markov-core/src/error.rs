use std::io;

/// Errors raised while building or querying a `LanguageModel`.
///
/// Stopping generation early because the current window was never seen
/// is not an error: `generate` returns the partial text instead.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
	/// Invalid construction or call parameters.
	#[error("configuration error: {0}")]
	Configuration(String),

	/// The character source could not be opened or failed while reading.
	#[error("source read error: {0}")]
	SourceRead(#[from] io::Error),

	/// The corpus is shorter than a single window.
	#[error("insufficient corpus: need at least {required} characters, got {actual}")]
	InsufficientCorpus { required: usize, actual: usize },
}

impl ModelError {
	pub(crate) fn configuration(message: impl Into<String>) -> Self {
		Self::Configuration(message.into())
	}
}

/// Shorthand used across the crate.
pub type Result<T> = std::result::Result<T, ModelError>;
