use crate::error::{ModelError, Result};

/// Construction parameters for a `LanguageModel`.
///
/// # Invariants
/// - `window_length >= 1`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelConfig {
	window_length: usize,
	seed: Option<u64>,
}

impl ModelConfig {
	/// Creates an unseeded configuration.
	///
	/// # Errors
	/// Returns a configuration error if `window_length` is 0.
	pub fn new(window_length: usize) -> Result<Self> {
		if window_length == 0 {
			return Err(ModelError::configuration("window length must be >= 1"));
		}
		Ok(Self { window_length, seed: None })
	}

	/// Fixes the pseudo-random sequence so generation is reproducible.
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}

	pub fn window_length(&self) -> usize {
		self.window_length
	}

	pub fn seed(&self) -> Option<u64> {
		self.seed
	}
}
