use std::fmt;
use std::io;
use std::path::Path;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::frequency_table::FrequencyTable;
use super::model_config::ModelConfig;
use super::window_index::WindowIndex;
use crate::error::{ModelError, Result};
use crate::io::open_source;

/// Character-level Markov model over a fixed-length window.
///
/// The model owns:
/// - `config`: window length and optional seed
/// - `rng`: the pseudo-random source used for every sampling step
/// - `index`: the learned `WindowIndex`, rebuilt by each `train` call
///
/// Each model has its own generator, so two models (or two tests) never
/// share a random sequence.
#[derive(Debug)]
pub struct LanguageModel {
	config: ModelConfig,
	rng: StdRng,
	index: WindowIndex,
	trained: bool,
}

impl LanguageModel {
	/// Creates a model seeded from OS entropy.
	///
	/// # Errors
	/// Returns a configuration error if `window_length` is 0.
	pub fn new(window_length: usize) -> Result<Self> {
		Ok(Self::from_config(ModelConfig::new(window_length)?))
	}

	/// Creates a model whose generation is reproducible for a given `seed`.
	///
	/// # Errors
	/// Returns a configuration error if `window_length` is 0.
	pub fn with_seed(window_length: usize, seed: u64) -> Result<Self> {
		Ok(Self::from_config(ModelConfig::new(window_length)?.with_seed(seed)))
	}

	pub fn from_config(config: ModelConfig) -> Self {
		let rng = match config.seed() {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		};
		Self {
			config,
			rng,
			index: WindowIndex::new(),
			trained: false,
		}
	}

	pub fn config(&self) -> &ModelConfig {
		&self.config
	}

	pub fn window_length(&self) -> usize {
		self.config.window_length()
	}

	/// True after a successful `train`, even if no window was learned.
	pub fn is_trained(&self) -> bool {
		self.trained
	}

	pub fn index(&self) -> &WindowIndex {
		&self.index
	}

	pub fn window_count(&self) -> usize {
		self.index.len()
	}

	pub fn table(&self, window: &str) -> Option<&FrequencyTable> {
		self.index.get(window)
	}

	/// Observed windows in first-seen order.
	pub fn windows(&self) -> impl Iterator<Item = &str> {
		self.index.tables().map(FrequencyTable::window)
	}

	/// Builds the model from a character source, consuming it entirely.
	///
	/// Any previous training is discarded first. On failure the model is
	/// left untrained with an empty index.
	///
	/// # Errors
	/// - `InsufficientCorpus` if the source yields fewer than `window_length` characters
	/// - `SourceRead` if the source reports an I/O error
	pub fn train<I>(&mut self, source: I) -> Result<()>
	where
		I: IntoIterator<Item = io::Result<char>>,
	{
		self.index = WindowIndex::new();
		self.trained = false;

		self.index = Self::build_index(self.window_length(), source)?;
		self.trained = true;
		Ok(())
	}

	/// Trains from an in-memory corpus.
	pub fn train_str(&mut self, corpus: &str) -> Result<()> {
		self.train(corpus.chars().map(Ok::<char, io::Error>))
	}

	/// Trains from a UTF-8 text file.
	///
	/// The file is closed on every exit path.
	pub fn train_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
		let source = open_source(&path)?;
		debug!("training from {}", path.as_ref().display());
		self.train(source)
	}

	/// Slides a window of `window_length` over the source and counts followers.
	fn build_index<I>(window_length: usize, source: I) -> Result<WindowIndex>
	where
		I: IntoIterator<Item = io::Result<char>>,
	{
		let mut chars = source.into_iter();
		let mut window = String::new();
		let mut read = 0;

		while read < window_length {
			match chars.next() {
				Some(c) => {
					window.push(c?);
					read += 1;
				}
				None => {
					return Err(ModelError::InsufficientCorpus {
						required: window_length,
						actual: read,
					});
				}
			}
		}

		let mut index = WindowIndex::new();
		for c in chars {
			let c = c?;
			index.observe(&window, c);
			window.remove(0);
			window.push(c);
			read += 1;
		}

		index.finalize()?;
		debug!(
			"trained {} windows of length {} from {} characters",
			index.len(),
			window_length,
			read
		);
		Ok(index)
	}

	/// Extends `initial_text` by up to `text_length` sampled characters.
	///
	/// Generation stops early, without error, as soon as the trailing
	/// window was never observed during training.
	///
	/// # Errors
	/// Returns a configuration error if `initial_text` is shorter than the window.
	pub fn generate(&mut self, initial_text: &str, text_length: usize) -> Result<String> {
		let window_length = self.window_length();
		let initial_len = initial_text.chars().count();
		if initial_len < window_length {
			return Err(ModelError::configuration(format!(
				"initial text has {initial_len} characters, window length is {window_length}"
			)));
		}

		let target = initial_len + text_length;
		let mut text = initial_text.to_owned();
		let mut window: String = initial_text.chars().skip(initial_len - window_length).collect();
		let mut length = initial_len;

		while length < target {
			let Some(table) = self.index.get(&window) else {
				if length == initial_len {
					warn!("initial window {window:?} never observed, nothing generated");
				} else {
					debug!("window {window:?} never observed, stopping at {length} characters");
				}
				break;
			};
			let Some(next_char) = table.sample(&mut self.rng) else {
				warn!("table for window {window:?} has no probabilities, stopping");
				break;
			};
			trace!("{window:?} -> {next_char:?}");

			text.push(next_char);
			window.remove(0);
			window.push(next_char);
			length += 1;
		}

		Ok(text)
	}

	/// Picks one observed window at random, using the model's own generator.
	///
	/// Returns `None` if no window was learned.
	pub fn random_window(&mut self) -> Option<String> {
		if self.index.is_empty() {
			return None;
		}
		let position = self.rng.random_range(0..self.index.len());
		self.index.nth(position).map(|table| table.window().to_owned())
	}

	/// Debug dump: one line per window with its frequency table.
	pub fn render(&self) -> String {
		self.to_string()
	}
}

impl fmt::Display for LanguageModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for table in self.index.tables() {
			writeln!(f, "{table}")?;
		}
		Ok(())
	}
}
