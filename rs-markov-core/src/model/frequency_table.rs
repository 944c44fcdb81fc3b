use std::fmt;

use rand::Rng;

use serde::Serialize;

use crate::error::{ModelError, Result};

/// One observed follower of a window.
///
/// `p` and `cp` stay at `0.0` until the owning table is finalized.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CharEntry {
	character: char,
	count: usize,
	p: f64,
	cp: f64,
}

impl CharEntry {
	fn new(character: char) -> Self {
		Self { character, count: 1, p: 0.0, cp: 0.0 }
	}

	pub fn character(&self) -> char {
		self.character
	}

	/// Number of times this character followed the window.
	pub fn count(&self) -> usize {
		self.count
	}

	/// Probability of this character given the window.
	pub fn p(&self) -> f64 {
		self.p
	}

	/// Cumulative probability up to and including this entry.
	pub fn cp(&self) -> f64 {
		self.cp
	}
}

impl fmt::Display for CharEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}:count={},p={},cp={}", self.character, self.count, self.p, self.cp)
	}
}

/// Frequency table of the characters observed after one window.
///
/// A `FrequencyTable` corresponds to a fixed window (`window`) and stores
/// every character that followed it in the corpus, in first-seen order.
///
/// ## Responsibilities:
/// - Accumulate follower counts during training
/// - Convert counts into probabilities and cumulative probabilities once
/// - Sample the next character by inverse-CDF lookup
///
/// ## Invariants
/// - At most one entry per distinct character
/// - Every entry count is strictly positive
/// - Once finalized: `cp` is non-decreasing and the last `cp` is exactly `1.0`
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FrequencyTable {
	/// The window this table describes.
	window: String,
	/// Followers in first-seen order.
	entries: Vec<CharEntry>,
	/// Set once probabilities have been computed.
	finalized: bool,
}

impl FrequencyTable {
	/// Creates a new empty table for the given window.
	pub fn new(window: &str) -> Self {
		Self {
			window: window.to_owned(),
			entries: Vec::new(),
			finalized: false,
		}
	}

	pub fn window(&self) -> &str {
		&self.window
	}

	pub fn entries(&self) -> &[CharEntry] {
		&self.entries
	}

	pub fn is_finalized(&self) -> bool {
		self.finalized
	}

	/// Sum of all follower counts.
	pub fn total(&self) -> usize {
		self.entries.iter().map(CharEntry::count).sum()
	}

	/// Returns the entry for `character`, if it was observed.
	pub fn entry(&self, character: char) -> Option<&CharEntry> {
		self.entries.iter().find(|e| e.character == character)
	}

	/// Records one occurrence of `next_char` after this window.
	///
	/// - If the character is already present, its count is increased.
	/// - Otherwise a new entry with a count of 1 is appended at the end.
	pub fn record(&mut self, next_char: char) {
		match self.entries.iter_mut().find(|e| e.character == next_char) {
			Some(entry) => entry.count += 1,
			None => self.entries.push(CharEntry::new(next_char)),
		}
	}

	/// Computes `p` and `cp` for every entry, in stored order.
	///
	/// The last cumulative probability is clamped to exactly `1.0` so that
	/// `select` always finds a match for any draw in `[0, 1)`.
	///
	/// # Errors
	/// Returns a configuration error if the table has no observations.
	pub fn compute_probabilities(&mut self) -> Result<()> {
		let total = self.total();
		if total == 0 {
			return Err(ModelError::configuration(format!(
				"frequency table for window {:?} has no observations",
				self.window
			)));
		}

		let mut cumulative = 0.0;
		for entry in &mut self.entries {
			entry.p = entry.count as f64 / total as f64;
			cumulative += entry.p;
			entry.cp = cumulative;
		}
		if let Some(last) = self.entries.last_mut() {
			last.cp = 1.0;
		}

		self.finalized = true;
		Ok(())
	}

	/// Returns the first character whose cumulative probability is `>= r`.
	///
	/// Ties are resolved in favour of the earlier entry.
	/// Returns `None` if the table is not finalized.
	pub fn select(&self, r: f64) -> Option<char> {
		if !self.finalized {
			return None;
		}
		self.entries.iter().find(|e| e.cp >= r).map(CharEntry::character)
	}

	/// Draws `r` uniformly from `[0, 1)` and returns the matching character.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<char> {
		let r: f64 = rng.random();
		self.select(r)
	}
}

impl fmt::Display for FrequencyTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?} : [", self.window)?;
		for (i, entry) in self.entries.iter().enumerate() {
			if i > 0 {
				write!(f, "; ")?;
			}
			write!(f, "{entry}")?;
		}
		write!(f, "]")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn table(window: &str, followers: &str) -> FrequencyTable {
		let mut table = FrequencyTable::new(window);
		for c in followers.chars() {
			table.record(c);
		}
		table
	}

	#[test]
	fn record_keeps_first_seen_order() {
		let table = table("ab", "zaza");
		let order: Vec<char> = table.entries().iter().map(CharEntry::character).collect();
		assert_eq!(order, vec!['z', 'a']);
		assert_eq!(table.entry('z').unwrap().count(), 2);
		assert_eq!(table.entry('a').unwrap().count(), 2);
		assert_eq!(table.total(), 4);
	}

	#[test]
	fn probabilities_follow_counts() {
		let mut table = table("x", "abbc");
		table.compute_probabilities().unwrap();

		let ps: Vec<f64> = table.entries().iter().map(CharEntry::p).collect();
		assert_eq!(ps, vec![0.25, 0.5, 0.25]);
		let cps: Vec<f64> = table.entries().iter().map(CharEntry::cp).collect();
		assert_eq!(cps, vec![0.25, 0.75, 1.0]);
	}

	#[test]
	fn last_cumulative_probability_is_clamped() {
		// Ten tenths do not sum to exactly 1.0 in floating point.
		let mut table = table("x", "abcdefghij");
		table.compute_probabilities().unwrap();

		let sum: f64 = table.entries().iter().map(CharEntry::p).sum();
		assert!((sum - 1.0).abs() < 1e-9);
		assert_eq!(table.entries().last().unwrap().cp(), 1.0);
		assert!(table.entries().windows(2).all(|w| w[0].cp() <= w[1].cp()));
	}

	#[test]
	fn empty_table_cannot_be_finalized() {
		let mut table = FrequencyTable::new("q");
		let err = table.compute_probabilities().unwrap_err();
		assert!(matches!(err, ModelError::Configuration(_)));
		assert!(!table.is_finalized());
	}

	#[test]
	fn select_picks_first_entry_reaching_r() {
		let mut table = table("x", "ab");
		table.compute_probabilities().unwrap();

		assert_eq!(table.select(0.0), Some('a'));
		assert_eq!(table.select(0.5), Some('a'));
		assert_eq!(table.select(0.5000001), Some('b'));
		assert_eq!(table.select(0.9999999), Some('b'));
	}

	#[test]
	fn select_requires_finalized_table() {
		let table = table("x", "ab");
		assert_eq!(table.select(0.1), None);
	}

	#[test]
	fn sample_is_reproducible_with_same_seed() {
		let mut table = table("x", "abcdeabca");
		table.compute_probabilities().unwrap();

		let mut first = StdRng::seed_from_u64(7);
		let mut second = StdRng::seed_from_u64(7);
		let a: String = (0..64).filter_map(|_| table.sample(&mut first)).collect();
		let b: String = (0..64).filter_map(|_| table.sample(&mut second)).collect();
		assert_eq!(a.chars().count(), 64);
		assert_eq!(a, b);
	}

	#[test]
	fn single_entry_is_always_sampled() {
		let mut table = table("x", "kkk");
		table.compute_probabilities().unwrap();
		let mut rng = StdRng::seed_from_u64(1);
		assert!((0..100).all(|_| table.sample(&mut rng) == Some('k')));
	}

	#[test]
	fn display_lists_entries() {
		let mut table = table("a", "ab");
		table.compute_probabilities().unwrap();
		assert_eq!(
			table.to_string(),
			"\"a\" : ['a':count=1,p=0.5,cp=0.5; 'b':count=1,p=0.5,cp=1]"
		);
	}
}
