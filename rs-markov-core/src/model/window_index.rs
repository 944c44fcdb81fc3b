use std::collections::HashMap;

use serde::Serialize;

use super::frequency_table::FrequencyTable;
use crate::error::Result;

/// Maps each observed window to its `FrequencyTable`.
///
/// Windows are kept in the order they were first observed, so iteration
/// and rendering are stable for a given corpus.
///
/// # Invariants
/// - Each window appears at most once
/// - A window is present iff at least one character followed it
/// - `slots[w]` is the position of the table for `w` in `tables`
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct WindowIndex {
	#[serde(skip)]
	slots: HashMap<String, usize>,
	tables: Vec<FrequencyTable>,
}

impl WindowIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records that `next_char` followed `window`.
	///
	/// Creates the table for `window` on first sight.
	pub fn observe(&mut self, window: &str, next_char: char) {
		let slot = match self.slots.get(window) {
			Some(slot) => *slot,
			None => {
				self.tables.push(FrequencyTable::new(window));
				let slot = self.tables.len() - 1;
				self.slots.insert(window.to_owned(), slot);
				slot
			}
		};
		self.tables[slot].record(next_char);
	}

	/// Computes probabilities for every table.
	pub fn finalize(&mut self) -> Result<()> {
		for table in &mut self.tables {
			table.compute_probabilities()?;
		}
		Ok(())
	}

	pub fn get(&self, window: &str) -> Option<&FrequencyTable> {
		self.slots.get(window).map(|slot| &self.tables[*slot])
	}

	pub fn contains(&self, window: &str) -> bool {
		self.slots.contains_key(window)
	}

	pub fn len(&self) -> usize {
		self.tables.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tables.is_empty()
	}

	/// Tables in first-observed window order.
	pub fn tables(&self) -> impl Iterator<Item = &FrequencyTable> {
		self.tables.iter()
	}

	/// Returns the table at `position` in first-observed order.
	pub(crate) fn nth(&self, position: usize) -> Option<&FrequencyTable> {
		self.tables.get(position)
	}
}
