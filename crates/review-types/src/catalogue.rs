//! Rejection reason catalogue.
//!
//! The catalogue maps small integer codes to descriptive text. It is always
//! supplied by whatever collaborator owns it (configuration locally, the
//! remote authority in responses) so the set of rejection reasons can evolve
//! without a client redeploy; the workflow core never hardcodes reason text.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::constants::{CATALOGUED_CODE_MAX, CATALOGUED_CODE_MIN};
use crate::order::ReasonCode;

/// Errors that can occur when constructing or querying a catalogue.
#[derive(Debug, Error)]
pub enum CatalogueError {
	/// A required catalogued code has no entry.
	#[error("Catalogue is missing an entry for code {0}")]
	MissingCode(u8),
}

/// Mapping from catalogued rejection codes to descriptive text.
///
/// Construction requires entries for every code in the catalogued range so
/// a decision prompt can always render all of its rejection options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ReasonCatalogue {
	entries: HashMap<u8, String>,
}

impl ReasonCatalogue {
	/// Creates a catalogue, checking the catalogued code range is covered.
	pub fn new(entries: HashMap<u8, String>) -> Result<Self, CatalogueError> {
		for code in CATALOGUED_CODE_MIN..=CATALOGUED_CODE_MAX {
			if !entries.contains_key(&code) {
				return Err(CatalogueError::MissingCode(code));
			}
		}

		Ok(Self { entries })
	}

	/// Wraps a response-supplied mapping without the coverage check.
	///
	/// The authority's own catalogue is authoritative for display text even
	/// when it carries a different set of codes than the local one.
	pub fn from_response(entries: HashMap<u8, String>) -> Self {
		Self { entries }
	}

	/// Descriptive text for a code, if catalogued.
	pub fn description(&self, code: ReasonCode) -> Option<&str> {
		self.entries.get(&code.0).map(String::as_str)
	}

	/// Whether the given code has an entry.
	pub fn contains(&self, code: ReasonCode) -> bool {
		self.entries.contains_key(&code.0)
	}

	/// Catalogued codes in ascending order.
	pub fn codes(&self) -> Vec<ReasonCode> {
		let mut codes: Vec<u8> = self.entries.keys().copied().collect();
		codes.sort_unstable();
		codes.into_iter().map(ReasonCode).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn full_entries() -> HashMap<u8, String> {
		HashMap::from([
			(2, "Different items".to_string()),
			(3, "Different package contents".to_string()),
			(4, "Listing mismatch".to_string()),
		])
	}

	#[test]
	fn requires_full_catalogued_range() {
		let mut entries = full_entries();
		entries.remove(&3);

		let err = ReasonCatalogue::new(entries).unwrap_err();
		assert!(matches!(err, CatalogueError::MissingCode(3)));
	}

	#[test]
	fn looks_up_descriptions_by_code() {
		let catalogue = ReasonCatalogue::new(full_entries()).unwrap();

		assert_eq!(
			catalogue.description(ReasonCode(2)),
			Some("Different items")
		);
		assert_eq!(catalogue.description(ReasonCode(5)), None);
		assert_eq!(
			catalogue.codes(),
			vec![ReasonCode(2), ReasonCode(3), ReasonCode(4)]
		);
	}

	#[test]
	fn response_catalogue_skips_coverage_check() {
		let partial = HashMap::from([(2, "Different items".to_string())]);
		let catalogue = ReasonCatalogue::from_response(partial);

		assert!(catalogue.contains(ReasonCode(2)));
		assert!(!catalogue.contains(ReasonCode(4)));
	}
}
