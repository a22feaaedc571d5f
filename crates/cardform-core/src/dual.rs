//! Dual-brand (co-badged card) resolution.
//!
//! When a number matches two brands the shopper may choose which one pays.
//! The candidates are ordered by a static precedence table and at most the
//! first two stay live for the UI.

use crate::detect::DetectedBrand;

/// The resolved co-badge state derived from the raw candidate list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DualBrandState {
	/// The live candidates, at most two, in display order. The candidate at
	/// `selected_index` carries `selected = true`.
	pub candidates: Vec<DetectedBrand>,
	/// Index of the candidate whose policies govern validation.
	pub selected_index: usize,
	/// True iff exactly two reliable, supported candidates remain.
	pub is_dual_branded: bool,
}

impl DualBrandState {
	/// The candidate currently governing downstream validation.
	pub fn selected(&self) -> Option<&DetectedBrand> {
		self.candidates.get(self.selected_index)
	}
}

/// Sort precedence, lower sorts first. Private-label programs come before
/// their carrying network, domestic networks before international schemes;
/// everything else keeps its original order (the sort is stable).
fn precedence(brand: &DetectedBrand) -> u8 {
	if brand.brand.is_plcc() {
		0
	} else if brand.brand.is_domestic_network() {
		1
	} else {
		2
	}
}

/// Orders co-badged candidates by the static precedence table.
///
/// Idempotent: sorting an already-sorted list returns it unchanged.
pub fn sort_brands(candidates: Vec<DetectedBrand>) -> Vec<DetectedBrand> {
	if candidates.len() <= 1 {
		return candidates;
	}
	let mut sorted = candidates;
	sorted.sort_by_key(precedence);
	sorted
}

/// True iff exactly two reliable, supported candidates remain.
pub fn is_dual_branded(candidates: &[DetectedBrand]) -> bool {
	candidates
		.iter()
		.filter(|c| c.reliable && c.supported)
		.count() == 2
}

/// Resolves the raw candidate list into the dual-brand UI state.
///
/// Keeps the supported candidates (falling back to the raw list when none
/// is supported, so "unsupported brand" can still be reported), orders
/// them, truncates to two, and applies the shopper's selection. A selection
/// index that no longer references an existing entry resets to 0.
pub fn resolve_dual_brands(
	candidates: Vec<DetectedBrand>,
	selected_index: Option<usize>,
) -> DualBrandState {
	let supported: Vec<DetectedBrand> = candidates
		.iter()
		.filter(|c| c.supported)
		.cloned()
		.collect();
	let pool = if supported.is_empty() { candidates } else { supported };

	let dual = is_dual_branded(&pool);
	let mut live = sort_brands(pool);
	live.truncate(2);

	let selected_index = match selected_index {
		Some(index) if index < live.len() => index,
		_ => 0,
	};
	for (i, candidate) in live.iter_mut().enumerate() {
		candidate.selected = i == selected_index;
	}

	DualBrandState {
		candidates: live,
		selected_index,
		is_dual_branded: dual,
	}
}
