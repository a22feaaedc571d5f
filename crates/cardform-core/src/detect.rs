//! Local brand detection.
//!
//! [`DetectedBrand`] is an immutable value created fresh for every
//! detection pass; remote confirmation replaces the whole candidate list,
//! it never mutates these values in place.

use std::collections::HashSet;

use crate::brand::CardBrand;
use crate::catalog::{BrandRule, estimate_brands};
use crate::policy::FieldPolicy;

/// A full BIN; once this many digits are typed a single-rule match is
/// considered disambiguated.
const RELIABLE_PREFIX_LENGTH: usize = 6;

/// One detected brand candidate with everything validation needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedBrand {
	pub brand: CardBrand,
	/// Whether the typed prefix unambiguously identifies this brand.
	pub reliable: bool,
	/// Whether numbers of this brand carry a Luhn checksum.
	pub luhn_check: bool,
	pub cvc_policy: FieldPolicy,
	pub expiry_policy: FieldPolicy,
	/// Admissible full PAN lengths; empty when unknown.
	pub pan_lengths: Vec<usize>,
	/// Whether the merchant configuration accepts this brand.
	pub supported: bool,
	/// Whether the shopper picked this candidate in a dual-brand choice.
	pub selected: bool,
}

impl DetectedBrand {
	fn from_rule(rule: &BrandRule, reliable: bool, supported: &HashSet<CardBrand>) -> Self {
		Self {
			brand: rule.brand.clone(),
			reliable,
			luhn_check: rule.luhn_check,
			cvc_policy: rule.cvc_policy,
			expiry_policy: FieldPolicy::Required,
			pan_lengths: rule.pan_lengths.to_vec(),
			supported: supported.contains(&rule.brand),
			selected: false,
		}
	}
}

/// Matches the typed digits against the static catalog.
///
/// Unsupported brands are still returned (flagged) so number validation can
/// report "unsupported brand" instead of "unrecognized". A candidate is
/// reliable only when it is the sole match and a full BIN has been typed;
/// co-badged ranges stay unreliable until remote confirmation.
pub fn detect_locally(digits: &str, supported: &HashSet<CardBrand>) -> Vec<DetectedBrand> {
	let rules = estimate_brands(digits);
	let reliable = rules.len() == 1 && digits.len() >= RELIABLE_PREFIX_LENGTH;
	rules
		.into_iter()
		.map(|rule| DetectedBrand::from_rule(rule, reliable, supported))
		.collect()
}
