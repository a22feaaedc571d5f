//! Per-field UI policies and their resolution.

use serde::{Deserialize, Serialize};

/// Whether a form field must be shown and filled, shown but skippable,
/// or not shown at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldPolicy {
	Required,
	Optional,
	Hidden,
}

impl FieldPolicy {
	/// Fields that are hidden or optional validate as correct when empty.
	pub fn is_valid_when_empty(self) -> bool {
		matches!(self, Self::Optional | Self::Hidden)
	}

	/// Parses the wire representation, defaulting to `Required` for
	/// unknown values so a newly introduced policy never hides a field.
	pub fn parse(value: &str) -> Self {
		match value {
			"optional" => Self::Optional,
			"hidden" => Self::Hidden,
			_ => Self::Required,
		}
	}
}

/// The logical form fields whose visibility is policy-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
	Cvc,
	Expiry,
	HolderName,
}

/// Merchant-level visibility overrides, one flag per recognized option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyFlags {
	pub hide_cvc: bool,
	pub hide_cvc_stored_card: bool,
	pub holder_name_required: bool,
	/// Set when validating a stored (one-click) card rather than a freshly
	/// typed one, which switches the CVC flag that applies.
	pub is_stored_card: bool,
}

/// Resolves the effective policy for one field.
///
/// Precedence: a brand-declared `Hidden` always wins; otherwise a matching
/// merchant hide flag forces `Hidden`; otherwise the brand's own declaration
/// applies; absent all of those the field is `Required`.
pub fn resolve_field_policy(
	field: FieldKind,
	brand_policy: Option<FieldPolicy>,
	flags: PolicyFlags,
) -> FieldPolicy {
	if brand_policy == Some(FieldPolicy::Hidden) {
		return FieldPolicy::Hidden;
	}
	let merchant_hide = match field {
		FieldKind::Cvc => {
			if flags.is_stored_card {
				flags.hide_cvc_stored_card
			} else {
				flags.hide_cvc
			}
		}
		FieldKind::Expiry => false,
		FieldKind::HolderName => false,
	};
	if merchant_hide {
		return FieldPolicy::Hidden;
	}
	if field == FieldKind::HolderName && !flags.holder_name_required {
		// Holder name is only collected when the merchant asks for it.
		return FieldPolicy::Hidden;
	}
	brand_policy.unwrap_or(FieldPolicy::Required)
}
