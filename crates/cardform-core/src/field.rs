//! Per-field validation outcomes.
//!
//! Validation results are plain data carried inside the output snapshot;
//! they are never raised as errors. `show_while_editing` tells the UI
//! whether the problem should be surfaced before the field loses focus
//! (e.g. an illegal character is shown immediately, a too-short number is
//! not).

use serde::{Deserialize, Serialize};

/// Why a field failed validation. Used as a key for localized messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationReason {
	IllegalCharacters,
	TooShort,
	TooLong,
	UnsupportedBrand,
	LuhnCheckFailed,
	ExpiredOrInvalidDate,
	InvalidCvcLength,
	MissingRequiredField,
	AddressSubValidationFailed,
	InvalidInstallmentSelection,
}

/// The validation state of one logical form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FieldValidation {
	Valid,
	Invalid {
		reason: ValidationReason,
		/// Whether the error should already be shown while the shopper is
		/// still typing in the field.
		show_while_editing: bool,
	},
	/// The field's resolved policy is hidden; it takes no part in overall
	/// form validity.
	NotApplicable,
}

impl FieldValidation {
	pub fn invalid(reason: ValidationReason) -> Self {
		Self::Invalid {
			reason,
			show_while_editing: false,
		}
	}

	pub fn invalid_while_editing(reason: ValidationReason) -> Self {
		Self::Invalid {
			reason,
			show_while_editing: true,
		}
	}

	pub fn is_valid(&self) -> bool {
		matches!(self, Self::Valid)
	}

	/// Whether this field blocks submission: hidden fields never do.
	pub fn blocks_submission(&self) -> bool {
		matches!(self, Self::Invalid { .. })
	}
}

/// A field's current value together with its validation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldState<T> {
	pub value: T,
	pub validation: FieldValidation,
}

impl<T: Default> Default for FieldState<T> {
	fn default() -> Self {
		Self::valid(T::default())
	}
}

impl<T> FieldState<T> {
	pub fn new(value: T, validation: FieldValidation) -> Self {
		Self { value, validation }
	}

	pub fn valid(value: T) -> Self {
		Self::new(value, FieldValidation::Valid)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hidden_fields_do_not_block_submission() {
		assert!(!FieldValidation::NotApplicable.blocks_submission());
		assert!(!FieldValidation::Valid.blocks_submission());
		assert!(FieldValidation::invalid(ValidationReason::TooShort).blocks_submission());
	}

	#[test]
	fn test_show_while_editing_flag() {
		let v = FieldValidation::invalid_while_editing(ValidationReason::IllegalCharacters);
		assert!(matches!(
			v,
			FieldValidation::Invalid {
				show_while_editing: true,
				..
			}
		));
	}
}
