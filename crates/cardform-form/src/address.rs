//! Seam to the external address validation subsystem.
//!
//! Address validation is a black box: whatever it produces is carried
//! unmodified into the output snapshot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use cardform_core::{FieldValidation, ValidationReason};

use crate::config::AddressConfiguration;
use crate::input::AddressInput;

/// The address subsystem's verdict, consumed unmodified into the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressOutput {
	pub is_valid: bool,
	/// Per-field results keyed by the subsystem's own field names.
	pub field_results: HashMap<String, FieldValidation>,
}

impl AddressOutput {
	/// A trivially valid result, used when no address is collected.
	pub fn valid() -> Self {
		Self {
			is_valid: true,
			field_results: HashMap::new(),
		}
	}

	/// The subsystem's verdict folded into a single field validation: any
	/// failing sub-field surfaces as one address-level failure.
	pub fn as_field_validation(&self) -> FieldValidation {
		if self.is_valid {
			FieldValidation::Valid
		} else {
			FieldValidation::invalid(ValidationReason::AddressSubValidationFailed)
		}
	}
}

/// External address validation subsystem.
pub trait AddressValidator: Send + Sync {
	fn validate(&self, input: &AddressInput, config: AddressConfiguration) -> AddressOutput;
}
