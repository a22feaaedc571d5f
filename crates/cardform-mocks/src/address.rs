//! Mock address validator for testing AddressValidator trait.

use std::collections::HashMap;
use std::sync::RwLock;

use cardform_core::{FieldValidation, ValidationReason};
use cardform_form::{AddressConfiguration, AddressInput, AddressOutput, AddressValidator};

/// Mock address validator for testing.
///
/// Applies a minimal rule set: postal-code mode requires a non-empty
/// postal code, full-address mode additionally requires street, city and
/// country. Calls are counted so tests can assert the seam was exercised.
pub struct MockAddressValidator {
	call_count: RwLock<usize>,
}

impl Default for MockAddressValidator {
	fn default() -> Self {
		Self::new()
	}
}

impl MockAddressValidator {
	pub fn new() -> Self {
		Self {
			call_count: RwLock::new(0),
		}
	}

	/// Gets the number of validations performed so far.
	pub fn call_count(&self) -> usize {
		*self.call_count.read().unwrap_or_else(|e| e.into_inner())
	}

	fn required(value: &str) -> FieldValidation {
		if value.trim().is_empty() {
			FieldValidation::invalid(ValidationReason::MissingRequiredField)
		} else {
			FieldValidation::Valid
		}
	}
}

impl AddressValidator for MockAddressValidator {
	fn validate(&self, input: &AddressInput, config: AddressConfiguration) -> AddressOutput {
		*self.call_count.write().unwrap_or_else(|e| e.into_inner()) += 1;

		let mut field_results = HashMap::new();
		match config {
			AddressConfiguration::None => return AddressOutput::valid(),
			AddressConfiguration::PostalCode => {
				field_results.insert("postal_code".to_string(), Self::required(&input.postal_code));
			}
			AddressConfiguration::FullAddress => {
				field_results.insert("postal_code".to_string(), Self::required(&input.postal_code));
				field_results.insert("street".to_string(), Self::required(&input.street));
				field_results.insert("city".to_string(), Self::required(&input.city));
				field_results.insert("country".to_string(), Self::required(&input.country));
			}
		}
		let is_valid = field_results.values().all(|v| v.is_valid());
		AddressOutput {
			is_valid,
			field_results,
		}
	}
}
