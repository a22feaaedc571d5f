//! Merchant configuration for one card form instance.
//!
//! A plain immutable struct, built once and validated on construction.
//! Recognized options:
//!
//! | Option | Default | Effect |
//! |---|---|---|
//! | `supported_brands` | empty | brands the merchant accepts |
//! | `hide_cvc` | `false` | force-hide the CVC field |
//! | `hide_cvc_stored_card` | `false` | force-hide CVC for stored cards |
//! | `holder_name_required` | `false` | collect and require the holder name |
//! | `installments` | none | installment option sets |
//! | `address` | `None` | address collection mode |
//! | `amount` | none | purchase amount for installment display |

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cardform_core::{Amount, CardBrand, InstallmentConfig, PolicyFlags};

/// How much address data the form collects. The actual validation of what
/// is collected is delegated to the external address subsystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressConfiguration {
	#[default]
	None,
	PostalCode,
	FullAddress,
}

/// Immutable per-form configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfiguration {
	pub supported_brands: HashSet<CardBrand>,
	#[serde(default)]
	pub hide_cvc: bool,
	#[serde(default)]
	pub hide_cvc_stored_card: bool,
	#[serde(default)]
	pub holder_name_required: bool,
	#[serde(default)]
	pub installments: Option<InstallmentConfig>,
	#[serde(default)]
	pub address: AddressConfiguration,
	#[serde(default)]
	pub amount: Option<Amount>,
}

impl CardConfiguration {
	/// Checks the configuration for the invariants that cannot be
	/// expressed in the type: installment counts must be at least 2 and a
	/// brand may carry at most one card-based option set.
	pub fn validate(&self) -> Result<(), ConfigurationError> {
		if let Some(installments) = &self.installments {
			let all_sets = installments
				.default_options
				.iter()
				.chain(installments.card_based_options.iter().map(|(_, o)| o));
			for set in all_sets {
				if set.max_installments < 2 {
					return Err(ConfigurationError::InvalidInstallmentCount(
						set.max_installments,
					));
				}
			}
			let mut seen = HashSet::new();
			for (brand, _) in &installments.card_based_options {
				if !seen.insert(brand) {
					return Err(ConfigurationError::DuplicateCardBasedOptions(
						brand.tx_variant().to_string(),
					));
				}
			}
		}
		Ok(())
	}

	/// The policy override flags this configuration implies.
	pub fn policy_flags(&self, is_stored_card: bool) -> PolicyFlags {
		PolicyFlags {
			hide_cvc: self.hide_cvc,
			hide_cvc_stored_card: self.hide_cvc_stored_card,
			holder_name_required: self.holder_name_required,
			is_stored_card,
		}
	}
}

/// Malformed configuration; raised at construction, never during input
/// handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
	/// Installment option sets must offer at least two installments
	#[error("installment option sets must offer at least 2 installments, got {0}")]
	InvalidInstallmentCount(u32),

	/// A brand may carry at most one card-based installment option set
	#[error("duplicate card-based installment options for brand {0}")]
	DuplicateCardBasedOptions(String),
}

#[cfg(test)]
mod tests {
	use super::*;
	use cardform_core::InstallmentOptions;

	fn options(max: u32) -> InstallmentOptions {
		InstallmentOptions {
			max_installments: max,
			include_revolving: false,
			suppress_single_payment: false,
		}
	}

	#[test]
	fn test_default_configuration_is_valid() {
		assert!(CardConfiguration::default().validate().is_ok());
	}

	#[test]
	fn test_installment_count_below_two_is_rejected() {
		let config = CardConfiguration {
			installments: Some(InstallmentConfig {
				default_options: Some(options(1)),
				..Default::default()
			}),
			..Default::default()
		};
		assert_eq!(
			config.validate(),
			Err(ConfigurationError::InvalidInstallmentCount(1))
		);
	}

	#[test]
	fn test_duplicate_card_based_options_are_rejected() {
		let config = CardConfiguration {
			installments: Some(InstallmentConfig {
				card_based_options: vec![
					(CardBrand::Visa, options(3)),
					(CardBrand::Visa, options(6)),
				],
				..Default::default()
			}),
			..Default::default()
		};
		assert_eq!(
			config.validate(),
			Err(ConfigurationError::DuplicateCardBasedOptions(
				"visa".to_string()
			))
		);
	}

	#[test]
	fn test_distinct_card_based_options_are_accepted() {
		let config = CardConfiguration {
			installments: Some(InstallmentConfig {
				default_options: Some(options(2)),
				card_based_options: vec![
					(CardBrand::Visa, options(3)),
					(CardBrand::Mastercard, options(6)),
				],
				..Default::default()
			}),
			..Default::default()
		};
		assert!(config.validate().is_ok());
	}
}
