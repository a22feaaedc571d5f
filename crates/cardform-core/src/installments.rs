//! Installment plan computation.
//!
//! Builds the list of selectable installment options for the resolved
//! brand and purchase amount. Display text here is deliberately
//! locale-neutral; localized rendering is the embedding UI's job.

use serde::{Deserialize, Serialize};

use crate::brand::CardBrand;

/// A monetary amount in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
	pub value: i64,
	pub currency: String,
}

impl Amount {
	pub fn new(value: i64, currency: impl Into<String>) -> Self {
		Self {
			value,
			currency: currency.into(),
		}
	}
}

/// How an installment option is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
	Regular,
	Revolving,
}

/// One selectable installment option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentOption {
	/// Number of payments; 1 for the single-payment baseline and for
	/// revolving plans.
	pub count: u32,
	pub plan_type: PlanType,
	/// `amount / count` in minor units, truncating; display-only.
	pub per_installment_amount: Option<Amount>,
	pub display_text: String,
}

/// The shopper's chosen plan, as it goes into the payment payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentPlan {
	pub plan_type: PlanType,
	pub count: u32,
}

impl From<&InstallmentOption> for InstallmentPlan {
	fn from(option: &InstallmentOption) -> Self {
		Self {
			plan_type: option.plan_type,
			count: option.count,
		}
	}
}

/// One set of installment options offered to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentOptions {
	/// Highest regular installment count offered; counts 2 up to this value
	/// are appended after the baseline.
	pub max_installments: u32,
	pub include_revolving: bool,
	/// Suppresses the single-payment baseline. Off by default.
	#[serde(default)]
	pub suppress_single_payment: bool,
}

/// Merchant installment configuration: a default option set plus optional
/// per-brand overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentConfig {
	pub default_options: Option<InstallmentOptions>,
	pub card_based_options: Vec<(CardBrand, InstallmentOptions)>,
	/// Whether option display text carries the per-installment amount.
	#[serde(default)]
	pub show_installment_amount: bool,
}

impl InstallmentConfig {
	/// The option set in effect for `brand`: a card-based override takes
	/// precedence over the default set, but only once the brand is
	/// reliably identified.
	fn effective_options(
		&self,
		brand: Option<&CardBrand>,
		brand_reliable: bool,
	) -> Option<&InstallmentOptions> {
		if brand_reliable {
			if let Some(brand) = brand {
				let card_based = self
					.card_based_options
					.iter()
					.find(|(b, _)| b == brand)
					.map(|(_, options)| options);
				if card_based.is_some() {
					return card_based;
				}
			}
		}
		self.default_options.as_ref()
	}
}

/// Builds the selectable installment options for the resolved brand.
///
/// Order: the single-payment baseline (unless suppressed), regular counts
/// ascending up to the effective maximum, and the revolving option last
/// when enabled. No configuration yields no options.
pub fn build_installment_options(
	config: Option<&InstallmentConfig>,
	brand: Option<&CardBrand>,
	brand_reliable: bool,
	amount: Option<&Amount>,
) -> Vec<InstallmentOption> {
	let Some(config) = config else {
		return Vec::new();
	};
	let Some(options) = config.effective_options(brand, brand_reliable) else {
		return Vec::new();
	};

	let shown_amount = |count: u32| -> Option<Amount> {
		if !config.show_installment_amount {
			return None;
		}
		amount.map(|a| Amount::new(a.value / i64::from(count), a.currency.clone()))
	};

	let mut list = Vec::new();
	if !options.suppress_single_payment {
		list.push(InstallmentOption {
			count: 1,
			plan_type: PlanType::Regular,
			per_installment_amount: shown_amount(1),
			display_text: display_text(1, PlanType::Regular, shown_amount(1).as_ref()),
		});
	}
	for count in 2..=options.max_installments {
		let per_installment = shown_amount(count);
		list.push(InstallmentOption {
			count,
			plan_type: PlanType::Regular,
			display_text: display_text(count, PlanType::Regular, per_installment.as_ref()),
			per_installment_amount: per_installment,
		});
	}
	if options.include_revolving {
		list.push(InstallmentOption {
			count: 1,
			plan_type: PlanType::Revolving,
			per_installment_amount: None,
			display_text: display_text(1, PlanType::Revolving, None),
		});
	}
	list
}

fn display_text(count: u32, plan_type: PlanType, amount: Option<&Amount>) -> String {
	match (plan_type, amount) {
		(PlanType::Revolving, _) => "Revolving".to_string(),
		(PlanType::Regular, Some(amount)) => {
			format!("{count}x {} {}", amount.value, amount.currency)
		}
		(PlanType::Regular, None) => format!("{count}x"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(max: u32, revolving: bool) -> InstallmentConfig {
		InstallmentConfig {
			default_options: Some(InstallmentOptions {
				max_installments: max,
				include_revolving: revolving,
				suppress_single_payment: false,
			}),
			card_based_options: Vec::new(),
			show_installment_amount: false,
		}
	}

	fn counts(options: &[InstallmentOption]) -> Vec<(u32, PlanType)> {
		options.iter().map(|o| (o.count, o.plan_type)).collect()
	}

	#[test]
	fn test_three_installments_with_revolving() {
		let options = build_installment_options(Some(&config(3, true)), None, false, None);
		assert_eq!(
			counts(&options),
			vec![
				(1, PlanType::Regular),
				(2, PlanType::Regular),
				(3, PlanType::Regular),
				(1, PlanType::Revolving),
			]
		);
	}

	#[test]
	fn test_revolving_absent_when_disabled() {
		let options = build_installment_options(Some(&config(3, false)), None, false, None);
		assert_eq!(
			counts(&options),
			vec![
				(1, PlanType::Regular),
				(2, PlanType::Regular),
				(3, PlanType::Regular),
			]
		);
	}

	#[test]
	fn test_no_configuration_yields_no_options() {
		assert!(build_installment_options(None, None, false, None).is_empty());
		let empty = InstallmentConfig::default();
		assert!(build_installment_options(Some(&empty), None, false, None).is_empty());
	}

	#[test]
	fn test_baseline_can_be_suppressed() {
		let config = InstallmentConfig {
			default_options: Some(InstallmentOptions {
				max_installments: 2,
				include_revolving: false,
				suppress_single_payment: true,
			}),
			..Default::default()
		};
		let options = build_installment_options(Some(&config), None, false, None);
		assert_eq!(counts(&options), vec![(2, PlanType::Regular)]);
	}

	#[test]
	fn test_card_based_override_needs_reliable_brand() {
		let config = InstallmentConfig {
			default_options: Some(InstallmentOptions {
				max_installments: 2,
				include_revolving: false,
				suppress_single_payment: false,
			}),
			card_based_options: vec![(
				CardBrand::Visa,
				InstallmentOptions {
					max_installments: 6,
					include_revolving: false,
					suppress_single_payment: false,
				},
			)],
			show_installment_amount: false,
		};

		let unreliable =
			build_installment_options(Some(&config), Some(&CardBrand::Visa), false, None);
		assert_eq!(unreliable.len(), 2);

		let reliable =
			build_installment_options(Some(&config), Some(&CardBrand::Visa), true, None);
		assert_eq!(reliable.len(), 6);
	}

	#[test]
	fn test_per_installment_amount_truncates() {
		let mut cfg = config(3, false);
		cfg.show_installment_amount = true;
		let amount = Amount::new(1000, "EUR");
		let options =
			build_installment_options(Some(&cfg), None, false, Some(&amount));
		// 1000 / 3 truncates to 333; the remainder is not redistributed.
		assert_eq!(
			options[2].per_installment_amount,
			Some(Amount::new(333, "EUR"))
		);
		assert_eq!(options[2].display_text, "3x 333 EUR");
	}

	#[test]
	fn test_amount_hidden_unless_requested() {
		let amount = Amount::new(1000, "EUR");
		let options =
			build_installment_options(Some(&config(2, false)), None, false, Some(&amount));
		assert!(options.iter().all(|o| o.per_installment_amount.is_none()));
	}
}
