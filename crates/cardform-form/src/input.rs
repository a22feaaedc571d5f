//! The raw input owned by the form aggregator.

use cardform_core::{ExpiryDate, InstallmentPlan};

/// Everything the shopper has typed or picked so far. Owned exclusively by
/// the aggregator; components only ever see derived snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardInputData {
	pub card_number: String,
	pub expiry: ExpiryDate,
	pub cvc: String,
	pub holder_name: String,
	pub installment: Option<InstallmentPlan>,
	pub address: AddressInput,
	/// Dual-brand choice; `None` means the first candidate governs.
	pub selected_brand_index: Option<usize>,
}

/// Raw address fields, passed through to the external address subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressInput {
	pub postal_code: String,
	pub street: String,
	pub house_number: String,
	pub city: String,
	pub state_or_province: String,
	pub country: String,
}
