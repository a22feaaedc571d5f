//! Outbound payment payload construction.
//!
//! Maps a published snapshot into the payment-method payload. Never
//! raises: an incomplete snapshot or a failed encryption both yield a
//! state the caller can inspect instead of submit.

use serde::{Deserialize, Serialize};

use cardform_core::{FieldPolicy, InstallmentPlan, strip_separators};

use crate::encrypt::{CardEncryptor, EncryptedCard, UnencryptedCard};
use crate::snapshot::CardOutputData;

/// Digits of the card number that travel in clear as the BIN.
const BIN_LENGTH: usize = 6;

/// The payment-method payload for a submitted card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentData {
	/// Always `"scheme"` for card payments.
	pub payment_method_type: String,
	pub encrypted_card: EncryptedCard,
	/// Transaction variant of the brand that governs the payment, when
	/// reliably known.
	pub brand: Option<String>,
	pub bin: String,
	pub last_four: String,
	pub holder_name: Option<String>,
	pub installment: Option<InstallmentPlan>,
}

/// Readiness of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardComponentState {
	pub payment_data: Option<PaymentData>,
	/// Whether the snapshot passed validation.
	pub is_input_valid: bool,
	/// Whether encryption produced a usable payload.
	pub is_ready: bool,
}

impl CardComponentState {
	/// True only when the payload exists and may be submitted.
	pub fn is_valid(&self) -> bool {
		self.is_input_valid && self.is_ready && self.payment_data.is_some()
	}

	fn invalid_input() -> Self {
		Self {
			payment_data: None,
			is_input_valid: false,
			is_ready: true,
		}
	}

	fn not_ready() -> Self {
		Self {
			payment_data: None,
			is_input_valid: true,
			is_ready: false,
		}
	}
}

/// Builds the component state for a snapshot.
///
/// The encryptor only ever sees a snapshot that validated; hidden fields
/// are omitted from the material handed to it.
pub async fn create_component_state(
	snapshot: &CardOutputData,
	encryptor: &dyn CardEncryptor,
) -> CardComponentState {
	if !snapshot.is_valid {
		return CardComponentState::invalid_input();
	}

	let digits = strip_separators(&snapshot.card_number.value);
	let cvc_hidden = snapshot.field_policies.get("cvc") == Some(&FieldPolicy::Hidden);
	let expiry_hidden = snapshot.field_policies.get("expiry") == Some(&FieldPolicy::Hidden);
	let holder_name = if snapshot.holder_name.value.trim().is_empty() {
		None
	} else {
		Some(snapshot.holder_name.value.clone())
	};

	let card = UnencryptedCard {
		number: digits.clone(),
		expiry_month: (!expiry_hidden && !snapshot.expiry.value.is_empty())
			.then_some(snapshot.expiry.value.month),
		expiry_year: (!expiry_hidden && !snapshot.expiry.value.is_empty())
			.then_some(snapshot.expiry.value.year),
		cvc: (!cvc_hidden && !snapshot.cvc.value.is_empty()).then(|| snapshot.cvc.value.clone()),
		holder_name: holder_name.clone(),
	};

	let encrypted_card = match encryptor.encrypt(card).await {
		Ok(encrypted) => encrypted,
		Err(error) => {
			tracing::warn!(%error, "card encryption failed");
			return CardComponentState::not_ready();
		}
	};

	let brand = snapshot
		.brands
		.selected()
		.filter(|c| c.reliable)
		.map(|c| c.brand.tx_variant().to_string());

	CardComponentState {
		payment_data: Some(PaymentData {
			payment_method_type: "scheme".to_string(),
			encrypted_card,
			brand,
			bin: digits.chars().take(BIN_LENGTH).collect(),
			last_four: last_four(&digits),
			holder_name,
			installment: snapshot.installment.value.clone(),
		}),
		is_input_valid: true,
		is_ready: true,
	}
}

fn last_four(digits: &str) -> String {
	digits
		.chars()
		.skip(digits.chars().count().saturating_sub(4))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::encrypt::EncryptionError;
	use async_trait::async_trait;
	use cardform_core::{FieldState, FieldValidation};

	struct EchoEncryptor;

	#[async_trait]
	impl CardEncryptor for EchoEncryptor {
		async fn encrypt(&self, card: UnencryptedCard) -> Result<EncryptedCard, EncryptionError> {
			Ok(EncryptedCard {
				encrypted_number: format!("enc:{}", card.number),
				encrypted_expiry_month: card.expiry_month.map(|m| format!("enc:{m}")),
				encrypted_expiry_year: card.expiry_year.map(|y| format!("enc:{y}")),
				encrypted_cvc: card.cvc.map(|c| format!("enc:{c}")),
			})
		}
	}

	struct BrokenEncryptor;

	#[async_trait]
	impl CardEncryptor for BrokenEncryptor {
		async fn encrypt(&self, _: UnencryptedCard) -> Result<EncryptedCard, EncryptionError> {
			Err(EncryptionError::InvalidKey("expired".to_string()))
		}
	}

	fn valid_snapshot() -> CardOutputData {
		CardOutputData {
			card_number: FieldState::valid("5555 4444 3333 1111".to_string()),
			expiry: FieldState::valid(cardform_core::ExpiryDate::new(3, 2030)),
			cvc: FieldState::valid("737".to_string()),
			is_valid: true,
			..Default::default()
		}
	}

	#[tokio::test]
	async fn test_invalid_snapshot_never_reaches_encryptor() {
		let snapshot = CardOutputData {
			is_valid: false,
			..Default::default()
		};
		let state = create_component_state(&snapshot, &BrokenEncryptor).await;
		assert!(!state.is_valid());
		assert!(!state.is_input_valid);
		assert!(state.is_ready);
		assert!(state.payment_data.is_none());
	}

	#[tokio::test]
	async fn test_valid_snapshot_produces_payload() {
		let state = create_component_state(&valid_snapshot(), &EchoEncryptor).await;
		assert!(state.is_valid());
		let data = state.payment_data.unwrap();
		assert_eq!(data.payment_method_type, "scheme");
		assert_eq!(data.bin, "555544");
		assert_eq!(data.last_four, "1111");
		assert_eq!(data.encrypted_card.encrypted_number, "enc:5555444433331111");
		assert_eq!(data.encrypted_card.encrypted_cvc.as_deref(), Some("enc:737"));
	}

	#[tokio::test]
	async fn test_hidden_cvc_is_omitted_from_encryption() {
		let mut snapshot = valid_snapshot();
		snapshot.cvc = FieldState::new(String::new(), FieldValidation::NotApplicable);
		snapshot
			.field_policies
			.insert("cvc".to_string(), FieldPolicy::Hidden);
		let state = create_component_state(&snapshot, &EchoEncryptor).await;
		let data = state.payment_data.unwrap();
		assert!(data.encrypted_card.encrypted_cvc.is_none());
	}

	#[tokio::test]
	async fn test_encryption_failure_yields_not_ready_state() {
		let state = create_component_state(&valid_snapshot(), &BrokenEncryptor).await;
		assert!(!state.is_valid());
		assert!(state.is_input_valid);
		assert!(!state.is_ready);
		assert!(state.payment_data.is_none());
	}
}
