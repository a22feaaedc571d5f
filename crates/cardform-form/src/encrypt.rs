//! Seam to the encryption subsystem.
//!
//! The engine never sends plain card data anywhere itself; a [`CardEncryptor`]
//! turns a valid snapshot's sensitive fields into opaque tokens. It is only
//! ever invoked on a snapshot that validated successfully.

use async_trait::async_trait;
use thiserror::Error;

/// Plain card fields handed to the encryptor.
///
/// Does not implement `Debug` or `Display` so sensitive data cannot end up
/// in logs by accident.
#[derive(Clone)]
pub struct UnencryptedCard {
	pub number: String,
	/// 1-12; `None` when the expiry field is hidden or empty.
	pub expiry_month: Option<u32>,
	pub expiry_year: Option<i32>,
	/// `None` when the CVC field is hidden or empty.
	pub cvc: Option<String>,
	pub holder_name: Option<String>,
}

/// The encrypted counterpart, safe to carry in a payment payload.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EncryptedCard {
	pub encrypted_number: String,
	pub encrypted_expiry_month: Option<String>,
	pub encrypted_expiry_year: Option<String>,
	pub encrypted_cvc: Option<String>,
}

/// Encryption subsystem errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncryptionError {
	/// The encryption key material is missing or unusable
	#[error("no usable public key: {0}")]
	InvalidKey(String),

	/// The encryption operation itself failed
	#[error("encryption failed: {0}")]
	Failed(String),
}

/// External encryption subsystem.
#[async_trait]
pub trait CardEncryptor: Send + Sync {
	async fn encrypt(&self, card: UnencryptedCard) -> Result<EncryptedCard, EncryptionError>;
}
