//! Mock encryptor for testing CardEncryptor trait.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use cardform_form::{CardEncryptor, EncryptedCard, EncryptionError, UnencryptedCard};

/// Mock encryptor for testing.
///
/// Produces deterministic-looking tokens and can be configured to fail
/// the next call for testing the not-ready submission path.
pub struct MockCardEncryptor {
	fail_next: Arc<RwLock<bool>>,
	encrypt_count: Arc<RwLock<usize>>,
}

impl Default for MockCardEncryptor {
	fn default() -> Self {
		Self::new()
	}
}

impl MockCardEncryptor {
	pub fn new() -> Self {
		Self {
			fail_next: Arc::new(RwLock::new(false)),
			encrypt_count: Arc::new(RwLock::new(0)),
		}
	}

	/// Configures whether the next encryption should fail.
	pub async fn set_fail_next(&self, fail: bool) {
		*self.fail_next.write().await = fail;
	}

	/// Gets the number of encryptions performed so far.
	pub async fn encrypt_count(&self) -> usize {
		*self.encrypt_count.read().await
	}
}

#[async_trait]
impl CardEncryptor for MockCardEncryptor {
	async fn encrypt(&self, card: UnencryptedCard) -> Result<EncryptedCard, EncryptionError> {
		{
			let mut fail_next = self.fail_next.write().await;
			if *fail_next {
				*fail_next = false;
				return Err(EncryptionError::Failed(
					"Mock configured to fail".to_string(),
				));
			}
		}
		*self.encrypt_count.write().await += 1;

		let token = |field: &str| format!("mock_{field}_{}", Uuid::new_v4());
		Ok(EncryptedCard {
			encrypted_number: token("number"),
			encrypted_expiry_month: card.expiry_month.map(|_| token("month")),
			encrypted_expiry_year: card.expiry_year.map(|_| token("year")),
			encrypted_cvc: card.cvc.map(|_| token("cvc")),
		})
	}
}
