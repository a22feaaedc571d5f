//! Mock brand lookup service for testing BinLookupService trait.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use cardform_form::{BinLookupRequest, BinLookupResponse, BinLookupService, BrandDescriptor, LookupError};

/// Mock lookup service for testing.
///
/// Responses are scripted per prefix and served from memory. The mock can
/// be configured to fail the next call and to delay every response, for
/// testing the stale-response path.
pub struct MockBinLookupService {
	responses: Arc<RwLock<HashMap<String, Vec<BrandDescriptor>>>>,
	fail_next: Arc<RwLock<bool>>,
	latency: Arc<RwLock<Option<Duration>>>,
	call_count: Arc<RwLock<usize>>,
}

impl Default for MockBinLookupService {
	fn default() -> Self {
		Self::new()
	}
}

impl MockBinLookupService {
	/// Creates a mock with no scripted responses; unscripted prefixes get
	/// an empty brand list.
	pub fn new() -> Self {
		Self {
			responses: Arc::new(RwLock::new(HashMap::new())),
			fail_next: Arc::new(RwLock::new(false)),
			latency: Arc::new(RwLock::new(None)),
			call_count: Arc::new(RwLock::new(0)),
		}
	}

	/// Scripts the response for one prefix.
	///
	/// # Arguments
	///
	/// * `prefix` - The lookup window the script applies to
	/// * `brands` - The descriptors to return for it
	pub async fn script(&self, prefix: impl Into<String>, brands: Vec<BrandDescriptor>) {
		self.responses.write().await.insert(prefix.into(), brands);
	}

	/// Configures whether the next lookup should fail.
	pub async fn set_fail_next(&self, fail: bool) {
		*self.fail_next.write().await = fail;
	}

	/// Delays every response by `latency`.
	pub async fn set_latency(&self, latency: Duration) {
		*self.latency.write().await = Some(latency);
	}

	/// Gets the number of lookups received so far.
	pub async fn call_count(&self) -> usize {
		*self.call_count.read().await
	}
}

#[async_trait]
impl BinLookupService for MockBinLookupService {
	async fn lookup(&self, request: BinLookupRequest) -> Result<BinLookupResponse, LookupError> {
		*self.call_count.write().await += 1;

		if let Some(latency) = *self.latency.read().await {
			tokio::time::sleep(latency).await;
		}

		{
			let mut fail_next = self.fail_next.write().await;
			if *fail_next {
				*fail_next = false;
				return Err(LookupError::Network("Mock configured to fail".to_string()));
			}
		}

		let brands = self
			.responses
			.read()
			.await
			.get(&request.prefix)
			.cloned()
			.unwrap_or_default();
		Ok(BinLookupResponse {
			request_id: Some(request.request_id),
			brands: Some(brands),
		})
	}
}
