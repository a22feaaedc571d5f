//! Asynchronous brand confirmation.
//!
//! Local catalog matching answers immediately; once enough digits are
//! typed the detector also asks the remote lookup service for an
//! authoritative verdict. Lookups are tagged with a strictly increasing
//! version so a late response for a superseded prefix can be discarded:
//! last prefix wins, not last response.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use cardform_core::{CardBrand, DetectedBrand, FieldPolicy, detect_locally};

use crate::config::CardConfiguration;

/// Digits required before a remote lookup is worth issuing.
const REQUIRED_BIN_SIZE: usize = 11;

/// Request sent to the brand lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinLookupRequest {
	pub request_id: Uuid,
	/// The typed prefix, truncated to the BIN window.
	pub prefix: String,
	pub supported_brands: Vec<String>,
}

/// One brand as described by the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandDescriptor {
	pub brand: String,
	#[serde(default)]
	pub enable_luhn_check: Option<bool>,
	#[serde(default)]
	pub cvc_policy: Option<String>,
	#[serde(default)]
	pub expiry_date_policy: Option<String>,
	#[serde(default)]
	pub supported: Option<bool>,
	#[serde(default)]
	pub pan_length: Option<usize>,
}

/// Response from the brand lookup service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinLookupResponse {
	pub request_id: Option<Uuid>,
	#[serde(default)]
	pub brands: Option<Vec<BrandDescriptor>>,
}

/// Remote lookup failures. Never fatal: detection degrades to the
/// local-only candidate list.
#[derive(Debug, Error)]
pub enum LookupError {
	/// The service could not be reached
	#[error("lookup service unreachable: {0}")]
	Network(String),

	/// The service did not answer in time
	#[error("lookup timed out")]
	Timeout,

	/// The response body could not be decoded
	#[error("malformed lookup response: {0}")]
	Decode(#[from] serde_json::Error),
}

/// Remote brand lookup service. Timeout and retry policy belong to the
/// implementation, not to this engine.
#[async_trait]
pub trait BinLookupService: Send + Sync {
	async fn lookup(&self, request: BinLookupRequest) -> Result<BinLookupResponse, LookupError>;
}

/// A completed lookup, delivered back to the owning form.
#[derive(Debug)]
pub struct LookupOutcome {
	/// The BIN window the lookup was issued for.
	pub prefix: String,
	/// Issue-order version of this lookup.
	pub version: u64,
	/// Confirmed candidates; `None` when the service failed and the local
	/// result should simply stand.
	pub candidates: Option<Vec<DetectedBrand>>,
}

#[derive(Debug, Clone)]
enum CacheEntry {
	Loading,
	Available(Vec<DetectedBrand>),
}

/// Detects card brands, locally at once and remotely when possible.
///
/// `detect` never blocks on the network: it returns the best list known
/// right now and, when a lookup is warranted, spawns it in the background.
/// Completed lookups arrive on the channel handed out by [`BrandDetector::new`].
pub struct BrandDetector {
	service: Arc<dyn BinLookupService>,
	cache: Arc<Mutex<HashMap<String, CacheEntry>>>,
	version: Arc<AtomicU64>,
	results: mpsc::UnboundedSender<LookupOutcome>,
}

impl BrandDetector {
	/// Creates a detector and the receiving end for completed lookups.
	pub fn new(
		service: Arc<dyn BinLookupService>,
	) -> (Self, mpsc::UnboundedReceiver<LookupOutcome>) {
		let (results, rx) = mpsc::unbounded_channel();
		(
			Self {
				service,
				cache: Arc::new(Mutex::new(HashMap::new())),
				version: Arc::new(AtomicU64::new(0)),
				results,
			},
			rx,
		)
	}

	/// The version that the next issued lookup will carry.
	pub fn next_version(&self) -> u64 {
		self.version.load(Ordering::SeqCst)
	}

	/// The BIN window a lookup for `digits` would be keyed by.
	pub fn lookup_window(digits: &str) -> &str {
		&digits[..digits.len().min(REQUIRED_BIN_SIZE)]
	}

	/// Returns the current best candidate list for `digits` and issues a
	/// background lookup when one is warranted and not already underway.
	pub fn detect(&self, digits: &str, config: &CardConfiguration) -> Vec<DetectedBrand> {
		if digits.len() >= REQUIRED_BIN_SIZE {
			let window = Self::lookup_window(digits).to_string();
			let key = hash_bin(&window);
			let cached = {
				let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
				cache.get(&key).cloned()
			};
			match cached {
				Some(CacheEntry::Available(candidates)) => {
					tracing::debug!("serving brand lookup from cache");
					return candidates;
				}
				Some(CacheEntry::Loading) => {
					tracing::debug!("brand lookup already in flight");
				}
				None => self.spawn_lookup(window, key, config),
			}
		}
		detect_locally(digits, &config.supported_brands)
	}

	fn spawn_lookup(&self, window: String, key: String, config: &CardConfiguration) {
		let request = BinLookupRequest {
			request_id: Uuid::new_v4(),
			prefix: window.clone(),
			supported_brands: config
				.supported_brands
				.iter()
				.map(|b| b.tx_variant().to_string())
				.collect(),
		};
		let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
		let service = Arc::clone(&self.service);
		let cache = Arc::clone(&self.cache);
		let results = self.results.clone();
		let supported = config.supported_brands.clone();

		{
			let mut cache = cache.lock().unwrap_or_else(|e| e.into_inner());
			cache.insert(key.clone(), CacheEntry::Loading);
		}

		tracing::debug!(version, "issuing brand lookup");
		tokio::spawn(async move {
			let outcome = match service.lookup(request).await {
				Ok(response) => {
					let candidates = map_response(response, &supported);
					let mut locked = cache.lock().unwrap_or_else(|e| e.into_inner());
					locked.insert(key, CacheEntry::Available(candidates.clone()));
					Some(candidates)
				}
				Err(error) => {
					// Degrade silently to the local result; an errored
					// lookup may be retried for the same prefix later.
					tracing::warn!(%error, "brand lookup failed");
					let mut locked = cache.lock().unwrap_or_else(|e| e.into_inner());
					locked.remove(&key);
					None
				}
			};
			let _ = results.send(LookupOutcome {
				prefix: window,
				version,
				candidates: outcome,
			});
		});
	}
}

/// Maps the service response onto detected brands. Descriptors without a
/// brand name are skipped; confirmed brands are always reliable.
fn map_response(
	response: BinLookupResponse,
	supported: &std::collections::HashSet<CardBrand>,
) -> Vec<DetectedBrand> {
	response
		.brands
		.unwrap_or_default()
		.into_iter()
		.filter_map(|descriptor| {
			let brand = CardBrand::from_tx_variant(&descriptor.brand).ok()?;
			Some(DetectedBrand {
				supported: descriptor.supported.unwrap_or(true) && supported.contains(&brand),
				reliable: true,
				luhn_check: descriptor.enable_luhn_check.unwrap_or(true),
				cvc_policy: descriptor
					.cvc_policy
					.as_deref()
					.map_or(FieldPolicy::Required, FieldPolicy::parse),
				expiry_policy: descriptor
					.expiry_date_policy
					.as_deref()
					.map_or(FieldPolicy::Required, FieldPolicy::parse),
				pan_lengths: descriptor.pan_length.into_iter().collect(),
				selected: false,
				brand,
			})
		})
		.collect()
}

fn hash_bin(window: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(window.as_bytes());
	format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
	use super::*;

	struct StaticLookup {
		brands: Vec<BrandDescriptor>,
	}

	#[async_trait]
	impl BinLookupService for StaticLookup {
		async fn lookup(
			&self,
			request: BinLookupRequest,
		) -> Result<BinLookupResponse, LookupError> {
			Ok(BinLookupResponse {
				request_id: Some(request.request_id),
				brands: Some(self.brands.clone()),
			})
		}
	}

	struct FailingLookup;

	#[async_trait]
	impl BinLookupService for FailingLookup {
		async fn lookup(&self, _: BinLookupRequest) -> Result<BinLookupResponse, LookupError> {
			Err(LookupError::Network("connection refused".to_string()))
		}
	}

	fn descriptor(brand: &str) -> BrandDescriptor {
		BrandDescriptor {
			brand: brand.to_string(),
			enable_luhn_check: Some(true),
			cvc_policy: Some("required".to_string()),
			expiry_date_policy: Some("required".to_string()),
			supported: Some(true),
			pan_length: Some(16),
		}
	}

	fn visa_config() -> CardConfiguration {
		CardConfiguration {
			supported_brands: [CardBrand::Visa, CardBrand::Mastercard].into(),
			..Default::default()
		}
	}

	#[tokio::test]
	async fn test_short_input_stays_local() {
		let (detector, mut rx) = BrandDetector::new(Arc::new(StaticLookup {
			brands: vec![descriptor("visa")],
		}));
		let candidates = detector.detect("4111", &visa_config());
		assert!(!candidates.is_empty());
		assert!(candidates.iter().all(|c| !c.reliable));
		// Nothing was issued.
		assert!(rx.try_recv().is_err());
	}

	#[tokio::test]
	async fn test_lookup_issued_at_bin_size() {
		let (detector, mut rx) = BrandDetector::new(Arc::new(StaticLookup {
			brands: vec![descriptor("visa")],
		}));
		let local = detector.detect("41111111111", &visa_config());
		assert!(!local.is_empty());

		let outcome = rx.recv().await.unwrap();
		assert_eq!(outcome.prefix, "41111111111");
		assert_eq!(outcome.version, 1);
		let confirmed = outcome.candidates.unwrap();
		assert_eq!(confirmed.len(), 1);
		assert_eq!(confirmed[0].brand, CardBrand::Visa);
		assert!(confirmed[0].reliable);
	}

	#[tokio::test]
	async fn test_cache_short_circuits_second_detect() {
		let (detector, mut rx) = BrandDetector::new(Arc::new(StaticLookup {
			brands: vec![descriptor("visa")],
		}));
		detector.detect("41111111111", &visa_config());
		rx.recv().await.unwrap();

		let cached = detector.detect("41111111111", &visa_config());
		assert!(cached.iter().all(|c| c.reliable));
		// No second lookup was issued.
		assert!(rx.try_recv().is_err());
		assert_eq!(detector.next_version(), 1);
	}

	#[tokio::test]
	async fn test_failure_degrades_to_local() {
		let (detector, mut rx) = BrandDetector::new(Arc::new(FailingLookup));
		let local = detector.detect("41111111111", &visa_config());
		assert!(!local.is_empty());

		let outcome = rx.recv().await.unwrap();
		assert!(outcome.candidates.is_none());

		// The failed entry was evicted, so a retry is possible.
		detector.detect("41111111111", &visa_config());
		assert!(rx.recv().await.is_some());
	}

	#[tokio::test]
	async fn test_versions_strictly_increase() {
		let (detector, mut rx) = BrandDetector::new(Arc::new(StaticLookup {
			brands: vec![descriptor("mc")],
		}));
		detector.detect("41111111111", &visa_config());
		detector.detect("55554444333", &visa_config());
		let first = rx.recv().await.unwrap();
		let second = rx.recv().await.unwrap();
		assert!(second.version > first.version);
	}

	#[tokio::test]
	async fn test_unsupported_confirmed_brand_is_flagged() {
		let (detector, mut rx) = BrandDetector::new(Arc::new(StaticLookup {
			brands: vec![descriptor("cartebancaire")],
		}));
		detector.detect("41111111111", &visa_config());
		let outcome = rx.recv().await.unwrap();
		let confirmed = outcome.candidates.unwrap();
		assert!(!confirmed[0].supported);
	}
}
