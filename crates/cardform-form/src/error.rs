//! Error types for the card form engine.
//!
//! Per-field validation problems are data inside the output snapshot and
//! never surface here; only a malformed configuration is a genuine error.
//! Encryption failure is reported through the component state instead of
//! being raised.

use thiserror::Error;

/// Card form engine errors.
#[derive(Debug, Error)]
pub enum CardFormError {
	/// The merchant configuration is malformed
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(#[from] crate::config::ConfigurationError),
}
