//! The reactive card form engine.
//!
//! [`CardForm`] owns the raw input, recomputes a full output snapshot on
//! every mutation and publishes it with replay-1 semantics. Remote brand
//! lookup, encryption and address validation are trait seams so an
//! embedding SDK can plug in its own transport.

pub mod address;
pub mod component;
pub mod config;
pub mod encrypt;
pub mod error;
pub mod form;
pub mod input;
pub mod lookup;
pub mod snapshot;

pub use address::{AddressOutput, AddressValidator};
pub use component::{CardComponentState, PaymentData, create_component_state};
pub use config::{AddressConfiguration, CardConfiguration, ConfigurationError};
pub use encrypt::{CardEncryptor, EncryptedCard, EncryptionError, UnencryptedCard};
pub use error::CardFormError;
pub use form::CardForm;
pub use input::{AddressInput, CardInputData};
pub use lookup::{
	BinLookupRequest, BinLookupResponse, BinLookupService, BrandDescriptor, BrandDetector,
	LookupError, LookupOutcome,
};
pub use snapshot::{CardOutputData, SnapshotStore};
