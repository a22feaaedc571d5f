//! Mock implementations of the cardform trait seams, for testing.

pub mod address;
pub mod encryptor;
pub mod lookup;

pub use address::MockAddressValidator;
pub use encryptor::MockCardEncryptor;
pub use lookup::MockBinLookupService;
