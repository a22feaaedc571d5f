//! Card-input engine for payment acceptance.
//!
//! The `core` module holds the pure pieces: brand detection, structural
//! validation, co-badge resolution, field policies and installment math.
//! The `form` module holds the reactive engine that drives them on every
//! keystroke and publishes output snapshots.
//!
//! # Examples
//!
//! ```rust,ignore
//! use cardform::form::{CardForm, CardConfiguration};
//! ```

pub mod core {
	pub use cardform_core::*;
}

pub mod form {
	pub use cardform_form::*;
}

pub use cardform_core::{CardBrand, ExpiryDate, FieldPolicy, FieldValidation};
pub use cardform_form::{CardConfiguration, CardForm, CardOutputData};
