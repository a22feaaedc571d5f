//! Core card-input logic: brand detection, structural validation,
//! dual-brand resolution, field policies and installment math.
//!
//! Everything in this crate is a pure function or an immutable value.
//! The reactive form engine that drives these pieces on every keystroke
//! lives in `cardform-form`.

pub mod brand;
pub mod catalog;
pub mod detect;
pub mod dual;
pub mod expiry;
pub mod field;
pub mod format;
pub mod installments;
pub mod number;
pub mod policy;

pub use brand::{CardBrand, UnknownBrandError};
pub use catalog::{BrandRule, PrefixRange, brand_rules, estimate_brands};
pub use detect::{DetectedBrand, detect_locally};
pub use dual::{DualBrandState, is_dual_branded, resolve_dual_brands, sort_brands};
pub use expiry::{Clock, ExpiryDate, SystemClock, validate_expiry_date};
pub use field::{FieldState, FieldValidation, ValidationReason};
pub use format::{format_card_number, strip_separators};
pub use installments::{
	Amount, InstallmentConfig, InstallmentOption, InstallmentOptions, InstallmentPlan, PlanType,
	build_installment_options,
};
pub use number::{
	CardNumberValidation, MAXIMUM_CARD_NUMBER_LENGTH, luhn_checksum_valid, validate_card_number,
};
pub use policy::{FieldKind, FieldPolicy, PolicyFlags, resolve_field_policy};
