//! Expiry date parsing and validation.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::field::{FieldState, FieldValidation, ValidationReason};
use crate::policy::FieldPolicy;

/// Cards are rejected when they claim to expire more than this many years
/// from now.
const MAXIMUM_YEARS_IN_FUTURE: i32 = 30;

/// A card expiry date as typed by the shopper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryDate {
	/// 1-12, or 0 while the field is still empty.
	pub month: u32,
	/// Four-digit year, or 0 while the field is still empty.
	pub year: i32,
}

impl ExpiryDate {
	pub fn new(month: u32, year: i32) -> Self {
		Self { month, year }
	}

	pub fn is_empty(&self) -> bool {
		self.month == 0 && self.year == 0
	}

	fn month_is_valid(&self) -> bool {
		(1..=12).contains(&self.month)
	}
}

/// A source of "now", injectable so expiry validation is deterministic in
/// tests.
pub trait Clock: Send + Sync {
	fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}
}

/// Validates an expiry date against the resolved field policy.
///
/// A date is valid when its month exists, it has not passed (a card stays
/// valid through the last day of its expiry month) and it is not
/// implausibly far in the future. An empty date is accepted when the policy
/// is optional or hidden.
pub fn validate_expiry_date(
	date: ExpiryDate,
	policy: FieldPolicy,
	clock: &dyn Clock,
) -> FieldState<ExpiryDate> {
	if date.is_empty() && policy.is_valid_when_empty() {
		return FieldState::new(date, FieldValidation::Valid);
	}
	let validation = if exists_and_is_current(date, clock) {
		FieldValidation::Valid
	} else {
		FieldValidation::invalid(ValidationReason::ExpiredOrInvalidDate)
	};
	FieldState::new(date, validation)
}

fn exists_and_is_current(date: ExpiryDate, clock: &dyn Clock) -> bool {
	if !date.month_is_valid() || date.year <= 0 {
		return false;
	}
	let now = clock.now();
	let now_index = month_index(now.year(), now.month());
	let expiry_index = month_index(date.year, date.month);
	// Still valid during the expiry month itself.
	expiry_index >= now_index && date.year <= now.year() + MAXIMUM_YEARS_IN_FUTURE
}

fn month_index(year: i32, month: u32) -> i64 {
	i64::from(year) * 12 + i64::from(month)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	/// A clock pinned to March 2026.
	struct FixedClock;

	impl Clock for FixedClock {
		fn now(&self) -> DateTime<Utc> {
			Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
		}
	}

	fn validate(date: ExpiryDate, policy: FieldPolicy) -> FieldValidation {
		validate_expiry_date(date, policy, &FixedClock).validation
	}

	#[test]
	fn test_future_date_is_valid() {
		assert_eq!(
			validate(ExpiryDate::new(3, 2030), FieldPolicy::Required),
			FieldValidation::Valid
		);
	}

	#[test]
	fn test_current_month_is_still_valid() {
		assert_eq!(
			validate(ExpiryDate::new(3, 2026), FieldPolicy::Required),
			FieldValidation::Valid
		);
	}

	#[test]
	fn test_previous_month_is_expired() {
		assert_eq!(
			validate(ExpiryDate::new(2, 2026), FieldPolicy::Required),
			FieldValidation::invalid(ValidationReason::ExpiredOrInvalidDate)
		);
	}

	#[test]
	fn test_nonexistent_month() {
		assert_eq!(
			validate(ExpiryDate::new(13, 2030), FieldPolicy::Required),
			FieldValidation::invalid(ValidationReason::ExpiredOrInvalidDate)
		);
	}

	#[test]
	fn test_implausibly_far_future() {
		assert_eq!(
			validate(ExpiryDate::new(1, 2026 + MAXIMUM_YEARS_IN_FUTURE + 1), FieldPolicy::Required),
			FieldValidation::invalid(ValidationReason::ExpiredOrInvalidDate)
		);
	}

	#[test]
	fn test_empty_date_with_optional_policy() {
		assert_eq!(
			validate(ExpiryDate::default(), FieldPolicy::Optional),
			FieldValidation::Valid
		);
		assert_eq!(
			validate(ExpiryDate::default(), FieldPolicy::Hidden),
			FieldValidation::Valid
		);
	}

	#[test]
	fn test_empty_date_with_required_policy() {
		assert_eq!(
			validate(ExpiryDate::default(), FieldPolicy::Required),
			FieldValidation::invalid(ValidationReason::ExpiredOrInvalidDate)
		);
	}
}
