//! Structural card number validation.
//!
//! Validation always operates on the separator-stripped digit string; the
//! cosmetic grouping applied while typing lives in [`crate::format`] and is
//! never consulted here.

use crate::format::strip_separators;

const MINIMUM_CARD_NUMBER_LENGTH: usize = 12;
pub const MAXIMUM_CARD_NUMBER_LENGTH: usize = 19;

/// Outcome of structural card number validation.
///
/// The checks run in a fixed priority order; the first failing check wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardNumberValidation {
	Valid,
	InvalidIllegalCharacters,
	InvalidTooShort,
	InvalidTooLong,
	InvalidUnsupportedBrand,
	InvalidLuhnCheck,
}

/// Validates a raw card number as typed, separators included.
///
/// Priority order: illegal characters, too short (< 12 digits), too long
/// (> 19 digits), unsupported brand, Luhn. `enable_luhn_check` is off for
/// the rare brands whose numbers carry no checksum.
pub fn validate_card_number(
	number: &str,
	enable_luhn_check: bool,
	is_brand_supported: bool,
) -> CardNumberValidation {
	if !is_digits_and_separators_only(number) {
		return CardNumberValidation::InvalidIllegalCharacters;
	}
	let digits = strip_separators(number);
	if digits.len() < MINIMUM_CARD_NUMBER_LENGTH {
		return CardNumberValidation::InvalidTooShort;
	}
	if digits.len() > MAXIMUM_CARD_NUMBER_LENGTH {
		return CardNumberValidation::InvalidTooLong;
	}
	if !is_brand_supported {
		return CardNumberValidation::InvalidUnsupportedBrand;
	}
	if enable_luhn_check && !luhn_checksum_valid(&digits) {
		return CardNumberValidation::InvalidLuhnCheck;
	}
	CardNumberValidation::Valid
}

/// Standard mod-10 checksum: double every second digit from the right,
/// subtract 9 when the doubled digit exceeds 9, and require the sum to be
/// divisible by 10.
pub fn luhn_checksum_valid(digits: &str) -> bool {
	let mut sum = 0u32;
	for (i, c) in digits.bytes().rev().enumerate() {
		let digit = u32::from(c - b'0');
		if i % 2 == 1 {
			let doubled = digit * 2;
			sum += if doubled > 9 { doubled - 9 } else { doubled };
		} else {
			sum += digit;
		}
	}
	sum % 10 == 0
}

fn is_digits_and_separators_only(number: &str) -> bool {
	number.chars().all(|c| c.is_ascii_digit() || c == ' ')
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_valid_mastercard_number() {
		assert_eq!(
			validate_card_number("5454545454545454", true, true),
			CardNumberValidation::Valid
		);
	}

	#[test]
	fn test_separators_are_ignored() {
		assert_eq!(
			validate_card_number("5454 5454 5454 5454", true, true),
			CardNumberValidation::Valid
		);
	}

	#[test]
	fn test_illegal_characters_win_over_length() {
		assert_eq!(
			validate_card_number("4111a", true, true),
			CardNumberValidation::InvalidIllegalCharacters
		);
	}

	#[test]
	fn test_too_short_regardless_of_flags() {
		for luhn in [true, false] {
			for supported in [true, false] {
				assert_eq!(
					validate_card_number("1234123", luhn, supported),
					CardNumberValidation::InvalidTooShort
				);
			}
		}
	}

	#[test]
	fn test_too_long() {
		assert_eq!(
			validate_card_number("41111111111111111111", true, true),
			CardNumberValidation::InvalidTooLong
		);
	}

	#[test]
	fn test_unsupported_brand_beats_luhn() {
		// Luhn-invalid digits, but the unsupported-brand verdict comes first.
		assert_eq!(
			validate_card_number("8475178972356236", true, false),
			CardNumberValidation::InvalidUnsupportedBrand
		);
	}

	#[test]
	fn test_luhn_failure() {
		assert_eq!(
			validate_card_number("8475178972356236", true, true),
			CardNumberValidation::InvalidLuhnCheck
		);
	}

	#[test]
	fn test_luhn_check_can_be_disabled() {
		assert_eq!(
			validate_card_number("8475178972356236", false, true),
			CardNumberValidation::Valid
		);
	}

	#[test]
	fn test_luhn_checksum() {
		assert!(luhn_checksum_valid("5454545454545454"));
		assert!(luhn_checksum_valid("4111111111111111"));
		assert!(!luhn_checksum_valid("4111111111111112"));
	}

	proptest! {
		// Any digit string completed with its Luhn check digit validates.
		#[test]
		fn prop_completed_luhn_numbers_validate(body in "[0-9]{11,18}") {
			let check = (0..10)
				.map(|d| format!("{body}{d}"))
				.find(|candidate| luhn_checksum_valid(candidate))
				.unwrap();
			prop_assert_eq!(
				validate_card_number(&check, true, true),
				CardNumberValidation::Valid
			);
		}
	}
}
