//! Cosmetic card number formatting.
//!
//! Formatting only inserts grouping separators for display while typing; it
//! never influences validation, which works on the stripped digit string.

use crate::brand::CardBrand;

/// Default grouping for 16+ digit PANs.
const DEFAULT_GROUPING: &[usize] = &[4, 4, 4, 4, 3];
/// American Express groups 15 digits as 4-6-5.
const AMEX_GROUPING: &[usize] = &[4, 6, 5, 4];

/// Removes grouping separators, keeping only digits.
pub fn strip_separators(number: &str) -> String {
	number.chars().filter(char::is_ascii_digit).collect()
}

/// Formats a digit string with the grouping of the given brand.
///
/// Non-digit input characters are dropped first, so formatting an already
/// formatted string is stable: `strip(format(strip(x))) == strip(x)`.
pub fn format_card_number(number: &str, brand: Option<&CardBrand>) -> String {
	let digits = strip_separators(number);
	let grouping = match brand {
		Some(CardBrand::AmericanExpress) => AMEX_GROUPING,
		_ => DEFAULT_GROUPING,
	};

	let mut formatted = String::with_capacity(digits.len() + grouping.len());
	let mut rest = digits.as_str();
	for &group in grouping {
		if rest.is_empty() {
			break;
		}
		let take = group.min(rest.len());
		if !formatted.is_empty() {
			formatted.push(' ');
		}
		formatted.push_str(&rest[..take]);
		rest = &rest[take..];
	}
	// Anything beyond the grouping table is appended unsplit.
	if !rest.is_empty() {
		formatted.push(' ');
		formatted.push_str(rest);
	}
	formatted
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_default_grouping() {
		assert_eq!(
			format_card_number("5555444433331111", None),
			"5555 4444 3333 1111"
		);
	}

	#[test]
	fn test_nineteen_digit_grouping() {
		assert_eq!(
			format_card_number("6221555544443333111", Some(&CardBrand::UnionPay)),
			"6221 5555 4444 3333 111"
		);
	}

	#[test]
	fn test_amex_grouping() {
		assert_eq!(
			format_card_number("374251018720018", Some(&CardBrand::AmericanExpress)),
			"3742 510187 20018"
		);
	}

	#[test]
	fn test_partial_input() {
		assert_eq!(format_card_number("55554", None), "5555 4");
	}

	#[test]
	fn test_formatting_already_formatted_input_is_stable() {
		let once = format_card_number("5555444433331111", None);
		assert_eq!(format_card_number(&once, None), once);
	}

	proptest! {
		#[test]
		fn prop_round_trip_law(digits in "[0-9 ]{0,25}") {
			let stripped = strip_separators(&digits);
			let reformatted = format_card_number(&stripped, None);
			prop_assert_eq!(strip_separators(&reformatted), stripped);
		}
	}
}
