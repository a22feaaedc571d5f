//! The static brand catalog.
//!
//! Each rule pairs a set of BIN prefix ranges with the PAN lengths the
//! brand admits. Matching works on partially typed numbers: a typed prefix
//! is still a candidate for a range as long as the digits seen so far do
//! not rule the range out. Rule order is significant and stable; it is the
//! order candidates are reported in before dual-brand sorting.

use once_cell::sync::Lazy;

use crate::brand::CardBrand;
use crate::policy::FieldPolicy;

/// An inclusive BIN prefix interval, e.g. `51..=55` for classic Mastercard.
///
/// Both bounds must be digit strings of the same length.
#[derive(Debug, Clone, Copy)]
pub struct PrefixRange {
	lo: &'static str,
	hi: &'static str,
}

impl PrefixRange {
	const fn new(lo: &'static str, hi: &'static str) -> Self {
		Self { lo, hi }
	}

	/// Whether `digits` could still be a number inside this range.
	///
	/// Only the overlapping prefix is compared, so `"5"` is admitted by
	/// `51..=55` (more digits could land inside) while `"56"` is not.
	fn admits(&self, digits: &str) -> bool {
		let n = digits.len().min(self.lo.len());
		let seen = &digits.as_bytes()[..n];
		seen >= &self.lo.as_bytes()[..n] && seen <= &self.hi.as_bytes()[..n]
	}
}

/// One entry of the brand catalog.
#[derive(Debug)]
pub struct BrandRule {
	pub brand: CardBrand,
	ranges: &'static [PrefixRange],
	/// PAN lengths this brand admits.
	pub pan_lengths: &'static [usize],
	/// Default CVC policy when no authoritative lookup has run.
	pub cvc_policy: FieldPolicy,
	/// Whether numbers of this brand carry a Luhn checksum.
	pub luhn_check: bool,
}

impl BrandRule {
	const fn new(
		brand: CardBrand,
		ranges: &'static [PrefixRange],
		pan_lengths: &'static [usize],
	) -> Self {
		Self {
			brand,
			ranges,
			pan_lengths,
			cvc_policy: FieldPolicy::Required,
			luhn_check: true,
		}
	}

	const fn cvc(mut self, policy: FieldPolicy) -> Self {
		self.cvc_policy = policy;
		self
	}

	/// Whether `digits` (a partially or fully typed PAN) falls in this
	/// brand's ranges and does not exceed its longest admissible PAN.
	pub fn matches(&self, digits: &str) -> bool {
		digits.len() <= self.max_pan_length() && self.ranges.iter().any(|r| r.admits(digits))
	}

	/// The longest PAN this brand admits.
	pub fn max_pan_length(&self) -> usize {
		self.pan_lengths.iter().copied().max().unwrap_or(19)
	}

	/// Whether `length` is an admissible full PAN length for this brand.
	pub fn admits_pan_length(&self, length: usize) -> bool {
		self.pan_lengths.contains(&length)
	}
}

const fn r(lo: &'static str, hi: &'static str) -> PrefixRange {
	PrefixRange::new(lo, hi)
}

// Range tables live in const items so the rule slices are genuinely
// 'static; borrowing them from a runtime expression would not promote.
const AMEX_RANGES: &[PrefixRange] = &[r("34", "34"), r("37", "37")];
const DINERS_RANGES: &[PrefixRange] = &[r("300", "305"), r("36", "36"), r("38", "38")];
const JCB_RANGES: &[PrefixRange] = &[r("3528", "3589")];
const HIPERCARD_RANGES: &[PrefixRange] = &[r("606282", "606282")];
const ELO_RANGES: &[PrefixRange] = &[
	r("401178", "401179"),
	r("431274", "431274"),
	r("438935", "438935"),
	r("451416", "451416"),
	r("457393", "457393"),
	r("504175", "504175"),
	r("506699", "506778"),
	r("509000", "509999"),
];
const DANKORT_RANGES: &[PrefixRange] = &[r("5019", "5019")];
const BCMC_RANGES: &[PrefixRange] =
	&[r("6703", "6703"), r("479658", "479658"), r("606005", "606005")];
const DISCOVER_RANGES: &[PrefixRange] = &[r("6011", "6011"), r("644", "649"), r("65", "65")];
const MASTERCARD_RANGES: &[PrefixRange] = &[r("51", "55"), r("2221", "2720")];
const VISA_RANGES: &[PrefixRange] = &[r("4", "4")];
const CARTE_BANCAIRE_RANGES: &[PrefixRange] = &[r("4", "6")];
const MAESTRO_RANGES: &[PrefixRange] = &[r("50", "50"), r("56", "58"), r("60", "69")];
const UNION_PAY_RANGES: &[PrefixRange] = &[r("62", "62"), r("81", "81")];

static BRAND_RULES: Lazy<Vec<BrandRule>> = Lazy::new(|| {
	vec![
		BrandRule::new(CardBrand::AmericanExpress, AMEX_RANGES, &[15]),
		BrandRule::new(CardBrand::Diners, DINERS_RANGES, &[14]),
		BrandRule::new(CardBrand::Jcb, JCB_RANGES, &[16, 19]),
		BrandRule::new(CardBrand::Hipercard, HIPERCARD_RANGES, &[16]),
		BrandRule::new(CardBrand::Elo, ELO_RANGES, &[16]),
		BrandRule::new(CardBrand::Dankort, DANKORT_RANGES, &[16]),
		BrandRule::new(CardBrand::Bcmc, BCMC_RANGES, &[16, 17, 18, 19])
			.cvc(FieldPolicy::Hidden),
		BrandRule::new(CardBrand::Discover, DISCOVER_RANGES, &[16, 19]),
		BrandRule::new(CardBrand::Mastercard, MASTERCARD_RANGES, &[16]),
		BrandRule::new(CardBrand::Visa, VISA_RANGES, &[13, 16, 19]),
		// Carte Bancaire co-badges over the Visa and Mastercard ranges,
		// which is what makes those prefixes ambiguous locally.
		BrandRule::new(CardBrand::CarteBancaire, CARTE_BANCAIRE_RANGES, &[16, 17, 18, 19]),
		BrandRule::new(
			CardBrand::Maestro,
			MAESTRO_RANGES,
			&[12, 13, 14, 15, 16, 17, 18, 19],
		),
		BrandRule::new(
			CardBrand::UnionPay,
			UNION_PAY_RANGES,
			&[14, 15, 16, 17, 18, 19],
		),
	]
});

/// The full ordered catalog.
pub fn brand_rules() -> &'static [BrandRule] {
	&BRAND_RULES
}

/// Returns the catalog rules whose ranges still admit `digits`.
///
/// An empty input matches nothing; input longer than a rule's maximum PAN
/// length no longer matches that rule.
pub fn estimate_brands(digits: &str) -> Vec<&'static BrandRule> {
	if digits.is_empty() {
		return Vec::new();
	}
	BRAND_RULES.iter().filter(|rule| rule.matches(digits)).collect()
}
