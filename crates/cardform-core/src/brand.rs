//! Card brand identifiers.
//!
//! A [`CardBrand`] is a plain immutable value. Brands that are not part of
//! the built-in set (for example private-label programs returned by a brand
//! lookup) are carried verbatim in [`CardBrand::Other`]; no shared singleton
//! is ever mutated to represent a new variant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A card scheme or network, identified by its transaction variant string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CardBrand {
	Visa,
	Mastercard,
	AmericanExpress,
	CarteBancaire,
	Bcmc,
	Maestro,
	Discover,
	Diners,
	Jcb,
	Elo,
	Hipercard,
	Dankort,
	UnionPay,
	/// A brand outside the built-in set, carried by its tx-variant string
	/// (for example `"plcc_mc"` for a private-label program).
	Other(String),
}

impl CardBrand {
	/// The wire identifier for this brand (`"mc"`, `"visa"`, ...).
	pub fn tx_variant(&self) -> &str {
		match self {
			Self::Visa => "visa",
			Self::Mastercard => "mc",
			Self::AmericanExpress => "amex",
			Self::CarteBancaire => "cartebancaire",
			Self::Bcmc => "bcmc",
			Self::Maestro => "maestro",
			Self::Discover => "discover",
			Self::Diners => "diners",
			Self::Jcb => "jcb",
			Self::Elo => "elo",
			Self::Hipercard => "hipercard",
			Self::Dankort => "dankort",
			Self::UnionPay => "cup",
			Self::Other(variant) => variant,
		}
	}

	/// Whether this brand is a private-label program (PLCC).
	///
	/// PLCC variants are reported by brand lookup with a `plcc` prefix,
	/// e.g. `"plcc_mc"`.
	pub fn is_plcc(&self) -> bool {
		matches!(self, Self::Other(variant) if variant.starts_with("plcc"))
	}

	/// Whether this brand is a domestic network that co-badges with an
	/// international scheme.
	pub fn is_domestic_network(&self) -> bool {
		matches!(self, Self::CarteBancaire | Self::Bcmc | Self::Dankort)
	}

	/// Parses a tx-variant string into a brand, falling back to
	/// [`CardBrand::Other`] for anything unrecognized but non-empty.
	pub fn from_tx_variant(variant: &str) -> Result<Self, UnknownBrandError> {
		if variant.is_empty() {
			return Err(UnknownBrandError);
		}
		Ok(match variant {
			"visa" => Self::Visa,
			"mc" => Self::Mastercard,
			"amex" => Self::AmericanExpress,
			"cartebancaire" => Self::CarteBancaire,
			"bcmc" => Self::Bcmc,
			"maestro" => Self::Maestro,
			"discover" => Self::Discover,
			"diners" => Self::Diners,
			"jcb" => Self::Jcb,
			"elo" => Self::Elo,
			"hipercard" => Self::Hipercard,
			"dankort" => Self::Dankort,
			"cup" => Self::UnionPay,
			other => Self::Other(other.to_string()),
		})
	}
}

impl fmt::Display for CardBrand {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.tx_variant())
	}
}

impl FromStr for CardBrand {
	type Err = UnknownBrandError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_tx_variant(s)
	}
}

impl TryFrom<String> for CardBrand {
	type Error = UnknownBrandError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::from_tx_variant(&value)
	}
}

impl From<CardBrand> for String {
	fn from(brand: CardBrand) -> Self {
		brand.tx_variant().to_string()
	}
}

/// Empty tx-variant strings cannot name a brand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("empty tx variant does not identify a card brand")]
pub struct UnknownBrandError;
