//! Slot value → currency symbol resolution.
//!
//! The voice platform hands us whatever the user said ("Ether", "pounds
//! stirling", ...). Resolution is an exact, case-insensitive lookup against
//! fixed alias tables; an absent slot falls back to the default currency.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cryptocurrency {
    Bitcoin,
    Ether,
    Litecoin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FiatCurrency {
    UsDollar,
    Euro,
    PoundSterling,
}

const CRYPTOCURRENCY_ALIASES: &[(&str, Cryptocurrency)] = &[
    ("bitcoin", Cryptocurrency::Bitcoin),
    ("btc", Cryptocurrency::Bitcoin),
    ("ethereum", Cryptocurrency::Ether),
    ("ether", Cryptocurrency::Ether),
    ("eth", Cryptocurrency::Ether),
    ("litecoin", Cryptocurrency::Litecoin),
    ("ltc", Cryptocurrency::Litecoin),
];

const FIAT_CURRENCY_ALIASES: &[(&str, FiatCurrency)] = &[
    ("dollars", FiatCurrency::UsDollar),
    ("usd", FiatCurrency::UsDollar),
    ("us dollars", FiatCurrency::UsDollar),
    ("euros", FiatCurrency::Euro),
    ("eur", FiatCurrency::Euro),
    ("pounds", FiatCurrency::PoundSterling),
    ("pounds stirling", FiatCurrency::PoundSterling),
    ("gbp", FiatCurrency::PoundSterling),
];

impl Cryptocurrency {
    pub const DEFAULT: Self = Self::Bitcoin;

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Bitcoin => "btc",
            Self::Ether => "eth",
            Self::Litecoin => "ltc",
        }
    }

    /// Name used when the price is read back to the user.
    pub fn spoken_name(self) -> &'static str {
        match self {
            Self::Bitcoin => "bitcoin",
            Self::Ether => "ether",
            Self::Litecoin => "litecoin",
        }
    }

    pub fn from_alias(alias: &str) -> Option<Self> {
        lookup(CRYPTOCURRENCY_ALIASES, alias)
    }
}

impl FiatCurrency {
    pub const DEFAULT: Self = Self::UsDollar;

    pub fn symbol(self) -> &'static str {
        match self {
            Self::UsDollar => "usd",
            Self::Euro => "eur",
            Self::PoundSterling => "gbp",
        }
    }

    pub fn spoken_name(self) -> &'static str {
        match self {
            Self::UsDollar => "dollars",
            Self::Euro => "euros",
            Self::PoundSterling => "pounds",
        }
    }

    pub fn from_alias(alias: &str) -> Option<Self> {
        lookup(FIAT_CURRENCY_ALIASES, alias)
    }
}

fn lookup<T: Copy>(table: &[(&str, T)], alias: &str) -> Option<T> {
    let normalized = alias.to_lowercase();
    table.iter().find(|(name, _)| *name == normalized).map(|(_, value)| *value)
}

impl fmt::Display for Cryptocurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for FiatCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("unrecognized cryptocurrency `{0}`")]
    UnrecognizedCryptocurrency(String),
    #[error("unrecognized fiat currency `{0}`")]
    UnrecognizedFiatCurrency(String),
}

pub fn resolve_cryptocurrency(slot_value: Option<&str>) -> Result<Cryptocurrency, ResolutionError> {
    match slot_value {
        None => Ok(Cryptocurrency::DEFAULT),
        Some(value) => Cryptocurrency::from_alias(value)
            .ok_or_else(|| ResolutionError::UnrecognizedCryptocurrency(value.to_owned())),
    }
}

pub fn resolve_fiat_currency(slot_value: Option<&str>) -> Result<FiatCurrency, ResolutionError> {
    match slot_value {
        None => Ok(FiatCurrency::DEFAULT),
        Some(value) => FiatCurrency::from_alias(value)
            .ok_or_else(|| ResolutionError::UnrecognizedFiatCurrency(value.to_owned())),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CurrencyPair {
    pub crypto: Cryptocurrency,
    pub fiat: FiatCurrency,
}

impl CurrencyPair {
    pub fn new(crypto: Cryptocurrency, fiat: FiatCurrency) -> Self {
        Self { crypto, fiat }
    }

    /// Resolves both slots, cryptocurrency first. The fiat slot is not
    /// inspected when the cryptocurrency is unrecognized.
    pub fn resolve(
        crypto_slot: Option<&str>,
        fiat_slot: Option<&str>,
    ) -> Result<Self, ResolutionError> {
        let crypto = resolve_cryptocurrency(crypto_slot)?;
        let fiat = resolve_fiat_currency(fiat_slot)?;
        Ok(Self { crypto, fiat })
    }

    /// Path segment used by the spot price endpoint, e.g. `btc-usd`.
    pub fn code(&self) -> String {
        format!("{}-{}", self.crypto.symbol(), self.fiat.symbol())
    }
}

impl Default for CurrencyPair {
    fn default() -> Self {
        Self { crypto: Cryptocurrency::DEFAULT, fiat: FiatCurrency::DEFAULT }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.crypto, self.fiat)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        resolve_cryptocurrency, resolve_fiat_currency, Cryptocurrency, CurrencyPair, FiatCurrency,
        ResolutionError,
    };

    #[test]
    fn crypto_aliases_resolve_regardless_of_case() {
        let cases = [
            ("bitcoin", Cryptocurrency::Bitcoin),
            ("BTC", Cryptocurrency::Bitcoin),
            ("Bitcoin", Cryptocurrency::Bitcoin),
            ("ethereum", Cryptocurrency::Ether),
            ("Ether", Cryptocurrency::Ether),
            ("ETH", Cryptocurrency::Ether),
            ("litecoin", Cryptocurrency::Litecoin),
            ("ltc", Cryptocurrency::Litecoin),
            ("LiteCoin", Cryptocurrency::Litecoin),
        ];

        for (spoken, expected) in cases {
            assert_eq!(resolve_cryptocurrency(Some(spoken)), Ok(expected), "alias `{spoken}`");
        }
    }

    #[test]
    fn fiat_aliases_resolve_regardless_of_case() {
        let cases = [
            ("dollars", FiatCurrency::UsDollar),
            ("USD", FiatCurrency::UsDollar),
            ("US dollars", FiatCurrency::UsDollar),
            ("Euros", FiatCurrency::Euro),
            ("eur", FiatCurrency::Euro),
            ("pounds", FiatCurrency::PoundSterling),
            ("Pounds Stirling", FiatCurrency::PoundSterling),
            ("GBP", FiatCurrency::PoundSterling),
        ];

        for (spoken, expected) in cases {
            assert_eq!(resolve_fiat_currency(Some(spoken)), Ok(expected), "alias `{spoken}`");
        }
    }

    #[test]
    fn absent_slots_fall_back_to_bitcoin_and_dollars() {
        assert_eq!(resolve_cryptocurrency(None), Ok(Cryptocurrency::Bitcoin));
        assert_eq!(resolve_fiat_currency(None), Ok(FiatCurrency::UsDollar));
        assert_eq!(CurrencyPair::resolve(None, None), Ok(CurrencyPair::default()));
    }

    #[test]
    fn unknown_values_are_not_fuzzy_matched() {
        assert_eq!(
            resolve_cryptocurrency(Some("dogecoin")),
            Err(ResolutionError::UnrecognizedCryptocurrency("dogecoin".to_owned()))
        );
        assert!(resolve_cryptocurrency(Some("bit")).is_err());
        assert!(resolve_cryptocurrency(Some(" bitcoin")).is_err());
        assert_eq!(
            resolve_fiat_currency(Some("yen")),
            Err(ResolutionError::UnrecognizedFiatCurrency("yen".to_owned()))
        );
    }

    #[test]
    fn pair_resolution_reports_crypto_before_fiat() {
        let result = CurrencyPair::resolve(Some("dogecoin"), Some("yen"));
        assert!(matches!(result, Err(ResolutionError::UnrecognizedCryptocurrency(_))));

        let result = CurrencyPair::resolve(Some("ether"), Some("yen"));
        assert!(matches!(result, Err(ResolutionError::UnrecognizedFiatCurrency(_))));
    }

    #[test]
    fn pair_code_uses_lowercase_symbols() {
        let pair = CurrencyPair::resolve(Some("Litecoin"), Some("euros")).expect("resolves");
        assert_eq!(pair.code(), "ltc-eur");
        assert_eq!(pair.to_string(), "ltc-eur");
        assert_eq!(pair.crypto.spoken_name(), "litecoin");
        assert_eq!(pair.fiat.spoken_name(), "euros");
    }
}
