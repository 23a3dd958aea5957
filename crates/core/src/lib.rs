pub mod config;
pub mod currency;
pub mod errors;
pub mod price;

pub use currency::{CurrencyPair, Cryptocurrency, FiatCurrency, ResolutionError};
pub use errors::{InterfaceError, SkillError};
pub use price::{PriceLookupError, PriceQuote, PriceSource};
