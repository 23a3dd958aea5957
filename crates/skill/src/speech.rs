//! Fixed utterances the skill speaks back.

use cryptoprice_core::{PriceLookupError, PriceQuote, ResolutionError};

use crate::response::{
    build_response, build_speechlet_response, ResponseEnvelope, SessionAttributes,
};

pub const WELCOME_TITLE: &str = "Welcome to Crypto Price";
pub const GOODBYE_TITLE: &str = "Thanks for using Crypto Price!";
pub const PRICE_LOOKUP_TITLE: &str = "Price Lookup";

pub const WELCOME_SPEECH: &str = "You can retrieve current cryptocurrency spot prices from Coinbase by asking, what is the current Bitcoin price? You may indicate a different cryptocurrency or fiat currency.";
pub const WELCOME_REPROMPT: &str = "You may request current cryptocurrency spot prices from Coinbase by asking, what is the current Bitcoin price?";
pub const GOODBYE_SPEECH: &str = "Cancelling price lookup.";

pub const UNRECOGNIZED_CRYPTOCURRENCY_SPEECH: &str =
    "Sorry, I don't recognize that cryptocurrency. Please try again.";
pub const UNRECOGNIZED_CRYPTOCURRENCY_REPROMPT: &str =
    "Please specify bitcoin, litecoin, or ether. If not specified the default is bitcoin.";
pub const UNRECOGNIZED_FIAT_SPEECH: &str = "Sorry, I don't recognize that currency. Please try again.";
pub const UNRECOGNIZED_FIAT_REPROMPT: &str =
    "Please specify either US dollars, british pounds, or euros. The default is US dollars.";

pub const TIMEOUT_SPEECH: &str =
    "Coinbase did not respond with price data in time, please try again.";
pub const RETRY_REPROMPT: &str =
    "Please repeat your request. If you continue to experience errors, try again later.";
pub const LOOKUP_FAILED_SPEECH: &str =
    "Sorry, I was unable to look up the price right now. Please try again later.";

pub fn welcome() -> ResponseEnvelope {
    build_response(
        SessionAttributes::new(),
        build_speechlet_response(WELCOME_TITLE, WELCOME_SPEECH, WELCOME_REPROMPT, false),
    )
}

pub fn goodbye() -> ResponseEnvelope {
    build_response(
        SessionAttributes::new(),
        build_speechlet_response(GOODBYE_TITLE, GOODBYE_SPEECH, "", true),
    )
}

pub fn spot_price(quote: &PriceQuote) -> ResponseEnvelope {
    let speech = format!(
        "The current spot price for {} is {} {}.",
        quote.pair.crypto.spoken_name(),
        quote.amount,
        quote.pair.fiat.symbol().to_uppercase()
    );
    build_response(
        SessionAttributes::new(),
        build_speechlet_response(PRICE_LOOKUP_TITLE, speech, "", true),
    )
}

/// Clarifying prompt; the session stays open so the user can rephrase.
pub fn unrecognized_currency(error: &ResolutionError) -> ResponseEnvelope {
    let (speech, reprompt) = match error {
        ResolutionError::UnrecognizedCryptocurrency(_) => {
            (UNRECOGNIZED_CRYPTOCURRENCY_SPEECH, UNRECOGNIZED_CRYPTOCURRENCY_REPROMPT)
        }
        ResolutionError::UnrecognizedFiatCurrency(_) => {
            (UNRECOGNIZED_FIAT_SPEECH, UNRECOGNIZED_FIAT_REPROMPT)
        }
    };
    build_response(
        SessionAttributes::new(),
        build_speechlet_response(PRICE_LOOKUP_TITLE, speech, reprompt, false),
    )
}

pub fn lookup_failed(error: &PriceLookupError) -> ResponseEnvelope {
    let speechlet = match error {
        PriceLookupError::Timeout => {
            build_speechlet_response(PRICE_LOOKUP_TITLE, TIMEOUT_SPEECH, RETRY_REPROMPT, false)
        }
        PriceLookupError::Remote(messages) => build_speechlet_response(
            PRICE_LOOKUP_TITLE,
            format!("An error occurred: {}", messages.join("; ")),
            RETRY_REPROMPT,
            false,
        ),
        PriceLookupError::MalformedResponse(_) | PriceLookupError::Transport(_) => {
            build_speechlet_response(PRICE_LOOKUP_TITLE, LOOKUP_FAILED_SPEECH, "", true)
        }
    };
    build_response(SessionAttributes::new(), speechlet)
}
