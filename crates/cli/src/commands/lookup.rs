use cryptoprice_core::{CurrencyPair, PriceSource};
use cryptoprice_skill::CoinbaseClient;
use serde::Serialize;

use crate::commands::{current_thread_runtime, load_config, CommandResult};

const COMMAND: &str = "lookup";

#[derive(Debug, Serialize)]
struct LookupOutput {
    pair: String,
    amount: String,
}

pub fn run(cryptocurrency: Option<&str>, fiat_currency: Option<&str>) -> CommandResult {
    let pair = match CurrencyPair::resolve(cryptocurrency, fiat_currency) {
        Ok(pair) => pair,
        Err(error) => return CommandResult::failure(COMMAND, "resolution", error.to_string(), 4),
    };

    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let runtime = match current_thread_runtime(COMMAND) {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let client = match CoinbaseClient::from_config(&config.price_api) {
        Ok(client) => client,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "runtime_init",
                format!("failed to build price api client: {error}"),
                3,
            );
        }
    };

    match runtime.block_on(client.spot_price(pair)) {
        Ok(quote) => CommandResult::payload(
            COMMAND,
            &LookupOutput { pair: quote.pair.code(), amount: quote.amount },
        ),
        Err(error) => CommandResult::failure(COMMAND, "price_lookup", error.to_string(), 5),
    }
}
