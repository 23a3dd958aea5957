use std::fs;
use std::path::Path;
use std::sync::Arc;

use cryptoprice_skill::{CoinbaseClient, InvocationContext, RequestEnvelope, SkillDispatcher};

use crate::commands::{current_thread_runtime, load_config, CommandResult};

const COMMAND: &str = "invoke";

/// Replays one request envelope through the same dispatcher the server uses.
/// Prints the response envelope, or `null` when the request yields no payload.
pub fn run(path: &Path) -> CommandResult {
    let config = match load_config(COMMAND) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let envelope = match read_envelope(path) {
        Ok(envelope) => envelope,
        Err(message) => return CommandResult::failure(COMMAND, "envelope", message, 4),
    };

    let runtime = match current_thread_runtime(COMMAND) {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let price_source = match CoinbaseClient::from_config(&config.price_api) {
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

    let dispatcher =
        SkillDispatcher::with_price_source(config.skill.application_id, Arc::new(price_source));
    let ctx = InvocationContext::for_envelope(&envelope);

    match runtime.block_on(dispatcher.dispatch(&envelope, &ctx)) {
        Ok(result) => CommandResult::payload(COMMAND, &result.into_response()),
        Err(error) => CommandResult::failure(COMMAND, "skill", error.to_string(), 5),
    }
}

fn read_envelope(path: &Path) -> Result<RequestEnvelope, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("could not read `{}`: {error}", path.display()))?;
    RequestEnvelope::from_json(&raw)
        .map_err(|error| format!("could not parse `{}`: {error}", path.display()))
}
