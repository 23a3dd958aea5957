//! Crypto Price skill - voice request handling
//!
//! This crate turns voice-platform request envelopes into speech responses:
//! - **Envelope** (`envelope`) - inbound JSON request model
//! - **Dispatcher** (`dispatcher`) - application id guard and request-type routing
//! - **Intents** (`intents`) - intent classification and the price lookup flow
//! - **Speech** (`speech`) / **Response** (`response`) - speechlet builders
//! - **Coinbase** (`coinbase`) - HTTP spot price source
//!
//! # Architecture
//!
//! ```text
//! RequestEnvelope → SkillDispatcher → RequestHandler → IntentRouter → PriceSource
//!                        ↓
//!               ResponseEnvelope ← speech builders
//! ```

pub mod coinbase;
pub mod dispatcher;
pub mod envelope;
pub mod intents;
pub mod response;
pub mod speech;

pub use coinbase::CoinbaseClient;
pub use dispatcher::{HandlerResult, InvocationContext, RequestHandler, SkillDispatcher};
pub use envelope::{RequestEnvelope, RequestType, SkillRequest};
pub use response::ResponseEnvelope;
