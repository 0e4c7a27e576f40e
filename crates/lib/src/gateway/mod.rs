//! Webhook gateway: liveness endpoint and the Twilio message webhook.
//!
//! The webhook contract is total: every request gets a well-formed TwiML
//! document with status 200, so Twilio never enters retry/backoff.

mod server;

pub use server::{run_gateway, GatewayState, EMPTY_MESSAGE_REPLY, FALLBACK_REPLY};
