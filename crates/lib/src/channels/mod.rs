//! Messaging provider channel (Twilio WhatsApp).
//!
//! REST client for account lookup and outbound messages, plus the TwiML
//! reply document the webhook returns to Twilio.

mod twilio;

pub use twilio::{MessagingResponse, TwilioChannel, TwilioError};
