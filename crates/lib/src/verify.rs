//! One-shot credential verification against both providers at startup.

use crate::channels::TwilioChannel;
use crate::llm::GeminiClient;

/// Exactly one read-only call per provider: fetch the Twilio account record
/// and issue a trivial generation request. Any failure is overall failure;
/// there is no partial-success signaling.
pub async fn verify_credentials(
    twilio: &TwilioChannel,
    gemini: &GeminiClient,
    model: &str,
) -> bool {
    match twilio.fetch_account().await {
        Ok(name) => log::info!("twilio credentials verified (account: {})", name),
        Err(e) => {
            log::error!("twilio credential check failed: {}", e);
            return false;
        }
    }
    match gemini.generate(model, "Test").await {
        Ok(_) => log::info!("gemini api credentials verified"),
        Err(e) => {
            log::error!("gemini credential check failed: {}", e);
            return false;
        }
    }
    true
}
