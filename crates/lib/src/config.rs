//! Configuration loading from the process environment.
//!
//! Required values are checked for presence only; whether the secrets
//! actually work is established at startup by the credential verifier.

/// Environment variables that must be set (non-empty) before serving traffic.
pub const REQUIRED_VARS: [&str; 6] = [
    "GOOGLE_API_KEY",
    "TWILIO_ACCOUNT_SID",
    "TWILIO_AUTH_TOKEN",
    "TWILIO_WHATSAPP_NUMBER",
    "TEST_PHONE_NUMBER",
    "NGROK_AUTH_TOKEN",
];

/// Default Gemini model when GEMINI_MODEL is not set.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";

fn default_port() -> u16 {
    5000
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

/// Top-level application config, read once at startup and passed explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key (GOOGLE_API_KEY).
    pub google_api_key: String,

    /// Gemini model id (GEMINI_MODEL, default "gemini-2.0-flash-exp").
    pub gemini_model: String,

    /// Twilio account SID (TWILIO_ACCOUNT_SID).
    pub twilio_account_sid: String,

    /// Twilio auth token (TWILIO_AUTH_TOKEN).
    pub twilio_auth_token: String,

    /// WhatsApp sender number, e.g. "whatsapp:+14155238886" (TWILIO_WHATSAPP_NUMBER).
    pub twilio_whatsapp_number: String,

    /// Recipient for out-of-band delivery tests (TEST_PHONE_NUMBER).
    pub test_phone_number: String,

    /// ngrok auth token (NGROK_AUTH_TOKEN). Read by the ngrok binary from its
    /// own config; presence is still required so startup fails early.
    pub ngrok_auth_token: String,

    /// Port for the webhook HTTP server (WABOT_PORT, default 5000).
    pub port: u16,

    /// Bind address (WABOT_BIND, default "127.0.0.1"). The tunnel provides
    /// the public address, so loopback is the normal choice.
    pub bind: String,
}

/// One or more required environment variables are unset or blank.
#[derive(Debug, thiserror::Error)]
#[error("missing required environment variables: {}", .0.join(", "))]
pub struct MissingEnv(pub Vec<String>);

/// Env var as a trimmed non-empty string. Whitespace-only counts as unset.
fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl Config {
    /// Read configuration from the process environment. Returns the full list
    /// of missing required names so the operator can fix them in one pass.
    pub fn from_env() -> Result<Self, MissingEnv> {
        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .filter(|name| env_nonempty(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(MissingEnv(missing));
        }

        let port = env_nonempty("WABOT_PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_port);
        let bind = env_nonempty("WABOT_BIND").unwrap_or_else(default_bind);
        let gemini_model =
            env_nonempty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        Ok(Self {
            google_api_key: env_nonempty("GOOGLE_API_KEY").unwrap_or_default(),
            gemini_model,
            twilio_account_sid: env_nonempty("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            twilio_auth_token: env_nonempty("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            twilio_whatsapp_number: env_nonempty("TWILIO_WHATSAPP_NUMBER").unwrap_or_default(),
            test_phone_number: env_nonempty("TEST_PHONE_NUMBER").unwrap_or_default(),
            ngrok_auth_token: env_nonempty("NGROK_AUTH_TOKEN").unwrap_or_default(),
            port,
            bind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test covers all env scenarios sequentially: set_var/remove_var are
    // process-global and would race across parallel tests.
    #[test]
    fn from_env_reports_missing_then_loads() {
        for name in REQUIRED_VARS {
            std::env::remove_var(name);
        }
        std::env::remove_var("WABOT_PORT");
        std::env::remove_var("WABOT_BIND");
        std::env::remove_var("GEMINI_MODEL");

        let err = Config::from_env().unwrap_err();
        assert_eq!(err.0, REQUIRED_VARS.map(String::from).to_vec());

        // Whitespace-only still counts as missing.
        std::env::set_var("GOOGLE_API_KEY", "   ");
        let err = Config::from_env().unwrap_err();
        assert!(err.0.contains(&"GOOGLE_API_KEY".to_string()));

        std::env::set_var("GOOGLE_API_KEY", "gk-test");
        std::env::set_var("TWILIO_ACCOUNT_SID", "ACxxxxxxxx");
        std::env::set_var("TWILIO_AUTH_TOKEN", "secret");
        std::env::set_var("TWILIO_WHATSAPP_NUMBER", "whatsapp:+14155238886");
        std::env::set_var("TEST_PHONE_NUMBER", "whatsapp:+15551234567");
        std::env::set_var("NGROK_AUTH_TOKEN", "ngrok-test");

        let config = Config::from_env().expect("all required vars set");
        assert_eq!(config.port, 5000);
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.twilio_whatsapp_number, "whatsapp:+14155238886");

        std::env::set_var("WABOT_PORT", "8080");
        std::env::set_var("GEMINI_MODEL", "gemini-1.5-pro");
        let config = Config::from_env().expect("overrides set");
        assert_eq!(config.port, 8080);
        assert_eq!(config.gemini_model, "gemini-1.5-pro");

        // Unparseable port falls back to the default.
        std::env::set_var("WABOT_PORT", "not-a-port");
        let config = Config::from_env().expect("still loads");
        assert_eq!(config.port, 5000);

        for name in REQUIRED_VARS {
            std::env::remove_var(name);
        }
        std::env::remove_var("WABOT_PORT");
        std::env::remove_var("GEMINI_MODEL");
    }
}
