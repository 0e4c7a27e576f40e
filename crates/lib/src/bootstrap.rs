//! Startup sequence: credential verification, tunnel establishment, operator
//! instructions, then the blocking HTTP server.
//!
//! Linear and terminal on first failure; the CLI exits non-zero when a step
//! returns an error. The environment check happens before this module runs,
//! when the CLI loads `Config::from_env`.

use crate::channels::TwilioChannel;
use crate::config::Config;
use crate::gateway::{run_gateway, GatewayState};
use crate::llm::GeminiClient;
use crate::tunnel::NgrokTunnel;
use crate::verify::verify_credentials;
use anyhow::Result;

/// Build the provider clients from config. One-time initialization; the
/// clients are passed explicitly from here on.
fn build_clients(config: &Config) -> (GeminiClient, TwilioChannel) {
    let gemini = GeminiClient::new(config.google_api_key.clone(), None);
    let twilio = TwilioChannel::new(
        config.twilio_account_sid.clone(),
        config.twilio_auth_token.clone(),
        config.twilio_whatsapp_number.clone(),
        None,
    );
    (gemini, twilio)
}

/// Full bootstrap: verify credentials, start the ngrok tunnel, print the
/// webhook URL the operator must configure upstream, and serve until
/// shutdown. The tunnel process is stopped when the server returns.
pub async fn run(config: Config) -> Result<()> {
    let (gemini, twilio) = build_clients(&config);

    println!("\nVerifying credentials...");
    if !verify_credentials(&twilio, &gemini, &config.gemini_model).await {
        println!("\nPlease check your credentials and try again.");
        anyhow::bail!("credential verification failed");
    }

    println!("\nStarting WhatsApp bot...");
    let mut tunnel = match NgrokTunnel::start(config.port, None).await {
        Ok(t) => t,
        Err(e) => {
            log::error!("failed to establish ngrok tunnel: {}", e);
            println!("\nFailed to start ngrok tunnel.");
            println!("Please try setting up ngrok manually:");
            println!("1. Open a new terminal");
            println!("2. Run: ngrok http {}", config.port);
            println!("3. Copy the forwarding URL and update your Twilio webhook");
            anyhow::bail!("tunnel establishment failed");
        }
    };
    println!("\nNgrok tunnel established at: {}", tunnel.public_url());

    println!("\nIMPORTANT: Update your Twilio webhook URL to:");
    println!("{}/webhook", tunnel.public_url());
    println!("\nGo to Twilio Console > WhatsApp Sandbox Settings to update the URL");
    println!("\nBot is ready! You can now:");
    println!("1. Send a message to your Twilio WhatsApp number");
    println!("2. Wait for the response from Gemini");
    println!("\nPress Ctrl+C to stop the bot");

    let state = GatewayState {
        gemini,
        model: config.gemini_model.clone(),
    };
    let result = run_gateway(state, &config.bind, config.port).await;
    tunnel.stop();
    result
}

/// Serve the webhook endpoint only, skipping the credential check and the
/// tunnel. For deployments where a public URL already points at this host.
pub async fn serve(config: Config) -> Result<()> {
    let (gemini, _twilio) = build_clients(&config);
    let state = GatewayState {
        gemini,
        model: config.gemini_model.clone(),
    };
    run_gateway(state, &config.bind, config.port).await
}
