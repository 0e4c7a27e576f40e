//! Gateway HTTP server: GET / liveness, POST /webhook relay to Gemini.

use crate::channels::MessagingResponse;
use crate::llm::GeminiClient;
use anyhow::{Context, Result};
use axum::{
    extract::{rejection::FormRejection, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

const LIVENESS_BODY: &str = "WhatsApp Bot is running!";

/// Reply when the inbound body is empty after trimming; Gemini is not called.
pub const EMPTY_MESSAGE_REPLY: &str = "I received an empty message. Please send some text!";

/// Reply when the generation call fails, whatever the underlying fault.
pub const FALLBACK_REPLY: &str = "Sorry, I had trouble generating a response. Please try again.";

/// Reply when the request itself cannot be decoded.
const GENERIC_ERROR_REPLY: &str = "An error occurred";

/// Shared state for the gateway (provider client and model), constructed
/// once at startup and passed explicitly to handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub gemini: GeminiClient,
    /// Gemini model id used for every relay call.
    pub model: String,
}

/// Inbound Twilio message event (form-encoded webhook fields).
#[derive(Debug, Deserialize)]
struct WebhookForm {
    #[serde(rename = "Body", default)]
    body: String,
    #[serde(rename = "From", default)]
    from: String,
}

/// Run the gateway server; binds to `bind:port` and blocks until
/// SIGINT/SIGTERM.
pub async fn run_gateway(state: GatewayState, bind: &str, port: u16) -> Result<()> {
    let app = Router::new()
        .route("/", get(liveness))
        .route("/webhook", post(webhook))
        .with_state(state);

    let bind_addr = format!("{}:{}", bind, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received");
}

/// GET / returns a plain-text liveness string (for probes), independent of
/// provider or configuration state.
async fn liveness() -> &'static str {
    LIVENESS_BODY
}

/// POST /webhook — one inbound message event in, one TwiML reply out.
/// A malformed payload still gets a well-formed reply document with 200.
async fn webhook(
    State(state): State<GatewayState>,
    form: Result<Form<WebhookForm>, FormRejection>,
) -> impl IntoResponse {
    let reply = match form {
        Ok(Form(inbound)) => handle_inbound(&state, &inbound).await,
        Err(e) => {
            log::warn!("webhook: undecodable payload: {}", e);
            GENERIC_ERROR_REPLY.to_string()
        }
    };
    let xml = MessagingResponse::new().message(&reply).to_xml();
    ([(header::CONTENT_TYPE, "text/xml")], xml)
}

/// Pick the reply text for one inbound message: canned reply for an empty
/// body, Gemini's text on success, the fixed fallback on any provider fault.
async fn handle_inbound(state: &GatewayState, inbound: &WebhookForm) -> String {
    let text = inbound.body.trim();
    log::info!("received message {:?} from {:?}", text, inbound.from);

    if text.is_empty() {
        return EMPTY_MESSAGE_REPLY.to_string();
    }

    match state.gemini.generate(&state.model, text).await {
        Ok(reply) => {
            log::info!("gemini reply: {}", reply);
            reply
        }
        Err(e) => {
            log::warn!("gemini generate failed: {}", e);
            FALLBACK_REPLY.to_string()
        }
    }
}
