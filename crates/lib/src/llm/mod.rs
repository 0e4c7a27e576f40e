//! Generation provider client (Google Gemini).
//!
//! Single-prompt, non-streaming generateContent; the gateway relays one
//! message per request and needs nothing more.

mod gemini;

pub use gemini::{GeminiClient, GeminiError};
