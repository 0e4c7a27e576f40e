use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wabot")]
#[command(about = "WhatsApp to Gemini relay gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Verify credentials, establish the ngrok tunnel, print the webhook URL,
    /// and serve until interrupted.
    Run {
        /// HTTP port (default from WABOT_PORT or 5000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Serve the webhook endpoint only (no credential check, no tunnel).
    Serve {
        /// HTTP port (default from WABOT_PORT or 5000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Send one WhatsApp message to TEST_PHONE_NUMBER via the Twilio REST API.
    Send {
        /// Message text
        text: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("wabot {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Run { port }) => {
            let config = load_config_or_exit(port);
            if let Err(e) = lib::bootstrap::run(config).await {
                log::error!("run failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Serve { port }) => {
            let config = load_config_or_exit(port);
            if let Err(e) = lib::bootstrap::serve(config).await {
                log::error!("serve failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Send { text }) => {
            let config = load_config_or_exit(None);
            if let Err(e) = run_send(config, text).await {
                log::error!("send failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

/// Load config from the environment; on missing values print the list and
/// exit non-zero before any network call is attempted.
fn load_config_or_exit(port: Option<u16>) -> lib::config::Config {
    match lib::config::Config::from_env() {
        Ok(mut config) => {
            if let Some(p) = port {
                config.port = p;
            }
            config
        }
        Err(missing) => {
            eprintln!("\nMissing required environment variables:");
            for name in &missing.0 {
                eprintln!("- {}", name);
            }
            std::process::exit(1);
        }
    }
}

async fn run_send(config: lib::config::Config, text: String) -> anyhow::Result<()> {
    let twilio = lib::channels::TwilioChannel::new(
        config.twilio_account_sid,
        config.twilio_auth_token,
        config.twilio_whatsapp_number,
        None,
    );
    twilio.send_message(&config.test_phone_number, &text).await?;
    println!("message sent to {}", config.test_phone_number);
    Ok(())
}
