//! Cookies by Coffey CLI - order client and mail tooling.
//!
//! # Usage
//!
//! ```bash
//! # Place an order against a local storefront, retrying a failed send twice
//! coffey order --name "Avery" --email avery@example.com \
//!     --delivery-date 2030-05-01 --item "Sugar=12" --item "Lemon=6" \
//!     --message "Birthday party" --attempts 3
//!
//! # Render the order email for a saved order
//! coffey preview --file order.json
//!
//! # Print the Google consent URL for a new refresh token
//! coffey oauth-url
//! ```
//!
//! # Commands
//!
//! - `order` - Validate and submit an order to `/api/sendEmail`
//! - `preview` - Render the order email HTML (or text) to stdout
//! - `oauth-url` - Print the consent URL for re-authorizing the mailbox

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

mod commands;

use commands::order::{CliError, OrderArgs};

#[derive(Parser)]
#[command(name = "coffey")]
#[command(author, version, about = "Cookies by Coffey CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit an order to a running storefront
    Order {
        /// Storefront base URL
        #[arg(long, env = "COFFEY_URL", default_value = "http://127.0.0.1:3000")]
        url: String,

        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Customer email
        #[arg(short, long)]
        email: String,

        /// Phone number, digits or masked
        #[arg(short, long)]
        phone: Option<String>,

        /// Delivery date (YYYY-MM-DD or RFC 3339)
        #[arg(short, long)]
        delivery_date: String,

        /// Line item as FLAVOR=COUNT; repeat for more flavors
        #[arg(short, long = "item", value_parser = commands::order::parse_item)]
        items: Vec<(String, String)>,

        /// Message about the order
        #[arg(short, long)]
        message: String,

        /// Total submissions to try if delivery fails
        #[arg(long, default_value_t = 1)]
        attempts: u32,
    },
    /// Render the order email for a JSON order file
    Preview {
        /// Path to an order JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Print the plain-text part instead of HTML
        #[arg(long)]
        text: bool,
    },
    /// Print the Google consent URL for minting a refresh token
    OauthUrl {
        /// OAuth client ID
        #[arg(long, env = "CLIENT_ID")]
        client_id: String,

        /// Redirect URI registered for the client
        #[arg(long, env = "REDIRECT_URI")]
        redirect_uri: Url,
    },
}

#[tokio::main]
async fn main() {
    // Load .env so CLIENT_ID / REDIRECT_URI resolve like they do for the server
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coffey_cli=info,coffey=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Order {
            url,
            name,
            email,
            phone,
            delivery_date,
            items,
            message,
            attempts,
        } => {
            let args = OrderArgs {
                name,
                email,
                phone,
                delivery_date,
                items,
                message,
            };
            if let Err(err) = commands::order::place(&url, args, attempts).await {
                if let CliError::Invalid(errors) = &err {
                    commands::order::print_field_errors(errors);
                }
                return Err(err.into());
            }
        }
        Commands::Preview { file, text } => commands::preview::render(&file, text).await?,
        Commands::OauthUrl {
            client_id,
            redirect_uri,
        } => commands::oauth_url::print(&client_id, &redirect_uri)?,
    }
    Ok(())
}
