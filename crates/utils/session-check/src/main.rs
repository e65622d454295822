//! # Session Check Utility
//!
//! This binary signs in with credentials from the environment and prints
//! the resulting session plus the account's joined clubs. Useful for
//! verifying collaborator configuration end to end without a UI shell.
//!
//! ## Usage
//!
//! ```bash
//! SLUGSCENE_EMAIL=slug@ucsc.edu SLUGSCENE_PASSWORD=... \
//!     cargo run --package session-check --bin session_check
//! ```
//!
//! The program will:
//! 1. Load configuration from the environment
//! 2. Classify the email (sign-in vs. sign-up routing)
//! 3. Sign in with the password
//! 4. Fetch and list the joined clubs
//!
//! Expects the usual portal environment (`IDENTITY_API_KEY`,
//! `STORE_PROJECT_ID`, optionally `SLUGSCENE_API_URL`).

use std::env;

use portal::auth::{classifier, ClassifyOutcome};
use portal::{AppConfig, Services};
use shared::utils::excerpt;

fn init_tracing() {
    let log_level = env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let filter = match log_level.as_str() {
        "trace" => tracing_subscriber::EnvFilter::new("trace"),
        "debug" => tracing_subscriber::EnvFilter::new("debug"),
        "warn" => tracing_subscriber::EnvFilter::new("warn"),
        "error" => tracing_subscriber::EnvFilter::new("error"),
        _ => tracing_subscriber::EnvFilter::new("info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    println!("============================================");
    println!("  Session Check Utility");
    println!("============================================");
    println!();

    let email = env::var("SLUGSCENE_EMAIL")
        .map_err(|_| anyhow::anyhow!("SLUGSCENE_EMAIL must be set in environment"))?;
    let password = env::var("SLUGSCENE_PASSWORD")
        .map_err(|_| anyhow::anyhow!("SLUGSCENE_PASSWORD must be set in environment"))?;

    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;
    let services = Services::from_config(&config);

    // Classify first, the way the entry screen would
    println!("Classifying {}...", email);
    let outcome = classifier::classify_email(services.identity.as_ref(), &email).await?;
    match &outcome {
        ClassifyOutcome::SignIn => println!("  -> password sign-in"),
        ClassifyOutcome::SignUp => {
            println!("  -> no account registered for this address.");
            println!("Nothing to check.");
            return Ok(());
        }
        ClassifyOutcome::UseProvider(method) => {
            println!("  -> this address signs in through {}.", method);
            println!("Password check is not applicable.");
            return Ok(());
        }
        ClassifyOutcome::Unsupported(methods) => {
            anyhow::bail!("address uses unsupported sign-in methods: {:?}", methods);
        }
    }
    println!();

    println!("Signing in...");
    let session = services.submitter.sign_in(&email, &password).await?;
    println!("Signed in successfully.");
    println!();
    println!("  user id:      {}", session.user_id);
    println!("  email:        {}", session.email);
    println!(
        "  display name: {}",
        session.display_name.as_deref().unwrap_or("(none)")
    );
    if let Some(expires_at) = session.expires_at {
        println!("  token expiry: {}", expires_at);
    }
    println!();

    println!("Fetching joined clubs...");
    let clubs = services.membership.joined_clubs().await?;

    if clubs.is_empty() {
        println!("No joined clubs.");
    } else {
        println!("Joined {} club(s):", clubs.len());
        for club in &clubs {
            println!("  - {} ({})", club.name, club.club_id);
            println!("      {}", excerpt(&club.description, 72));
        }
    }

    println!();
    println!("Session check complete.");

    Ok(())
}
