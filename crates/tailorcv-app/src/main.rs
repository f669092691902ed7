//! Composition root for the TailorCV client.
//!
//! Wires configuration, storage, backend clients, and the session shell
//! together. All behavior lives in the library crates; this binary is glue
//! plus a small command surface for driving it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tailorcv_application::{AppShell, SessionManager, SubmissionWorkflow};
use tailorcv_core::submission::{
    SubmissionStatus, FIELD_EMAIL, FIELD_JOB_DESCRIPTION, FIELD_LINKEDIN_URL,
};
use tailorcv_infrastructure::files::load_attachment;
use tailorcv_infrastructure::{ConfigService, TomlSessionStore};
use tailorcv_interaction::{AuthApiClient, PaymentSubmitClient, ResumeSubmitClient};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tailorcv")]
#[command(about = "TailorCV client shell", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve which page a path renders after boot
    Route {
        #[arg(default_value = "/generate")]
        path: String,
    },
    /// Submit a resume-generation request
    Generate {
        /// Job description to tailor the resume against
        #[arg(long)]
        job_description: String,
        /// LinkedIn profile URL as the resume source
        #[arg(long)]
        linkedin_url: Option<String>,
        /// PDF resume to upload instead of a LinkedIn URL
        #[arg(long)]
        resume: Option<PathBuf>,
        /// Email for delivery of the generated resume
        #[arg(long)]
        email: Option<String>,
    },
    /// Upload a payment screenshot for manual verification
    Payment {
        #[arg(long)]
        email: String,
        #[arg(long)]
        screenshot: PathBuf,
    },
    /// Exchange an identity-provider credential for a session
    Login {
        /// Raw credential handed back by the sign-in widget
        credential: String,
    },
    /// Sign out locally (best-effort backend invalidation)
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    // Configuration problems are reported, not panicked over.
    let config = match ConfigService::new().load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let store = Arc::new(TomlSessionStore::new()?);
    let auth = Arc::new(AuthApiClient::new(config.api_base_url.clone()));
    let sessions = Arc::new(SessionManager::new(store, auth));
    let shell = AppShell::new(sessions.clone());

    shell.boot().await;
    let session = sessions.session().await;
    match &session {
        Some(session) => tracing::info!("[App] Signed in as {}", session.user.name),
        None => tracing::info!("[App] No active session"),
    }

    match cli.command {
        Commands::Route { path } => {
            println!("{:?}", shell.view_for(&path).await);
        }
        Commands::Generate {
            job_description,
            linkedin_url,
            resume,
            email,
        } => {
            let mut client = ResumeSubmitClient::new(config.api_base_url.clone());
            if let Some(session) = &session {
                client = client.with_bearer(session.token.clone());
            }
            let workflow = SubmissionWorkflow::resume(Arc::new(client));

            workflow.set_field(FIELD_JOB_DESCRIPTION, &job_description);
            if let Some(url) = linkedin_url {
                workflow.set_field(FIELD_LINKEDIN_URL, &url);
            }
            if let Some(email) = email {
                workflow.set_field(FIELD_EMAIL, &email);
            }
            if let Some(path) = resume {
                workflow.set_file(load_attachment(&path).await?)?;
            }

            report(&workflow).await;
        }
        Commands::Payment { email, screenshot } => {
            let mut client = PaymentSubmitClient::new(config.api_base_url.clone());
            if let Some(session) = &session {
                client = client.with_bearer(session.token.clone());
            }
            let workflow = SubmissionWorkflow::payment(Arc::new(client));

            workflow.set_field(FIELD_EMAIL, &email);
            workflow.set_file(load_attachment(&screenshot).await?)?;

            report(&workflow).await;
        }
        Commands::Login { credential } => match sessions.login(&credential).await {
            Ok(session) => println!("signed in as {}", session.user.email),
            Err(e) => {
                eprintln!("{}", e.display_message());
                std::process::exit(1);
            }
        },
        Commands::Logout => {
            sessions.logout().await;
            println!("signed out");
        }
    }

    Ok(())
}

/// Runs the submission and prints its outcome.
async fn report(workflow: &SubmissionWorkflow) {
    match workflow.submit().await {
        SubmissionStatus::Succeeded => {
            let snapshot = workflow.snapshot();
            match snapshot.receipt.and_then(|r| r.resume_url) {
                Some(url) => println!("done: {}", url),
                None => println!("submitted for verification"),
            }
        }
        SubmissionStatus::Failed => {
            let snapshot = workflow.snapshot();
            eprintln!(
                "failed: {}",
                snapshot.last_error.unwrap_or_else(|| "unknown error".to_string())
            );
            std::process::exit(1);
        }
        other => {
            // incomplete request; nothing reached the network
            eprintln!("not submitted ({}): request is incomplete", other);
            std::process::exit(2);
        }
    }
}
