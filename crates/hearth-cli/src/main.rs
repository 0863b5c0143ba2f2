//! Hearth operator CLI.
//!
//! Talks to the database directly using the same `DATABASE_URL` as the API.
//! Admin API tokens are printed once and only their digest is stored.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use hearth_api::auth::ApiToken;
use hearth_cli::{init_tracing, normalize_email};
use hearth_core::models::{NewStaffUser, StaffUser};
use hearth_core::Config;
use hearth_db::{JobRepository, NotificationRepository, StaffRepository, StaffRepositoryTrait};
use hearth_worker::{JobHandlerContext, JobQueue, JobQueueConfig, Mailer, SmtpMailer, StaffNotifier};
use serde::Serialize;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "hearth", about = "Hearth operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a staff account and print its first API token
    CreateStaff {
        /// Display name
        #[arg(long)]
        name: String,
        /// Login email, unique across staff
        #[arg(long)]
        email: String,
    },
    /// Replace a staff member's API token. The old token stops working.
    IssueToken {
        /// Staff email
        email: String,
    },
    /// Deactivate a staff account. It can no longer authenticate or receive notifications.
    DeactivateStaff {
        /// Staff email
        email: String,
    },
    /// Run every due background job once, then exit
    DrainJobs,
}

#[derive(Serialize)]
struct TokenIssued<'a> {
    staff_id: uuid::Uuid,
    email: &'a str,
    token: String,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn find_staff(repo: &StaffRepository, email: &str) -> anyhow::Result<StaffUser> {
    let email = normalize_email(email)?;
    repo.get_by_email(&email)
        .await?
        .with_context(|| format!("No staff account for {}", email))
}

async fn issue_token(repo: &StaffRepository, staff: &StaffUser) -> anyhow::Result<()> {
    let token = ApiToken::generate(staff.id);
    if !repo.set_api_token_hash(staff.id, &token.secret_hash()).await? {
        bail!("Staff account {} disappeared", staff.id);
    }
    tracing::info!(staff_id = %staff.id, "API token issued");
    print_json(&TokenIssued {
        staff_id: staff.id,
        email: &staff.email,
        token: token.to_string(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = hearth_api::setup::database::setup_database(&config).await?;
    let staff = StaffRepository::new(pool.clone());

    match cli.command {
        Commands::CreateStaff { name, email } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                bail!("Name must not be empty");
            }
            let email = normalize_email(&email)?;
            if staff.get_by_email(&email).await?.is_some() {
                bail!("A staff account for {} already exists", email);
            }
            let created = staff
                .create(NewStaffUser {
                    name,
                    email,
                    api_token_hash: None,
                })
                .await?;
            issue_token(&staff, &created).await?;
        }
        Commands::IssueToken { email } => {
            let member = find_staff(&staff, &email).await?;
            if !member.is_active {
                bail!("{} is deactivated", member.email);
            }
            issue_token(&staff, &member).await?;
        }
        Commands::DeactivateStaff { email } => {
            let member = find_staff(&staff, &email).await?;
            staff.set_active(member.id, false).await?;
            tracing::info!(staff_id = %member.id, "Staff account deactivated");
            print_json(&serde_json::json!({ "staff_id": member.id, "is_active": false }))?;
        }
        Commands::DrainJobs => {
            let mailer: Option<Arc<dyn Mailer>> = SmtpMailer::from_config(&config)
                .context("Failed to configure SMTP mailer")?
                .map(|m| Arc::new(m) as Arc<dyn Mailer>);
            let context: Arc<dyn JobHandlerContext> = Arc::new(StaffNotifier::new(
                Arc::new(staff.clone()),
                Arc::new(NotificationRepository::new(pool.clone())),
                mailer,
                &config,
            ));
            let queue = JobQueue::new_no_worker(
                Arc::new(JobRepository::new(pool)),
                JobQueueConfig::from_config(&config),
            );
            let attempts = queue.drain(context).await?;
            print_json(&serde_json::json!({ "attempts": attempts }))?;
        }
    }

    Ok(())
}
