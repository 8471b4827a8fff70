//! # Trust-Stamp Mail Runtime
//!
//! Command line front end for the mail runtime.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize logging from the `logging` section
//! 3. Build the runtime (in-memory for `demo`, JSON files otherwise)
//! 4. Run the subcommand

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use mail_runtime::{MailRuntime, RuntimeConfig, SendRequest};
use shared_bus::{EventFilter, EventTopic};
use shared_types::{MessageId, MessageRecord};

#[derive(Debug, Parser)]
#[command(name = "mail-runtime", version, about = "Trust-stamped mail over a local store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Walk through a verified, a tampered and an unregistered message in memory.
    Demo,
    /// Register an owner address with a signer key for this run only.
    ///
    /// The directory is not saved. Use `TS_SEED_IDENTITIES` for identities
    /// later commands should see.
    Register { owner: String, key: String },
    /// Send a message through the file store.
    Send {
        from: String,
        to: String,
        subject: String,
        body: String,
        /// Hide the body until the message verifies.
        #[arg(long)]
        sealed: bool,
        /// Stamp with this key instead of the sender's registered key.
        #[arg(long)]
        signer_key: Option<String>,
    },
    /// List a user's received messages.
    Inbox { user: String },
    /// Verify one of a user's messages.
    Verify {
        user: String,
        id: String,
        /// Body to check instead of the stored one.
        #[arg(long)]
        body: Option<String>,
    },
    /// Report external mailbox changes for a while.
    Watch {
        #[arg(long, default_value_t = 10)]
        seconds: u64,
    },
}

#[derive(Serialize)]
struct InboxLine<'a> {
    id: String,
    from: &'a str,
    subject: &'a str,
    classification: String,
    body: &'a str,
}

impl<'a> From<&'a MessageRecord> for InboxLine<'a> {
    fn from(record: &'a MessageRecord) -> Self {
        Self {
            id: record.id.to_string(),
            from: &record.sender_identifier,
            subject: &record.subject,
            classification: record.classification.to_string(),
            body: record.visible_body(),
        }
    }
}

fn init_logging(config: &RuntimeConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.logging.level)
        .with_context(|| format!("Invalid log filter {:?}", config.logging.level))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(config.logging.with_target)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RuntimeConfig::from_env().context("Failed to load configuration")?;
    init_logging(&config)?;

    match cli.command {
        Command::Demo => run_demo(config).await,
        Command::Register { owner, key } => {
            let runtime = MailRuntime::with_file_store(config)?;
            let receipt = runtime.register(&owner, &key).await?;
            warn!("Registration is not persisted; set TS_SEED_IDENTITIES to keep it");
            print_json(&receipt)
        }
        Command::Send {
            from,
            to,
            subject,
            body,
            sealed,
            signer_key,
        } => {
            let runtime = MailRuntime::with_file_store(config)?;
            let receipt = runtime
                .send_message(SendRequest {
                    from,
                    to,
                    subject,
                    body,
                    sealed,
                    signer_key,
                })
                .await?;
            print_json(&receipt)
        }
        Command::Inbox { user } => {
            let runtime = MailRuntime::with_file_store(config)?;
            runtime.sign_in(&user);
            let inbox = runtime.inbox()?;
            let lines: Vec<InboxLine<'_>> = inbox.iter().map(InboxLine::from).collect();
            print_json(&lines)
        }
        Command::Verify { user, id, body } => {
            let runtime = MailRuntime::with_file_store(config)?;
            runtime.sign_in(&user);
            let message_id: MessageId = id.parse().context("Invalid message id")?;
            let body = match body {
                Some(body) => body,
                None => runtime.message(&message_id)?.original_body,
            };
            let outcome = runtime.verify_message(&message_id, &body).await?;
            print_json(&outcome)
        }
        Command::Watch { seconds } => run_watch(config, seconds).await,
    }
}

async fn run_watch(config: RuntimeConfig, seconds: u64) -> Result<()> {
    let runtime = MailRuntime::with_file_store(config)?;
    let mut events = runtime.subscribe(EventFilter::topics(vec![EventTopic::Mailbox]));
    let Some(watcher) = runtime.start_watcher()? else {
        bail!("Runtime is not file-backed");
    };
    info!(
        "Watching {:?} for {}s",
        runtime.config().storage.data_dir,
        seconds
    );

    let deadline = tokio::time::sleep(Duration::from_secs(seconds));
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            event = events.recv() => match event {
                Some(event) => print_json(&event)?,
                None => break,
            },
        }
    }
    watcher.abort();
    Ok(())
}

async fn run_demo(config: RuntimeConfig) -> Result<()> {
    const ALICE_KEY: &str = "0x1111111111111111111111111111111111111111";
    const MALLORY_KEY: &str = "0x2222222222222222222222222222222222222222";

    info!("===========================================");
    info!("  Trust-Stamp Mail Demo");
    info!("===========================================");

    let runtime = MailRuntime::in_memory(config)?;
    runtime.register("alice@example.com", ALICE_KEY).await?;
    runtime.register("bob@example.com", "0x3333333333333333333333333333333333333333").await?;

    let send = |from: &str, subject: &str, body: &str, signer_key: Option<&str>| SendRequest {
        from: from.to_string(),
        to: "bob@example.com".to_string(),
        subject: subject.to_string(),
        body: body.to_string(),
        sealed: false,
        signer_key: signer_key.map(str::to_string),
    };

    let valid = runtime
        .send_message(send("alice@example.com", "Lunch", "Noon at the usual place.", None))
        .await?;
    let tampered = runtime
        .send_message(send("alice@example.com", "Invoice", "Please pay 100 EUR.", None))
        .await?;
    let unregistered = runtime
        .send_message(send(
            "mallory@example.com",
            "Urgent",
            "Reset your password here.",
            Some(MALLORY_KEY),
        ))
        .await?;

    runtime.sign_in("bob@example.com");

    let outcome = runtime
        .verify_message(&valid.message_id, "Noon at the usual place.")
        .await?;
    info!("Scenario 1 (untouched): {} - {}", outcome.classification, outcome.reason);

    let outcome = runtime
        .verify_message(&tampered.message_id, "Please pay 900 EUR.")
        .await?;
    info!("Scenario 2 (edited body): {} - {}", outcome.classification, outcome.reason);

    let outcome = runtime
        .verify_message(&unregistered.message_id, "Reset your password here.")
        .await?;
    info!("Scenario 3 (unregistered key): {} - {}", outcome.classification, outcome.reason);

    let inbox = runtime.inbox()?;
    let lines: Vec<InboxLine<'_>> = inbox.iter().map(InboxLine::from).collect();
    print_json(&lines)
}
