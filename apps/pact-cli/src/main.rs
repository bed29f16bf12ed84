//! # pact-cli
//!
//! Command-line driver for the Pact agreement workflow.
//!
//! Drafts are filled from flags, validated locally, previewed, and
//! submitted to the agreements backend — blocking by default, or detached
//! with `--detach` where the submission keeps running while the command
//! moves on and the outcome arrives as a toast-style notice.
//!
//! ## Usage
//!
//! ```text
//! pact create --title "MSA" --reference REF-1 --agreement-type 2 \
//!     --department 5 --party 9 --start 2025-01-01 --expiry 2025-12-31 \
//!     --reminder 2025-06-01 --attachment ./contract.pdf
//! pact edit 42 --expiry 2026-12-31
//! pact show 42
//! pact test-reminder 42
//! pact stats --watch
//! ```

mod config;
mod render;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pact_client::{AgreementApi, HttpAgreementApi, StatsPoller};
use pact_draft::Attachment;
use pact_workflow::{
    AccessGate, AgreementSummary, ChannelSink, GateState, LogSink, NoticeBus, SaveResult,
    WorkflowController,
};

use config::PactConfig;
use render::{print_errors, print_notice, print_stats, print_summary};

/// Agreement drafting workflow CLI.
#[derive(Parser)]
#[command(name = "pact", about = "Draft, preview and submit agreements")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "pact.toml")]
    config: PathBuf,

    /// Backend base URL (overrides config and environment).
    #[arg(long)]
    base_url: Option<String>,

    /// Bearer token (overrides config and environment).
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Draft and submit a new agreement.
    Create(DraftArgs),

    /// Edit a persisted agreement.
    Edit {
        /// Database id of the agreement.
        id: i64,
        #[command(flatten)]
        fields: DraftArgs,
    },

    /// Show the normalized view of a persisted agreement.
    Show {
        /// Database id of the agreement.
        id: i64,
    },

    /// Send a test reminder for a persisted agreement.
    TestReminder {
        /// Database id of the agreement.
        id: i64,
    },

    /// Print dashboard statistics.
    Stats {
        /// Keep polling on a fixed interval instead of a single fetch.
        #[arg(long)]
        watch: bool,

        /// Polling interval in seconds.
        #[arg(long, default_value_t = 30)]
        interval: u64,
    },
}

/// Draft field flags shared by create and edit.
#[derive(Args)]
struct DraftArgs {
    #[arg(long)]
    title: Option<String>,

    /// Caller-assigned agreement reference.
    #[arg(long)]
    reference: Option<String>,

    /// Agreement type id.
    #[arg(long)]
    agreement_type: Option<i64>,

    /// Department id.
    #[arg(long)]
    department: Option<i64>,

    /// Vendor id of the counterparty.
    #[arg(long)]
    party: Option<i64>,

    #[arg(long)]
    start: Option<NaiveDate>,

    #[arg(long)]
    expiry: Option<NaiveDate>,

    #[arg(long)]
    reminder: Option<NaiveDate>,

    /// Path of a file to upload as the attachment.
    #[arg(long)]
    attachment: Option<PathBuf>,

    #[arg(long)]
    remarks: Option<String>,

    /// Submit in the background after the preview instead of waiting.
    #[arg(long)]
    detach: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let mut config = PactConfig::load(&cli.config)?.with_env();
    if let Some(base_url) = cli.base_url {
        config.base_url = Some(base_url);
    }
    if let Some(token) = cli.token {
        config.token = Some(token);
    }
    let api = Arc::new(HttpAgreementApi::new(config.session()?));

    match cli.command {
        Command::Create(fields) => {
            ensure_allowed(api.as_ref()).await?;
            run_create(api, fields).await
        }
        Command::Edit { id, fields } => {
            ensure_allowed(api.as_ref()).await?;
            run_edit(api, id, fields).await
        }
        Command::Show { id } => run_show(api, id).await,
        Command::TestReminder { id } => run_test_reminder(api, id).await,
        Command::Stats { watch, interval } => run_stats(api, watch, interval).await,
    }
}

/// Gate the create/edit paths behind the capability probe. A denial is a
/// role restriction with its own view, not an error banner.
async fn ensure_allowed(api: &HttpAgreementApi) -> Result<()> {
    let mut gate = AccessGate::new();
    if gate.probe(api).await == GateState::Denied {
        eprintln!("Access denied");
        eprintln!("Executive users cannot create or edit agreements; existing agreements can still be viewed with `pact show`.");
        std::process::exit(2);
    }
    Ok(())
}

fn notice_bus() -> (Arc<NoticeBus>, tokio::sync::mpsc::UnboundedReceiver<pact_workflow::Notice>) {
    let (sink, rx) = ChannelSink::new();
    let mut bus = NoticeBus::new();
    bus.add_sink(Box::new(LogSink));
    bus.add_sink(Box::new(sink));
    (Arc::new(bus), rx)
}

fn apply_fields(
    controller: &mut WorkflowController<HttpAgreementApi>,
    fields: &DraftArgs,
) -> Result<()> {
    if let Some(title) = &fields.title {
        controller.set_title(title);
    }
    if let Some(reference) = &fields.reference {
        controller.set_reference(reference);
    }
    if let Some(agreement_type) = fields.agreement_type {
        controller.set_agreement_type(agreement_type);
    }
    if let Some(department) = fields.department {
        controller.set_department(department);
    }
    if let Some(party) = fields.party {
        controller.set_party(party);
    }
    if let Some(start) = fields.start {
        controller.set_start_date(start);
    }
    if let Some(expiry) = fields.expiry {
        controller.set_expiry_date(expiry);
    }
    if let Some(reminder) = fields.reminder {
        controller.set_reminder_date(reminder);
    }
    if let Some(path) = &fields.attachment {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "attachment".to_string());
        controller.attach(Attachment::upload(file_name, bytes));
    }
    if let Some(remarks) = &fields.remarks {
        controller.set_remarks(remarks);
    }
    Ok(())
}

/// Shared tail of create and edit: preview, then submit.
async fn finish(
    mut controller: WorkflowController<HttpAgreementApi>,
    mut notices: tokio::sync::mpsc::UnboundedReceiver<pact_workflow::Notice>,
    detach: bool,
) -> Result<()> {
    if !controller.request_preview()? {
        print_errors(controller.errors());
        std::process::exit(1);
    }
    print_summary(&controller.preview());
    println!();

    if detach {
        controller.submit_and_continue()?;
        println!("Submitting in the background...");
        // The submission races the command's exit; wait for the toast so
        // the outcome is visible in a terminal session.
        if let Some(notice) = notices.recv().await {
            print_notice(&notice);
        }
        return Ok(());
    }

    match controller.save().await? {
        SaveResult::Saved => {
            if let Ok(notice) = notices.try_recv() {
                print_notice(&notice);
            }
            Ok(())
        }
        SaveResult::Rejected => {
            print_errors(controller.errors());
            std::process::exit(1);
        }
    }
}

async fn run_create(api: Arc<HttpAgreementApi>, fields: DraftArgs) -> Result<()> {
    let (bus, notices) = notice_bus();
    let mut controller = WorkflowController::create(api, bus).await?;
    apply_fields(&mut controller, &fields)?;
    finish(controller, notices, fields.detach).await
}

async fn run_edit(api: Arc<HttpAgreementApi>, id: i64, fields: DraftArgs) -> Result<()> {
    let (bus, notices) = notice_bus();
    let mut controller = WorkflowController::edit(api, bus, id).await?;
    apply_fields(&mut controller, &fields)?;
    finish(controller, notices, false).await
}

/// View path: deliberately avoids the privileged form-metadata endpoint so
/// restricted users can still look at existing agreements.
async fn run_show(api: Arc<HttpAgreementApi>, id: i64) -> Result<()> {
    let record = api.agreement(id).await?;
    let users = api.users_with_access(id).await.unwrap_or_default();
    let vendors = api.vendors().await.unwrap_or_default();
    let draft = pact_draft::AgreementDraft::hydrate(record, None);
    let summary = AgreementSummary::assemble(
        &draft,
        &pact_client::FormMetadata::default(),
        &vendors,
        users,
        None,
    );
    print_summary(&summary);
    Ok(())
}

async fn run_test_reminder(api: Arc<HttpAgreementApi>, id: i64) -> Result<()> {
    let receipt = api.test_reminder(id).await?;
    if receipt.success {
        match receipt.email {
            Some(email) => println!("Test reminder sent to {email}."),
            None => println!("Test reminder sent."),
        }
    } else {
        let message = receipt
            .message
            .or(receipt.error)
            .unwrap_or_else(|| "Test reminder failed".to_string());
        eprintln!("Test reminder failed: {message}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run_stats(api: Arc<HttpAgreementApi>, watch: bool, interval: u64) -> Result<()> {
    if !watch {
        let stats = api.dashboard_stats().await?;
        print_stats(&stats);
        return Ok(());
    }
    let (poller, mut snapshots) = StatsPoller::spawn(api, Duration::from_secs(interval));
    loop {
        tokio::select! {
            snapshot = snapshots.recv() => {
                match snapshot {
                    Some(stats) => print_stats(&stats),
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                poller.shutdown().await;
                break;
            }
        }
    }
    Ok(())
}
