use clap::Parser;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use settlement_orchestrator::application::orchestrator::Orchestrator;
use settlement_orchestrator::application::status::TransactionView;
use settlement_orchestrator::config::SimulationConfig;
use settlement_orchestrator::domain::ports::{ClockRef, NotifierRef, TransactionStoreRef};
use settlement_orchestrator::domain::run::RunSnapshot;
use settlement_orchestrator::domain::transaction::TransactionId;
use settlement_orchestrator::infrastructure::clock::{InstantClock, TokioClock};
use settlement_orchestrator::infrastructure::in_memory::InMemoryTransactionStore;
use settlement_orchestrator::infrastructure::notifier::LogNotifier;
use settlement_orchestrator::interfaces::csv::intake_reader::IntakeReader;
use std::fs::File;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Intake CSV file with `origin, amount` rows
    input: PathBuf,

    /// Run the settlement simulation for every registered transaction
    #[arg(long)]
    simulate: bool,

    /// Skip the simulated step delays
    #[arg(long)]
    fast: bool,
}

#[derive(Serialize)]
struct Listing {
    transactions: Vec<TransactionView>,
}

#[derive(Serialize)]
struct RunReport<'a> {
    tx_id: &'a TransactionId,
    run: RunSnapshot,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "settlement_orchestrator=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();

    let cli = Cli::parse();
    let config = SimulationConfig::from_env().into_diagnostic()?;

    let store: TransactionStoreRef = Arc::new(InMemoryTransactionStore::new());
    let clock: ClockRef = if cli.fast {
        Arc::new(InstantClock)
    } else {
        Arc::new(TokioClock)
    };
    let notifier: NotifierRef = Arc::new(LogNotifier);
    let orchestrator = Orchestrator::new(store, clock, notifier, &config);

    // Register every intake row
    let file = File::open(&cli.input).into_diagnostic()?;
    for record in IntakeReader::new(file).records() {
        match record {
            Ok(record) => {
                if let Err(e) = orchestrator
                    .create_transaction(record.origin, record.amount)
                    .await
                {
                    tracing::warn!("Error creating transaction: {e}");
                }
            }
            Err(e) => {
                tracing::warn!("Error reading intake record: {e}");
            }
        }
    }

    let status = orchestrator.status();
    let transactions = status.list_transactions().await.into_diagnostic()?;
    let ids: Vec<TransactionId> = transactions.iter().map(|t| t.tx_id.clone()).collect();
    println!(
        "{}",
        serde_json::to_string(&Listing { transactions }).into_diagnostic()?
    );

    if !cli.simulate {
        return Ok(());
    }

    for id in &ids {
        if let Err(e) = orchestrator.start(id).await {
            tracing::warn!("Error starting simulation: {e}");
        }
    }
    orchestrator.shutdown().await.into_diagnostic()?;

    for id in &ids {
        let report = RunReport {
            tx_id: id,
            run: status.get_run(id).await,
        };
        println!("{}", serde_json::to_string(&report).into_diagnostic()?);
    }

    Ok(())
}
