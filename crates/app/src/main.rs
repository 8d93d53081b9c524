use clap::Parser;
use engine::{Engine, ParticipantId};
use settings::{Cli, Command};

mod error;
mod render;
mod settings;
mod trip;

use crate::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = settings::load(&cli)?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "tripsplit={level},engine={level}",
            level = settings.level
        ))
        .init();

    let file = trip::read(cli.command.trip())?;
    let mut trip = trip::load(file, &settings)?;
    let engine = Engine::builder()
        .currency(trip.currency)
        .strict(settings.strict)
        .build();
    tracing::info!(
        participants = trip.ledger.participants().len(),
        expenses = trip.ledger.expenses().len(),
        "trip loaded"
    );

    let stdout = std::io::stdout().lock();
    match &cli.command {
        Command::Balances { .. } => {
            let settlement = trip.ledger.report(&engine)?;
            let report = render::report(&settlement, &trip.resolver, engine.currency(), false);
            render::write_report(stdout, &report, settings.format)?;
        }
        Command::Settle { .. } => {
            let settlement = trip.ledger.report(&engine)?;
            let report = render::report(&settlement, &trip.resolver, engine.currency(), true);
            render::write_report(stdout, &report, settings.format)?;
        }
        Command::Summary { .. } => {
            let summary = trip.ledger.summary()?;
            let summary = render::summary(&summary, &trip.resolver, engine.currency());
            render::write_summary(stdout, &summary, engine.currency(), settings.format)?;
        }
        Command::RemoveParticipant { participant, .. } => {
            let participant = ParticipantId::new(participant)?;
            trip.ledger.remove_participant(&participant)?;
            tracing::info!(%participant, "participant removed, recomputing settlement");
            let settlement = trip.ledger.report(&engine)?;
            let report = render::report(&settlement, &trip.resolver, engine.currency(), true);
            render::write_report(stdout, &report, settings.format)?;
        }
    }

    Ok(())
}
