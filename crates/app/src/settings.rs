//! Handles settings for the application.
//!
//! Values are layered: built-in defaults, then the optional TOML file
//! (`config/tripsplit.toml` or `--config`), then `TRIPSPLIT_*` environment
//! variables, then command line flags.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tripsplit.toml";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level for the `tracing` subscriber.
    pub level: String,
    /// Overrides the trip file's `current_user`.
    pub current_user: Option<String>,
    pub self_label: String,
    pub format: OutputFormat,
    /// Abort on the first invalid expense instead of skipping it.
    pub strict: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            current_user: None,
            self_label: engine::DEFAULT_SELF_LABEL.to_string(),
            format: OutputFormat::Table,
            strict: true,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tripsplit")]
#[command(about = "Split trip expenses and compute who pays whom")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    pub config: Option<String>,
    /// Override log level (e.g. debug).
    #[arg(long)]
    pub level: Option<String>,
    /// Override output format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Override the participant viewing the trip.
    #[arg(long = "me")]
    pub current_user: Option<String>,
    /// Label used for the viewing participant (e.g. "me").
    #[arg(long)]
    pub self_label: Option<String>,
    /// Skip invalid expenses with a warning instead of failing.
    #[arg(long)]
    pub lenient: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Net balance of every participant.
    Balances { trip: PathBuf },
    /// Balances and the transfers that settle them.
    Settle { trip: PathBuf },
    /// Total spend, per participant and per category.
    Summary { trip: PathBuf },
    /// Settlement after removing a participant from the trip.
    RemoveParticipant { trip: PathBuf, participant: String },
}

impl Command {
    pub fn trip(&self) -> &PathBuf {
        match self {
            Command::Balances { trip }
            | Command::Settle { trip }
            | Command::Summary { trip }
            | Command::RemoveParticipant { trip, .. } => trip,
        }
    }
}

pub fn load(cli: &Cli) -> Result<Settings> {
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let builder = config::Config::builder()
        .add_source(config::File::with_name(config_path).required(cli.config.is_some()))
        .add_source(config::Environment::with_prefix("TRIPSPLIT"));
    let settings: Settings = builder.build()?.try_deserialize()?;
    Ok(apply_overrides(settings, cli))
}

fn apply_overrides(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(level) = &cli.level {
        settings.level = level.clone();
    }
    if let Some(format) = cli.format {
        settings.format = format;
    }
    if let Some(current_user) = &cli.current_user {
        settings.current_user = Some(current_user.clone());
    }
    if let Some(label) = &cli.self_label {
        settings.self_label = label.clone();
    }
    if cli.lenient {
        settings.strict = false;
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "tripsplit",
            "--format",
            "csv",
            "--me",
            "binh",
            "--lenient",
            "settle",
            "trip.json",
        ]);
        let settings = apply_overrides(Settings::default(), &cli);
        assert_eq!(settings.format, OutputFormat::Csv);
        assert_eq!(settings.current_user.as_deref(), Some("binh"));
        assert!(!settings.strict);
        assert_eq!(settings.level, "info");
        assert_eq!(cli.command.trip(), &PathBuf::from("trip.json"));
    }

    #[test]
    fn file_values_deserialize_over_defaults() {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(
                "level = \"debug\"\nformat = \"json\"\nself_label = \"me\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.level, "debug");
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.self_label, "me");
        assert!(settings.strict);
    }

    #[test]
    fn remove_participant_takes_an_id() {
        let cli = Cli::parse_from(["tripsplit", "remove-participant", "trip.json", "chi"]);
        assert!(matches!(
            cli.command,
            Command::RemoveParticipant { ref participant, .. } if participant == "chi"
        ));
    }
}
