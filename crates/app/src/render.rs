//! Output renderers: aligned text, JSON and CSV.

use std::io::Write;

use api_types::report::{BalanceRow, CategoryRow, Report, SpendingRow, Summary, TransferRow};
use engine::{Currency, DisplayResolver, SettlementReport, TripSummary};
use serde::Serialize;

use crate::{error::Result, settings::OutputFormat};

fn api_currency(currency: Currency) -> api_types::Currency {
    match currency {
        Currency::Vnd => api_types::Currency::Vnd,
        Currency::Eur => api_types::Currency::Eur,
        Currency::Usd => api_types::Currency::Usd,
    }
}

/// Builds the wire report. `with_transfers` is false for the balances view.
pub fn report(
    settlement: &SettlementReport,
    resolver: &DisplayResolver,
    currency: Currency,
    with_transfers: bool,
) -> Report {
    let balances = settlement
        .balances
        .iter()
        .map(|(participant, balance)| BalanceRow {
            participant: participant.to_string(),
            label: resolver.resolve(participant),
            balance: balance.minor(),
            formatted: balance.format(currency),
        })
        .collect();
    let transfers = with_transfers.then(|| {
        settlement
            .transfers
            .iter()
            .map(|transfer| TransferRow {
                from: transfer.from.to_string(),
                to: transfer.to.to_string(),
                from_label: resolver.resolve(&transfer.from),
                to_label: resolver.resolve(&transfer.to),
                amount: transfer.amount.minor(),
                formatted: transfer.amount.format(currency),
            })
            .collect()
    });

    Report {
        currency: api_currency(currency),
        balances,
        transfers,
    }
}

pub fn summary(summary: &TripSummary, resolver: &DisplayResolver, currency: Currency) -> Summary {
    Summary {
        currency: api_currency(currency),
        total: summary.total.minor(),
        expense_count: summary.expense_count,
        participants: summary
            .by_participant
            .iter()
            .map(|(participant, spending)| SpendingRow {
                participant: participant.to_string(),
                label: resolver.resolve(participant),
                paid: spending.paid.minor(),
                share: spending.share.minor(),
            })
            .collect(),
        categories: summary
            .by_category
            .iter()
            .map(|(category, total)| CategoryRow {
                category: category.clone(),
                total: total.minor(),
            })
            .collect(),
    }
}

const BALANCE_COLUMNS: [&str; 4] = ["participant", "label", "balance", "formatted"];
const TRANSFER_COLUMNS: [&str; 6] = ["from", "to", "from_label", "to_label", "amount", "formatted"];
const SPENDING_COLUMNS: [&str; 4] = ["participant", "label", "paid", "share"];

/// Writes `rows` with a header line. `columns` is the header used when
/// there are no rows to take it from.
fn write_csv<W: Write, T: Serialize>(out: W, columns: &[&str], rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    if rows.is_empty() {
        writer.write_record(columns)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn pad_to<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0)
}

fn pad(label: &str, width: usize) -> String {
    let fill = width.saturating_sub(label.chars().count());
    format!("{label}{}", " ".repeat(fill))
}

pub fn write_report<W: Write>(mut out: W, report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, report)?;
            writeln!(out)?;
        }
        // CSV carries one table: transfers for a settlement, balances otherwise.
        OutputFormat::Csv => match &report.transfers {
            Some(transfers) => write_csv(out, &TRANSFER_COLUMNS, transfers)?,
            None => write_csv(out, &BALANCE_COLUMNS, &report.balances)?,
        },
        OutputFormat::Table => {
            let width = pad_to(report.balances.iter().map(|b| b.label.as_str()));
            writeln!(out, "Balances")?;
            for row in &report.balances {
                writeln!(out, "  {}  {:>16}", pad(&row.label, width), row.formatted)?;
            }
            if let Some(transfers) = &report.transfers {
                writeln!(out, "Transfers")?;
                if transfers.is_empty() {
                    writeln!(out, "  all settled")?;
                }
                for row in transfers {
                    writeln!(out, "  {} → {}: {}", row.from_label, row.to_label, row.formatted)?;
                }
            }
        }
    }
    Ok(())
}

pub fn write_summary<W: Write>(
    mut out: W,
    summary: &Summary,
    currency: Currency,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, summary)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(out, &SPENDING_COLUMNS, &summary.participants)?,
        OutputFormat::Table => {
            let money = |minor: i64| engine::Money::new(minor).format(currency);
            writeln!(
                out,
                "Total {} over {} expenses",
                money(summary.total),
                summary.expense_count
            )?;
            let width = pad_to(summary.participants.iter().map(|p| p.label.as_str()));
            for row in &summary.participants {
                writeln!(
                    out,
                    "  {}  paid {:>16}  share {:>16}",
                    pad(&row.label, width),
                    money(row.paid),
                    money(row.share)
                )?;
            }
            if !summary.categories.is_empty() {
                writeln!(out, "Categories")?;
                let width = pad_to(summary.categories.iter().map(|c| c.category.as_str()));
                for row in &summary.categories {
                    writeln!(out, "  {}  {:>16}", pad(&row.category, width), money(row.total))?;
                }
            }
        }
    }
    Ok(())
}
