//! Loads a trip file into the engine's ledger.

use std::path::Path;

use api_types::trip::{ExpenseEntry, SplitEntry, TripFile};
use engine::{Currency, DisplayResolver, Expense, Money, ParticipantId, TripLedger};

use crate::{
    error::{AppError, Result},
    settings::Settings,
};

pub struct Trip {
    pub currency: Currency,
    pub ledger: TripLedger,
    pub resolver: DisplayResolver,
}

fn currency(value: api_types::Currency) -> Currency {
    match value {
        api_types::Currency::Vnd => Currency::Vnd,
        api_types::Currency::Eur => Currency::Eur,
        api_types::Currency::Usd => Currency::Usd,
    }
}

pub fn read(path: &Path) -> Result<TripFile> {
    let raw = std::fs::read_to_string(path)?;
    let file = serde_json::from_str(&raw)?;
    tracing::debug!(path = %path.display(), "trip file loaded");
    Ok(file)
}

/// Builds the ledger for `file`.
///
/// With `settings.strict` an invalid expense aborts the load; otherwise it is
/// logged and skipped.
pub fn load(file: TripFile, settings: &Settings) -> Result<Trip> {
    let currency = currency(file.currency);
    let current_user = ParticipantId::new(
        settings
            .current_user
            .as_deref()
            .unwrap_or(&file.current_user),
    )?;

    let mut ledger = TripLedger::new(current_user.clone());
    // The file's list is a set: repeats, including ids equal after
    // normalization, are ignored.
    for raw in &file.participants {
        let participant = ParticipantId::new(raw)?;
        if ledger.participants().contains(&participant) {
            tracing::debug!(%participant, "duplicate participant ignored");
            continue;
        }
        ledger.add_participant(participant)?;
    }

    for (index, entry) in file.expenses.into_iter().enumerate() {
        let added =
            expense(entry, currency).and_then(|e| ledger.add_expense(e).map_err(AppError::from));
        match added {
            Ok(_) => {}
            Err(err) if settings.strict => {
                return Err(AppError::Trip(format!("expense #{}: {err}", index + 1)));
            }
            Err(err) => tracing::warn!("skipping expense #{}: {err}", index + 1),
        }
    }

    let names = file
        .names
        .into_iter()
        .map(|(id, name)| Ok((ParticipantId::new(&id)?, name)))
        .collect::<Result<Vec<_>>>()?;
    let resolver = DisplayResolver::new(current_user)
        .with_self_label(&settings.self_label)
        .with_names(names);

    Ok(Trip {
        currency,
        ledger,
        resolver,
    })
}

fn expense(entry: ExpenseEntry, currency: Currency) -> Result<Expense> {
    let mut builder = Expense::builder()
        .description(&entry.description)
        .category(entry.category.as_deref())
        .amount(Money::parse_major(&entry.amount, currency)?)
        .paid_by(ParticipantId::new(&entry.paid_by)?);
    if let Some(id) = entry.id {
        builder = builder.id(id);
    }
    if let Some(date) = entry.date {
        builder = builder.date(date);
    }

    let split_list = entry
        .participants
        .iter()
        .map(|p| ParticipantId::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    builder = match entry.split {
        SplitEntry::Equal => builder.split_equally(split_list),
        SplitEntry::Custom { amounts } => {
            let amounts = amounts
                .iter()
                .map(|(p, owed)| Ok((ParticipantId::new(p)?, Money::parse_major(owed, currency)?)))
                .collect::<Result<_>>()?;
            builder.split_among(split_list).split_custom(amounts)
        }
    };

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(json: &str) -> TripFile {
        serde_json::from_str(json).unwrap()
    }

    const TRIP: &str = r#"{
        "currency": "EUR",
        "current_user": "an",
        "participants": ["an", "binh", "chi"],
        "names": { "binh": "Bình" },
        "expenses": [
            { "description": "hotel", "amount": "90", "paid_by": "an", "participants": ["an", "binh"] },
            {
                "description": "boat",
                "amount": "12.50",
                "paid_by": "binh",
                "split": { "kind": "custom", "amounts": { "an": "5", "chi": "7.50" } }
            }
        ]
    }"#;

    #[test]
    fn loads_participants_expenses_and_names() {
        let trip = load(file(TRIP), &Settings::default()).unwrap();
        assert_eq!(trip.currency, Currency::Eur);
        assert_eq!(trip.ledger.participants().len(), 3);
        assert_eq!(trip.ledger.expenses().len(), 2);
        assert_eq!(trip.ledger.expenses()[1].amount(), Money::new(1250));
        assert_eq!(trip.resolver.resolve(&ParticipantId::new("binh").unwrap()), "Bình");
        assert_eq!(trip.resolver.resolve(&ParticipantId::new("an").unwrap()), "you");
    }

    #[test]
    fn settings_can_switch_the_viewer() {
        let settings = Settings {
            current_user: Some("chi".to_string()),
            ..Settings::default()
        };
        let trip = load(file(TRIP), &settings).unwrap();
        assert_eq!(trip.ledger.current_user().as_str(), "chi");
    }

    const BROKEN: &str = r#"{
        "current_user": "an",
        "participants": ["an", "binh"],
        "expenses": [
            { "amount": "100", "paid_by": "an", "participants": ["an", "zoe"] },
            { "amount": "100", "paid_by": "an", "participants": ["an", "binh"] }
        ]
    }"#;

    #[test]
    fn strict_load_fails_on_invalid_expense() {
        let err = load(file(BROKEN), &Settings::default()).err().unwrap();
        assert!(matches!(err, AppError::Trip(msg) if msg.starts_with("expense #1")));
    }

    #[test]
    fn lenient_load_skips_invalid_expense() {
        let settings = Settings {
            strict: false,
            ..Settings::default()
        };
        let trip = load(file(BROKEN), &settings).unwrap();
        assert_eq!(trip.ledger.expenses().len(), 1);
    }

    #[test]
    fn repeated_participants_are_merged() {
        let trip = load(
            file(
                r#"{
                    "current_user": "an",
                    "participants": ["an", "binh", " binh ", "Nguy\u1ec5n", "Nguye\u0302\u0303n"],
                    "expenses": [
                        { "amount": "100", "paid_by": "an", "participants": ["an", "binh"] }
                    ]
                }"#,
            ),
            &Settings::default(),
        )
        .unwrap();
        assert_eq!(trip.ledger.participants().len(), 3);
        assert_eq!(trip.ledger.expenses().len(), 1);
    }
}
