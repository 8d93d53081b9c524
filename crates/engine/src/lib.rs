//! Expense settlement for group trips.
//!
//! Given a snapshot of expenses and the participants of a trip, the engine
//! computes each participant's net [`Balances`] and the ordered list of
//! [`Transfer`]s that settles them. The computation is pure: nothing is stored
//! between calls and every query rebuilds the result from the snapshot.
//!
//! ```rust
//! use engine::{Engine, Expense, Money, ParticipantId, participants};
//!
//! let a = ParticipantId::new("A").unwrap();
//! let group = participants(["A", "B", "C"]).unwrap();
//! let dinner = Expense::builder()
//!     .description("dinner")
//!     .amount(Money::new(300_000))
//!     .paid_by(a.clone())
//!     .split_equally(group.iter().cloned())
//!     .build()
//!     .unwrap();
//!
//! let report = Engine::builder().build().settle(&[dinner], &group).unwrap();
//! assert_eq!(report.balances.get("A"), Some(Money::new(200_000)));
//! assert_eq!(report.transfers.len(), 2);
//! ```

pub use balances::{Balances, accumulate};
pub use currency::Currency;
pub use display::{DEFAULT_SELF_LABEL, DisplayResolver};
pub use error::EngineError;
pub use expense::{Expense, ExpenseBuilder, SplitRule};
pub use ledger::TripLedger;
pub use money::Money;
pub use participant::{ParticipantId, Participants, participants};
pub use settlement::{SettlementReport, Transfer, apply_transfers, settle};
pub use summary::{Spending, TripSummary, UNCATEGORIZED};

mod balances;
mod currency;
mod display;
mod error;
mod expense;
mod ledger;
mod money;
mod participant;
mod settlement;
mod summary;
mod util;

type ResultEngine<T> = Result<T, EngineError>;

/// Stateless settlement engine.
///
/// Holds only configuration, so a single instance can be shared across
/// threads and called concurrently.
#[derive(Clone, Debug)]
pub struct Engine {
    currency: Currency,
    strict: bool,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Computes balances and the settling transfers for a snapshot.
    ///
    /// In strict mode every expense is validated first (see
    /// [`Expense::validate`]) and the first violation is returned. Otherwise
    /// the input is trusted as is. Balances that would overflow fail in
    /// both modes.
    pub fn settle(
        &self,
        expenses: &[Expense],
        participants: &Participants,
    ) -> ResultEngine<SettlementReport> {
        if self.strict {
            for expense in expenses {
                expense.validate()?;
            }
        }

        let balances = accumulate(expenses, participants)?;
        let transfers = settle(&balances);
        tracing::debug!(
            expenses = expenses.len(),
            participants = participants.len(),
            transfers = transfers.len(),
            "settlement computed"
        );

        Ok(SettlementReport {
            balances,
            transfers,
        })
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    currency: Currency,
    strict: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            strict: true,
        }
    }
}

impl EngineBuilder {
    /// Currency used to interpret and format amounts.
    pub fn currency(mut self, currency: Currency) -> EngineBuilder {
        self.currency = currency;
        self
    }

    /// Validate expenses before computing (default `true`).
    pub fn strict(mut self, strict: bool) -> EngineBuilder {
        self.strict = strict;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            currency: self.currency,
            strict: self.strict,
        }
    }
}
