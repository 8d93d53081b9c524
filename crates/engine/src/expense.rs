//! Trip expenses.
//!
//! An [`Expense`] is a single recorded cost attributed to one payer and split
//! among a list of participants, either equally or with an explicit
//! per-participant amount map. Expenses are immutable once built: the
//! [`TripLedger`](crate::TripLedger) replaces them wholesale when a
//! participant leaves the trip.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Money, ParticipantId, ResultEngine,
    util::{ensure_custom_subset, ensure_distinct},
};

/// How an expense's amount is divided among its split participants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amounts", rename_all = "snake_case")]
pub enum SplitRule {
    /// Divide the amount evenly among the split list.
    Equal,
    /// Explicit owed amount per participant. The amounts are trusted to add
    /// up to the expense total.
    Custom(BTreeMap<ParticipantId, Money>),
}

impl SplitRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Custom(_) => "custom",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    id: Uuid,
    description: String,
    category: Option<String>,
    date: NaiveDate,
    amount: Money,
    payer: ParticipantId,
    split: SplitRule,
    participants: Vec<ParticipantId>,
}

impl Expense {
    /// Return a builder for `Expense`.
    pub fn builder() -> ExpenseBuilder {
        ExpenseBuilder::default()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn split(&self) -> &SplitRule {
        &self.split
    }

    /// Participants the expense is split among. The payer may or may not be
    /// one of them.
    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    /// Returns `true` if `participant` pays for or takes part in the expense.
    pub fn involves(&self, participant: &ParticipantId) -> bool {
        &self.payer == participant
            || self.participants.contains(participant)
            || matches!(&self.split, SplitRule::Custom(map) if map.contains_key(participant))
    }

    /// Checks the preconditions the balance accumulator relies on:
    ///
    /// - the amount is not negative;
    /// - the split list has no duplicates;
    /// - an equal split has at least one split participant;
    /// - custom amounts are not negative and only name split participants.
    ///
    /// Custom amounts adding up to the total is not checked.
    pub fn validate(&self) -> ResultEngine<()> {
        if self.amount.is_negative() {
            return Err(EngineError::InvalidAmount(format!(
                "expense {} has a negative amount",
                self.id
            )));
        }
        ensure_distinct(self.id, &self.participants)?;
        match &self.split {
            SplitRule::Equal => {
                if self.participants.is_empty() {
                    return Err(EngineError::EmptySplit(self.id.to_string()));
                }
            }
            SplitRule::Custom(amounts) => {
                if let Some((participant, _)) = amounts.iter().find(|(_, owed)| owed.is_negative())
                {
                    return Err(EngineError::InvalidAmount(format!(
                        "expense {} owes a negative amount to {participant}",
                        self.id
                    )));
                }
                ensure_custom_subset(self.id, amounts, &self.participants)?;
            }
        }
        Ok(())
    }

    /// Copy of the expense with `removed` taken out of the split: its payments
    /// move to `replacement`, its shares disappear.
    pub(crate) fn without_participant(
        &self,
        removed: &ParticipantId,
        replacement: &ParticipantId,
    ) -> Expense {
        let payer = if &self.payer == removed {
            replacement.clone()
        } else {
            self.payer.clone()
        };
        let participants = self
            .participants
            .iter()
            .filter(|p| *p != removed)
            .cloned()
            .collect();
        let split = match &self.split {
            SplitRule::Equal => SplitRule::Equal,
            SplitRule::Custom(amounts) => SplitRule::Custom(
                amounts
                    .iter()
                    .filter(|(p, _)| *p != removed)
                    .map(|(p, owed)| (p.clone(), *owed))
                    .collect(),
            ),
        };
        Expense {
            payer,
            participants,
            split,
            ..self.clone()
        }
    }
}

/// The builder for `Expense`
#[derive(Default)]
pub struct ExpenseBuilder {
    id: Option<Uuid>,
    description: String,
    category: Option<String>,
    date: Option<NaiveDate>,
    amount: Option<Money>,
    payer: Option<ParticipantId>,
    split: Option<SplitRule>,
    participants: Vec<ParticipantId>,
}

impl ExpenseBuilder {
    /// Reuse an existing identifier instead of generating one.
    pub fn id(mut self, id: Uuid) -> ExpenseBuilder {
        self.id = Some(id);
        self
    }

    pub fn description(mut self, description: &str) -> ExpenseBuilder {
        self.description = description.trim().to_string();
        self
    }

    pub fn category(mut self, category: Option<&str>) -> ExpenseBuilder {
        self.category = category
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);
        self
    }

    /// Defaults to today (UTC).
    pub fn date(mut self, date: NaiveDate) -> ExpenseBuilder {
        self.date = Some(date);
        self
    }

    pub fn amount(mut self, amount: Money) -> ExpenseBuilder {
        self.amount = Some(amount);
        self
    }

    pub fn paid_by(mut self, payer: ParticipantId) -> ExpenseBuilder {
        self.payer = Some(payer);
        self
    }

    /// Split the amount evenly among `participants`.
    pub fn split_equally<I>(mut self, participants: I) -> ExpenseBuilder
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        self.participants = participants.into_iter().collect();
        self.split = Some(SplitRule::Equal);
        self
    }

    /// Split with explicit owed amounts. Unless a split list was given with
    /// [`ExpenseBuilder::split_among`], the keys of `amounts` become the list.
    pub fn split_custom(mut self, amounts: BTreeMap<ParticipantId, Money>) -> ExpenseBuilder {
        if self.participants.is_empty() {
            self.participants = amounts.keys().cloned().collect();
        }
        self.split = Some(SplitRule::Custom(amounts));
        self
    }

    /// Set the split list explicitly, keeping the current split rule.
    pub fn split_among<I>(mut self, participants: I) -> ExpenseBuilder
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        self.participants = participants.into_iter().collect();
        self
    }

    /// Construct `Expense`.
    ///
    /// Fails when the amount or the payer is missing. The split rule
    /// defaults to [`SplitRule::Equal`]; the domain checks live in
    /// [`Expense::validate`].
    pub fn build(self) -> ResultEngine<Expense> {
        let amount = self
            .amount
            .ok_or_else(|| EngineError::InvalidAmount("expense amount is required".to_string()))?;
        let payer = self.payer.ok_or_else(|| {
            EngineError::InvalidParticipant("expense payer is required".to_string())
        })?;
        Ok(Expense {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            description: self.description,
            category: self.category,
            date: self.date.unwrap_or_else(|| Utc::now().date_naive()),
            amount,
            payer,
            split: self.split.unwrap_or(SplitRule::Equal),
            participants: self.participants,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ParticipantId {
        ParticipantId::new(raw).unwrap()
    }

    #[test]
    fn build_requires_amount_and_payer() {
        assert!(Expense::builder().paid_by(id("A")).build().is_err());
        assert!(Expense::builder().amount(Money::new(1)).build().is_err());
    }

    #[test]
    fn custom_split_defaults_list_to_keys() {
        let expense = Expense::builder()
            .amount(Money::new(500))
            .paid_by(id("A"))
            .split_custom(BTreeMap::from([(id("B"), Money::new(200)), (id("C"), Money::new(300))]))
            .build()
            .unwrap();
        assert_eq!(expense.participants(), [id("B"), id("C")]);
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_equal_split() {
        let expense = Expense::builder()
            .amount(Money::new(100))
            .paid_by(id("A"))
            .split_equally([])
            .build()
            .unwrap();
        assert_eq!(
            expense.validate(),
            Err(EngineError::EmptySplit(expense.id().to_string()))
        );
    }

    #[test]
    fn validate_rejects_custom_key_outside_split_list() {
        let expense = Expense::builder()
            .amount(Money::new(100))
            .paid_by(id("A"))
            .split_among([id("A"), id("B")])
            .split_custom(BTreeMap::from([(id("C"), Money::new(100))]))
            .build()
            .unwrap();
        assert_eq!(
            expense.validate(),
            Err(EngineError::UnknownSplitParticipant {
                expense: expense.id().to_string(),
                participant: "C".to_string(),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_amounts_and_duplicates() {
        let negative = Expense::builder()
            .amount(Money::new(-1))
            .paid_by(id("A"))
            .split_equally([id("A")])
            .build()
            .unwrap();
        assert!(matches!(negative.validate(), Err(EngineError::InvalidAmount(_))));

        let duplicated = Expense::builder()
            .amount(Money::new(10))
            .paid_by(id("A"))
            .split_equally([id("A"), id("B"), id("A")])
            .build()
            .unwrap();
        assert!(matches!(
            duplicated.validate(),
            Err(EngineError::InvalidParticipant(_))
        ));
    }

    #[test]
    fn without_participant_reassigns_payer_and_strips_shares() {
        let expense = Expense::builder()
            .amount(Money::new(900))
            .paid_by(id("B"))
            .split_among([id("A"), id("B"), id("C")])
            .split_custom(BTreeMap::from([
                (id("A"), Money::new(300)),
                (id("B"), Money::new(300)),
                (id("C"), Money::new(300)),
            ]))
            .build()
            .unwrap();

        let updated = expense.without_participant(&id("B"), &id("A"));
        assert_eq!(updated.id(), expense.id());
        assert_eq!(updated.payer(), &id("A"));
        assert_eq!(updated.participants(), [id("A"), id("C")]);
        assert!(!updated.involves(&id("B")));
        assert_eq!(
            updated.split(),
            &SplitRule::Custom(BTreeMap::from([
                (id("A"), Money::new(300)),
                (id("C"), Money::new(300)),
            ]))
        );
    }
}
