//! Trip totals: how much was spent, who paid what and who consumed what.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{EngineError, Expense, Money, ParticipantId, Participants, ResultEngine, SplitRule};

pub const UNCATEGORIZED: &str = "uncategorized";

/// What a participant put in and what they consumed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spending {
    /// Sum of the amounts of the expenses they paid.
    pub paid: Money,
    /// Sum of their shares, their own share as payer included.
    pub share: Money,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSummary {
    pub total: Money,
    pub expense_count: usize,
    pub by_participant: BTreeMap<ParticipantId, Spending>,
    pub by_category: BTreeMap<String, Money>,
}

impl TripSummary {
    /// Shares are computed with the balance rules (rounded equal share,
    /// positive custom amounts of split participants), so for a known payer
    /// `paid - share` differs from the net balance only by the rounding of
    /// the payer's own expenses.
    ///
    /// Fails with [`EngineError::InvalidAmount`] when a total would overflow.
    pub fn from_expenses<'a, I>(expenses: I, participants: &Participants) -> ResultEngine<Self>
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let mut summary = TripSummary {
            by_participant: participants
                .iter()
                .map(|p| (p.clone(), Spending::default()))
                .collect(),
            ..Default::default()
        };

        for expense in expenses {
            let amount = expense.amount();
            add_to(&mut summary.total, amount)?;
            summary.expense_count += 1;
            add_to(
                summary
                    .by_category
                    .entry(expense.category().unwrap_or(UNCATEGORIZED).to_string())
                    .or_default(),
                amount,
            )?;

            if let Some(spending) = summary.by_participant.get_mut(expense.payer()) {
                add_to(&mut spending.paid, amount)?;
            }
            for (participant, share) in shares(expense) {
                if let Some(spending) = summary.by_participant.get_mut(participant) {
                    add_to(&mut spending.share, share)?;
                }
            }
        }

        Ok(summary)
    }
}

fn add_to(total: &mut Money, amount: Money) -> ResultEngine<()> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| EngineError::InvalidAmount("trip total out of range".to_string()))?;
    Ok(())
}

fn shares(expense: &Expense) -> Vec<(&ParticipantId, Money)> {
    let split_list = expense.participants();
    match expense.split() {
        SplitRule::Custom(amounts) => amounts
            .iter()
            .filter(|(p, owed)| owed.is_positive() && split_list.contains(*p))
            .map(|(p, owed)| (p, *owed))
            .collect(),
        SplitRule::Equal => match expense.amount().split_evenly(split_list.len()) {
            Some(share) => split_list.iter().map(|p| (p, share)).collect(),
            None => Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participants;

    fn id(raw: &str) -> ParticipantId {
        ParticipantId::new(raw).unwrap()
    }

    #[test]
    fn totals_by_participant_and_category() {
        let group = participants(["A", "B"]).unwrap();
        let hotel = Expense::builder()
            .amount(Money::new(90_000))
            .category(Some("lodging"))
            .paid_by(id("A"))
            .split_equally([id("A"), id("B")])
            .build()
            .unwrap();
        let taxi = Expense::builder()
            .amount(Money::new(60_000))
            .paid_by(id("B"))
            .split_equally([id("A"), id("B")])
            .build()
            .unwrap();

        let summary = TripSummary::from_expenses([&hotel, &taxi], &group).unwrap();
        assert_eq!(summary.total, Money::new(150_000));
        assert_eq!(summary.expense_count, 2);
        assert_eq!(
            summary.by_participant[&id("A")],
            Spending {
                paid: Money::new(90_000),
                share: Money::new(75_000),
            }
        );
        assert_eq!(summary.by_category["lodging"], Money::new(90_000));
        assert_eq!(summary.by_category[UNCATEGORIZED], Money::new(60_000));
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        let group = participants(["A", "B"]).unwrap();
        let large = Money::parse_major("5000000000000000000", crate::Currency::Vnd).unwrap();
        let expense = Expense::builder()
            .amount(large)
            .paid_by(id("A"))
            .split_equally([id("A"), id("B")])
            .build()
            .unwrap();
        assert!(expense.validate().is_ok());

        let err = TripSummary::from_expenses([&expense, &expense], &group).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
}
