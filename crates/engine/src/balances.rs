//! Net balance accumulation.
//!
//! Balances are derived data: they are rebuilt from the expense list on every
//! query and never stored or updated incrementally.

use std::collections::{BTreeMap, btree_map};

use serde::{Deserialize, Serialize};

use crate::{EngineError, Expense, Money, ParticipantId, Participants, ResultEngine, SplitRule};

/// Net position of every participant, ordered by participant id.
///
/// Positive means the participant is owed money, negative means they owe
/// money, zero means they are settled.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances(BTreeMap<ParticipantId, Money>);

impl Balances {
    /// Every participant of the working set at zero.
    pub fn seeded(participants: &Participants) -> Self {
        Self(participants.iter().map(|p| (p.clone(), Money::ZERO)).collect())
    }

    pub fn get(&self, participant: &str) -> Option<Money> {
        self.0.get(participant).copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, ParticipantId, Money> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all balances. Zero whenever the balances come from
    /// [`accumulate`]; `None` when the sum does not fit a [`Money`].
    pub fn total(&self) -> Option<Money> {
        let total: i128 = self.0.values().map(|b| i128::from(b.minor())).sum();
        i64::try_from(total).ok().map(Money::new)
    }

    /// Participants with a negative balance.
    pub fn debtors(&self) -> impl Iterator<Item = (&ParticipantId, Money)> {
        self.iter()
            .filter(|(_, balance)| balance.is_negative())
            .map(|(id, balance)| (id, *balance))
    }

    /// Participants with a positive balance.
    pub fn creditors(&self) -> impl Iterator<Item = (&ParticipantId, Money)> {
        self.iter()
            .filter(|(_, balance)| balance.is_positive())
            .map(|(id, balance)| (id, *balance))
    }

    /// `true` when nobody owes anything.
    pub fn is_settled(&self) -> bool {
        self.0.values().all(|balance| balance.is_zero())
    }

    /// Raises `up` by `amount` and lowers `down` by the same amount. The move
    /// is dropped entirely when either side is outside the map, and rejected
    /// without touching either balance when one would leave the `i64` range.
    pub(crate) fn shift(
        &mut self,
        up: &ParticipantId,
        down: &ParticipantId,
        amount: Money,
    ) -> ResultEngine<()> {
        let (Some(&credit), Some(&debit)) = (self.0.get(up), self.0.get(down)) else {
            return Ok(());
        };
        let overflow = || {
            EngineError::InvalidAmount(format!(
                "balance out of range moving {amount} from {down} to {up}"
            ))
        };
        let raised = credit.checked_add(amount).ok_or_else(overflow)?;
        let lowered = debit.checked_sub(amount).ok_or_else(overflow)?;

        self.0.insert(up.clone(), raised);
        self.0.insert(down.clone(), lowered);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Balances {
    type Item = (&'a ParticipantId, &'a Money);
    type IntoIter = btree_map::Iter<'a, ParticipantId, Money>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(ParticipantId, Money)> for Balances {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, Money)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Computes every participant's net balance from a snapshot of expenses.
///
/// - Every participant of the working set starts at zero and stays in the
///   output even when nothing moves for them.
/// - Custom split: each positive owed amount of a split participant other
///   than the payer moves from that participant to the payer.
/// - Equal split: the per-person share is `amount / len(split list)` rounded
///   to the nearest smallest unit, once per expense; each split participant
///   other than the payer owes that share to the payer.
/// - The payer's own share never moves money.
/// - Shares involving someone outside the working set are skipped.
///
/// The result does not depend on the order of `expenses`. Rounding happens
/// per expense, so the shares of an expense may add up to slightly more or
/// less than its amount; the balances still sum to zero.
///
/// Fails with [`EngineError::InvalidAmount`] when a balance would overflow.
pub fn accumulate<'a, I>(expenses: I, participants: &Participants) -> ResultEngine<Balances>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut balances = Balances::seeded(participants);

    for expense in expenses {
        let payer = expense.payer();
        let split_list = expense.participants();
        match expense.split() {
            SplitRule::Custom(amounts) => {
                for (participant, owed) in amounts {
                    if !owed.is_positive() || !split_list.contains(participant) {
                        continue;
                    }
                    if participant == payer {
                        continue;
                    }
                    balances.shift(payer, participant, *owed)?;
                }
            }
            SplitRule::Equal => {
                let Some(share) = expense.amount().split_evenly(split_list.len()) else {
                    tracing::warn!(
                        expense = %expense.id(),
                        "skipping equal split without participants"
                    );
                    continue;
                };
                for participant in split_list {
                    if participant == payer {
                        continue;
                    }
                    balances.shift(payer, participant, share)?;
                }
            }
        }
    }

    Ok(balances)
}
