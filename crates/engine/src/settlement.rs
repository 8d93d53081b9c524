//! Settlement matching.
//!
//! Turns a [`Balances`] snapshot into the ordered list of payments that
//! brings every participant back to zero, using a greedy largest-pair
//! matching of debtors against creditors.

use serde::{Deserialize, Serialize};

use crate::{Balances, Money, ParticipantId, ResultEngine};

/// Remaining balance considered settled by the matcher.
///
/// Balances are integer smallest units, so only an exact zero qualifies.
const SETTLED_TOLERANCE: Money = Money::ZERO;

/// A single payment: `from` pays `amount` to `to`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

/// Balances together with the payments that settle them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub balances: Balances,
    pub transfers: Vec<Transfer>,
}

struct Position {
    id: ParticipantId,
    remaining: Money,
}

fn is_settled(amount: Money) -> bool {
    amount.abs() <= SETTLED_TOLERANCE
}

/// Computes the payments that settle `balances`.
///
/// 1. Debtors (negative) and creditors (positive) are split apart; settled
///    participants take no part.
/// 2. Debtors are sorted most negative first, creditors most positive first;
///    ties are broken by participant id.
/// 3. The current debtor pays the current creditor the smaller of the two
///    outstanding amounts; whichever side reaches zero moves on (both may).
///
/// Every transfer settles at least one side, so the result holds at most
/// `debtors + creditors - 1` transfers. Applying them with [`apply_transfers`] leaves
/// every balance at zero when the balances sum to zero.
pub fn settle(balances: &Balances) -> Vec<Transfer> {
    let mut debtors: Vec<Position> = balances
        .debtors()
        .map(|(id, balance)| Position {
            id: id.clone(),
            remaining: balance,
        })
        .collect();
    let mut creditors: Vec<Position> = balances
        .creditors()
        .map(|(id, balance)| Position {
            id: id.clone(),
            remaining: balance,
        })
        .collect();

    debtors.sort_by(|a, b| a.remaining.cmp(&b.remaining).then_with(|| a.id.cmp(&b.id)));
    creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining).then_with(|| a.id.cmp(&b.id)));

    let mut transfers = Vec::with_capacity(debtors.len() + creditors.len());
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let debtor = &mut debtors[i];
        let creditor = &mut creditors[j];

        let amount = debtor.remaining.abs().min(creditor.remaining);
        transfers.push(Transfer {
            from: debtor.id.clone(),
            to: creditor.id.clone(),
            amount,
        });
        debtor.remaining += amount;
        creditor.remaining -= amount;

        if is_settled(debtor.remaining) {
            i += 1;
        }
        if is_settled(creditor.remaining) {
            j += 1;
        }
    }

    if i < debtors.len() || j < creditors.len() {
        tracing::warn!(
            total = ?balances.total(),
            "balances do not sum to zero, settlement left some participants open"
        );
    }

    transfers
}

/// Replays `transfers` on top of `balances`: each payer's balance goes up by
/// the amount paid, each payee's goes down.
pub fn apply_transfers(balances: &Balances, transfers: &[Transfer]) -> ResultEngine<Balances> {
    let mut result = balances.clone();
    for transfer in transfers {
        result.shift(&transfer.from, &transfer.to, transfer.amount)?;
    }
    Ok(result)
}
