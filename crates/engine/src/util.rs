//! Internal helpers for expense validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation logic so the engine and the ledger enforce the same invariants.

use std::collections::{BTreeMap, BTreeSet};

use uuid::Uuid;

use crate::{EngineError, Money, ParticipantId, Participants, ResultEngine};

/// Reject a split list naming the same participant twice.
pub(crate) fn ensure_distinct(
    expense_id: Uuid,
    participants: &[ParticipantId],
) -> ResultEngine<()> {
    let mut seen = BTreeSet::new();
    for participant in participants {
        if !seen.insert(participant) {
            return Err(EngineError::InvalidParticipant(format!(
                "{participant} appears twice in expense {expense_id}"
            )));
        }
    }
    Ok(())
}

/// Ensure every custom amount belongs to someone in the split list.
pub(crate) fn ensure_custom_subset(
    expense_id: Uuid,
    amounts: &BTreeMap<ParticipantId, Money>,
    participants: &[ParticipantId],
) -> ResultEngine<()> {
    match amounts.keys().find(|key| !participants.contains(*key)) {
        Some(stray) => Err(EngineError::UnknownSplitParticipant {
            expense: expense_id.to_string(),
            participant: stray.to_string(),
        }),
        None => Ok(()),
    }
}

/// Ensure a participant belongs to the working set.
pub(crate) fn ensure_known(known: &Participants, participant: &ParticipantId) -> ResultEngine<()> {
    if known.contains(participant) {
        Ok(())
    } else {
        Err(EngineError::KeyNotFound(participant.to_string()))
    }
}
