//! Human readable labels for participants.
//!
//! Kept apart from the numeric code so that balances and settlements only
//! ever deal with [`ParticipantId`]s.

use std::collections::BTreeMap;

use crate::{Currency, ParticipantId, Transfer};

pub const DEFAULT_SELF_LABEL: &str = "you";

/// Maps participant ids to labels, rendering the viewer as [`DEFAULT_SELF_LABEL`]
/// (or a custom label such as `"me"`).
#[derive(Clone, Debug)]
pub struct DisplayResolver {
    current_user: ParticipantId,
    self_label: String,
    names: BTreeMap<ParticipantId, String>,
}

impl DisplayResolver {
    pub fn new(current_user: ParticipantId) -> Self {
        Self {
            current_user,
            self_label: DEFAULT_SELF_LABEL.to_string(),
            names: BTreeMap::new(),
        }
    }

    pub fn with_self_label(mut self, label: &str) -> Self {
        self.self_label = label.to_string();
        self
    }

    /// Registers display names; blank names are ignored.
    pub fn with_names<I>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = (ParticipantId, String)>,
    {
        self.names.extend(
            names
                .into_iter()
                .filter(|(_, name)| !name.trim().is_empty()),
        );
        self
    }

    pub fn current_user(&self) -> &ParticipantId {
        &self.current_user
    }

    /// Label for `participant`: the self label for the viewer, then the
    /// registered name, then the raw id.
    pub fn resolve(&self, participant: &ParticipantId) -> String {
        if participant == &self.current_user {
            return self.self_label.clone();
        }
        self.names
            .get(participant)
            .cloned()
            .unwrap_or_else(|| participant.to_string())
    }

    /// One-line description of a transfer, e.g. `"Bình → you: 100,000 ₫"`.
    pub fn describe(&self, transfer: &Transfer, currency: Currency) -> String {
        format!(
            "{} → {}: {}",
            self.resolve(&transfer.from),
            self.resolve(&transfer.to),
            transfer.amount.format(currency)
        )
    }
}
