//! The trip ledger owns the expense list and the participant working set.
//!
//! It is the mutable side of the system: participants and expenses are added
//! and removed here, while balances and settlements are recomputed from a
//! snapshot on every read through the [`Engine`].

use uuid::Uuid;

use crate::{
    Engine, EngineError, Expense, ParticipantId, Participants, ResultEngine, SettlementReport,
    SplitRule, TripSummary, util::ensure_known,
};

#[derive(Clone, Debug)]
pub struct TripLedger {
    current_user: ParticipantId,
    participants: Participants,
    expenses: Vec<Expense>,
}

impl TripLedger {
    /// New ledger whose only participant is `current_user`.
    pub fn new(current_user: ParticipantId) -> Self {
        let participants = Participants::from([current_user.clone()]);
        Self {
            current_user,
            participants,
            expenses: Vec::new(),
        }
    }

    pub fn current_user(&self) -> &ParticipantId {
        &self.current_user
    }

    pub fn participants(&self) -> &Participants {
        &self.participants
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn add_participant(&mut self, participant: ParticipantId) -> ResultEngine<()> {
        if self.participants.contains(&participant) {
            return Err(EngineError::ExistingKey(participant.to_string()));
        }
        tracing::debug!(%participant, "participant added");
        self.participants.insert(participant);
        Ok(())
    }

    /// Removes `participant` from the working set.
    ///
    /// Expenses they paid are reassigned to the current user and they are
    /// stripped from every split list and custom amount map. Expenses left
    /// with nobody to share an equal split are dropped. The current user
    /// cannot be removed.
    pub fn remove_participant(&mut self, participant: &ParticipantId) -> ResultEngine<()> {
        if participant == &self.current_user {
            return Err(EngineError::InvalidParticipant(
                "the current user cannot be removed".to_string(),
            ));
        }
        if !self.participants.remove(participant) {
            return Err(EngineError::KeyNotFound(participant.to_string()));
        }

        let before = self.expenses.len();
        self.expenses = self
            .expenses
            .iter()
            .map(|expense| {
                if expense.involves(participant) {
                    expense.without_participant(participant, &self.current_user)
                } else {
                    expense.clone()
                }
            })
            .filter(|expense| {
                !(matches!(expense.split(), SplitRule::Equal) && expense.participants().is_empty())
            })
            .collect();

        tracing::debug!(
            %participant,
            dropped = before - self.expenses.len(),
            "participant removed"
        );
        Ok(())
    }

    /// Adds a validated expense whose payer, split list and custom amounts
    /// only name participants of the trip.
    pub fn add_expense(&mut self, expense: Expense) -> ResultEngine<Uuid> {
        expense.validate()?;
        if self.expenses.iter().any(|e| e.id() == expense.id()) {
            return Err(EngineError::ExistingKey(expense.id().to_string()));
        }
        ensure_known(&self.participants, expense.payer())?;
        for participant in expense.participants() {
            ensure_known(&self.participants, participant)?;
        }

        let id = expense.id();
        tracing::debug!(expense = %id, amount = %expense.amount(), "expense added");
        self.expenses.push(expense);
        Ok(id)
    }

    pub fn remove_expense(&mut self, id: Uuid) -> ResultEngine<Expense> {
        match self.expenses.iter().position(|expense| expense.id() == id) {
            Some(index) => Ok(self.expenses.remove(index)),
            None => Err(EngineError::KeyNotFound(id.to_string())),
        }
    }

    /// Balances and settlement of the current snapshot.
    pub fn report(&self, engine: &Engine) -> ResultEngine<SettlementReport> {
        engine.settle(&self.expenses, &self.participants)
    }

    pub fn summary(&self) -> ResultEngine<TripSummary> {
        TripSummary::from_expenses(&self.expenses, &self.participants)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::Money;

    fn id(raw: &str) -> ParticipantId {
        ParticipantId::new(raw).unwrap()
    }

    fn ledger() -> TripLedger {
        let mut ledger = TripLedger::new(id("me"));
        ledger.add_participant(id("B")).unwrap();
        ledger.add_participant(id("C")).unwrap();
        ledger
    }

    #[test]
    fn rejects_duplicate_participants() {
        let mut ledger = ledger();
        assert_eq!(
            ledger.add_participant(id("B")),
            Err(EngineError::ExistingKey("B".to_string()))
        );
    }

    #[test]
    fn rejects_expenses_naming_strangers() {
        let mut ledger = ledger();
        let expense = Expense::builder()
            .amount(Money::new(100))
            .paid_by(id("me"))
            .split_equally([id("me"), id("Z")])
            .build()
            .unwrap();
        assert_eq!(
            ledger.add_expense(expense),
            Err(EngineError::KeyNotFound("Z".to_string()))
        );
        assert!(ledger.expenses().is_empty());
    }

    #[test]
    fn rejects_duplicate_expense_ids() {
        let mut ledger = ledger();
        let expense = Expense::builder()
            .amount(Money::new(100))
            .paid_by(id("me"))
            .split_equally([id("me"), id("B")])
            .build()
            .unwrap();
        ledger.add_expense(expense.clone()).unwrap();
        assert!(matches!(
            ledger.add_expense(expense),
            Err(EngineError::ExistingKey(_))
        ));
    }

    #[test]
    fn remove_expense_returns_it() {
        let mut ledger = ledger();
        let expense = Expense::builder()
            .amount(Money::new(100))
            .paid_by(id("B"))
            .split_equally([id("me"), id("B")])
            .build()
            .unwrap();
        let expense_id = ledger.add_expense(expense.clone()).unwrap();
        assert_eq!(ledger.remove_expense(expense_id).unwrap(), expense);
        assert!(ledger.remove_expense(expense_id).is_err());
    }

    #[test]
    fn cannot_remove_current_user_or_stranger() {
        let mut ledger = ledger();
        assert!(matches!(
            ledger.remove_participant(&id("me")),
            Err(EngineError::InvalidParticipant(_))
        ));
        assert_eq!(
            ledger.remove_participant(&id("Z")),
            Err(EngineError::KeyNotFound("Z".to_string()))
        );
    }

    #[test]
    fn removal_reassigns_payments_and_strips_shares() {
        let mut ledger = ledger();
        ledger
            .add_expense(
                Expense::builder()
                    .amount(Money::new(300))
                    .paid_by(id("B"))
                    .split_equally([id("me"), id("B"), id("C")])
                    .build()
                    .unwrap(),
            )
            .unwrap();
        ledger
            .add_expense(
                Expense::builder()
                    .amount(Money::new(200))
                    .paid_by(id("C"))
                    .split_custom(BTreeMap::from([(id("B"), Money::new(200))]))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        ledger.remove_participant(&id("B")).unwrap();

        assert!(!ledger.participants().contains(&id("B")));
        assert!(ledger.expenses().iter().all(|e| !e.involves(&id("B"))));
        assert_eq!(ledger.expenses()[0].payer(), &id("me"));
        assert_eq!(ledger.expenses()[0].participants(), [id("me"), id("C")]);
        assert_eq!(ledger.expenses()[1].split(), &SplitRule::Custom(BTreeMap::new()));
    }

    #[test]
    fn removal_drops_equal_splits_left_empty() {
        let mut ledger = ledger();
        ledger
            .add_expense(
                Expense::builder()
                    .amount(Money::new(100))
                    .paid_by(id("me"))
                    .split_equally([id("B")])
                    .build()
                    .unwrap(),
            )
            .unwrap();
        ledger.remove_participant(&id("B")).unwrap();
        assert!(ledger.expenses().is_empty());
    }
}
