use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Vnd,
    Eur,
    Usd,
}

pub mod trip {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;

    /// A trip snapshot as stored on disk or sent by a client.
    ///
    /// Amounts are decimal strings in **major units** of `currency`
    /// (e.g. `"300000"` for VND, `"12.50"` for EUR).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripFile {
        #[serde(default)]
        pub currency: Currency,
        /// Participant viewing the trip. Must be listed in `participants`.
        pub current_user: String,
        pub participants: Vec<String>,
        /// Optional display names by participant id.
        #[serde(default)]
        pub names: BTreeMap<String, String>,
        #[serde(default)]
        pub expenses: Vec<ExpenseEntry>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseEntry {
        /// Expense id (UUID). Generated when missing.
        #[serde(default)]
        pub id: Option<Uuid>,
        #[serde(default)]
        pub description: String,
        #[serde(default)]
        pub category: Option<String>,
        #[serde(default)]
        pub date: Option<NaiveDate>,
        pub amount: String,
        pub paid_by: String,
        #[serde(default)]
        pub split: SplitEntry,
        /// Split list. For custom splits it defaults to the keys of `amounts`.
        #[serde(default)]
        pub participants: Vec<String>,
    }

    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "kind", rename_all = "snake_case")]
    pub enum SplitEntry {
        #[default]
        Equal,
        Custom { amounts: BTreeMap<String, String> },
    }
}

pub mod report {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceRow {
        pub participant: String,
        pub label: String,
        /// Net balance in smallest currency units.
        pub balance: i64,
        pub formatted: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferRow {
        pub from: String,
        pub to: String,
        pub from_label: String,
        pub to_label: String,
        /// Amount in smallest currency units.
        pub amount: i64,
        pub formatted: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Report {
        pub currency: Currency,
        pub balances: Vec<BalanceRow>,
        /// `None` for the balances-only view. A settled trip carries an empty
        /// list.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub transfers: Option<Vec<TransferRow>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendingRow {
        pub participant: String,
        pub label: String,
        pub paid: i64,
        pub share: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryRow {
        pub category: String,
        pub total: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Summary {
        pub currency: Currency,
        pub total: i64,
        pub expense_count: usize,
        pub participants: Vec<SpendingRow>,
        pub categories: Vec<CategoryRow>,
    }
}
