//! Entry rows as read from the input CSV.

use crate::batch::{BatchOptions, EntryClass};
use crate::entry::{AccountKind, Direction, Transaction};
use crate::error::{NachaError, Result};
use serde::Deserialize;

/// Raw entry row as read from CSV.
///
/// Only `type`, `amount`, `name`, `routing`, `account` and `internal_id`
/// are required; the remaining columns fall back to their defaults.
#[derive(Debug, Deserialize)]
pub struct TransactionRecord {
    /// `debit` or `credit`
    #[serde(rename = "type")]
    pub tx_type: String,

    pub amount: String,
    pub name: String,
    pub routing: String,
    pub account: String,
    pub internal_id: String,

    /// Company entry description for the batch this row opens
    #[serde(default)]
    pub memo: Option<String>,

    /// Open a new batch for this row (default) or join the open one
    #[serde(default)]
    pub new_batch: Option<bool>,

    #[serde(default)]
    pub savings: Option<bool>,

    /// PPD instead of CCD
    #[serde(default)]
    pub personal: Option<bool>,

    #[serde(default)]
    pub service_class_code: Option<String>,
}

impl TransactionRecord {
    /// Turns the row into a typed request. Field contents are validated
    /// later, when the entry is created.
    pub fn parse(&self, row: usize) -> Result<ParsedTransaction> {
        let direction = match self.tx_type.trim().to_lowercase().as_str() {
            "debit" => Direction::Debit,
            "credit" => Direction::Credit,
            other => {
                return Err(NachaError::InvalidRecord {
                    row,
                    message: format!("unknown entry type '{}'", other),
                })
            }
        };

        let transaction = Transaction {
            amount: self.amount.clone(),
            name: self.name.clone(),
            routing: self.routing.clone(),
            account: self.account.clone(),
            internal_id: self.internal_id.clone(),
            account_kind: AccountKind::from_savings(self.savings.unwrap_or(false)),
        };

        let batch = self.new_batch.unwrap_or(true).then(|| {
            let mut options = BatchOptions::new(self.memo.clone().unwrap_or_default());
            options.entry_class = EntryClass::from_personal(self.personal.unwrap_or(false));
            if let Some(code) = &self.service_class_code {
                options = options.service_class(code.clone());
            }
            options
        });

        Ok(ParsedTransaction {
            direction,
            transaction,
            batch,
        })
    }
}

/// A typed entry request ready to hand to the file.
#[derive(Debug, Clone)]
pub struct ParsedTransaction {
    pub direction: Direction,
    pub transaction: Transaction,

    /// Settings for a new batch, or `None` to join the open batch.
    pub batch: Option<BatchOptions>,
}
