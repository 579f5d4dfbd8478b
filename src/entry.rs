//! Entry detail records (record type 6).
//!
//! A [`Transaction`] holds raw caller input. It is validated once into a
//! [`ValidTransaction`], and each leg written to the file becomes an
//! [`EntryDetail`].

use crate::amount::Amount;
use crate::error::{Field, ValidationErrors};
use crate::format::{blank, format_number, format_text};
use crate::routing::RoutingNumber;
use crate::validate::{alphameric_only, numeric_only};
use std::str::FromStr;

/// Which way money moves relative to the receiver's account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Pull funds from the receiver.
    Debit,
    /// Push funds to the receiver.
    Credit,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Debit => Direction::Credit,
            Direction::Credit => Direction::Debit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountKind {
    #[default]
    Checking,
    Savings,
}

impl AccountKind {
    pub fn from_savings(is_savings: bool) -> Self {
        if is_savings {
            AccountKind::Savings
        } else {
            AccountKind::Checking
        }
    }
}

/// Transaction codes for the supported account/direction pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionCode {
    CheckingCredit = 22,
    CheckingDebit = 27,
    SavingsCredit = 32,
    SavingsDebit = 37,
}

impl TransactionCode {
    pub fn new(direction: Direction, kind: AccountKind) -> Self {
        match (direction, kind) {
            (Direction::Credit, AccountKind::Checking) => TransactionCode::CheckingCredit,
            (Direction::Debit, AccountKind::Checking) => TransactionCode::CheckingDebit,
            (Direction::Credit, AccountKind::Savings) => TransactionCode::SavingsCredit,
            (Direction::Debit, AccountKind::Savings) => TransactionCode::SavingsDebit,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_debit(self) -> bool {
        matches!(
            self,
            TransactionCode::CheckingDebit | TransactionCode::SavingsDebit
        )
    }
}

/// Raw transaction input, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub amount: String,
    pub name: String,
    pub routing: String,
    pub account: String,
    pub internal_id: String,
    pub account_kind: AccountKind,
}

impl Transaction {
    /// A checking-account transaction.
    pub fn new(
        amount: impl Into<String>,
        name: impl Into<String>,
        routing: impl Into<String>,
        account: impl Into<String>,
        internal_id: impl Into<String>,
    ) -> Self {
        Transaction {
            amount: amount.into(),
            name: name.into(),
            routing: routing.into(),
            account: account.into(),
            internal_id: internal_id.into(),
            account_kind: AccountKind::Checking,
        }
    }

    /// Targets a savings account instead of checking.
    pub fn savings(mut self) -> Self {
        self.account_kind = AccountKind::Savings;
        self
    }

    /// Checks every field, reporting all failures tagged with the internal id.
    pub fn validate(&self) -> Result<ValidTransaction, ValidationErrors> {
        let id = self.internal_id.as_str();
        let routing = RoutingNumber::from_str(&self.routing).ok();
        let amount = Amount::from_str(&self.amount).ok();

        let mut errors = ValidationErrors::new();
        errors.check_for(routing.is_some(), Field::RoutingNumber, id);
        errors.check_for(numeric_only(&self.account, 17), Field::AccountNumber, id);
        errors.check_for(alphameric_only(id, 15), Field::InternalId, id);
        errors.check_for(alphameric_only(&self.name, 22), Field::Name, id);
        errors.check_for(amount.is_some(), Field::Amount, id);

        match (routing, amount) {
            (Some(routing), Some(amount)) if errors.is_empty() => Ok(ValidTransaction {
                amount,
                name: self.name.clone(),
                routing,
                account: self.account.clone(),
                internal_id: self.internal_id.clone(),
                account_kind: self.account_kind,
            }),
            _ => Err(errors),
        }
    }
}

/// A transaction whose fields are all known to fit their record positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTransaction {
    pub amount: Amount,
    pub name: String,
    pub routing: RoutingNumber,
    pub account: String,
    pub internal_id: String,
    pub account_kind: AccountKind,
}

/// One debit or credit leg, ready to be written as a type 6 record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDetail {
    code: TransactionCode,
    routing: RoutingNumber,
    account: String,
    amount: Amount,
    internal_id: String,
    name: String,
    origin_prefix: String,
    trace: u32,
}

impl EntryDetail {
    /// Builds the leg for `tx` moving money in `direction`.
    ///
    /// `trace` is the entry's 1-based position within the whole file.
    pub fn new(
        direction: Direction,
        tx: &ValidTransaction,
        originating: &RoutingNumber,
        trace: u32,
    ) -> Self {
        EntryDetail {
            code: TransactionCode::new(direction, tx.account_kind),
            routing: tx.routing.clone(),
            account: tx.account.clone(),
            amount: tx.amount,
            internal_id: tx.internal_id.clone(),
            name: tx.name.clone(),
            origin_prefix: originating.prefix().to_string(),
            trace,
        }
    }

    pub fn code(&self) -> TransactionCode {
        self.code
    }

    pub fn is_debit(&self) -> bool {
        self.code.is_debit()
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Contribution of this entry to its batch's entry hash.
    pub fn hash_value(&self) -> u64 {
        self.routing.hash_value()
    }

    pub fn trace(&self) -> u32 {
        self.trace
    }

    pub fn internal_id(&self) -> &str {
        &self.internal_id
    }

    pub fn record(&self) -> String {
        [
            "6".to_string(),
            format_number(self.code.code(), 2),
            format_number(self.routing.as_str(), 9),
            format_text(&self.account, 17),
            format_number(self.amount.minor_units(), 10),
            format_text(&self.internal_id, 15),
            format_text(&self.name, 22),
            blank(2),
            // discretionary data / addenda indicator
            "0".to_string(),
            self.origin_prefix.clone(),
            format_number(self.trace, 7),
        ]
        .concat()
    }
}

/// Validates `tx` and builds its single leg in one step.
pub fn build_entry(
    direction: Direction,
    tx: &Transaction,
    originating: &RoutingNumber,
    trace: u32,
) -> Result<EntryDetail, ValidationErrors> {
    let valid = tx.validate()?;
    Ok(EntryDetail::new(direction, &valid, originating, trace))
}
