//! Error types for NACHA file construction.
//!
//! Field validation failures are collected into [`ValidationErrors`] so a
//! single call reports every bad field at once. Lifecycle violations get
//! their own [`NachaError`] variants.

use std::fmt;
use thiserror::Error;

/// Result type alias for file operations
pub type Result<T> = std::result::Result<T, NachaError>;

/// Every input field that is checked before it is written into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    OriginId,
    CompanyId,
    CompanyName,
    SettlementRouting,
    SettlementAccount,
    OriginatingBankName,
    FileModifier,
    ServiceClassCode,
    Memo,
    RoutingNumber,
    AccountNumber,
    InternalId,
    Name,
    Amount,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::OriginId => "origin ID",
            Field::CompanyId => "company ID",
            Field::CompanyName => "company name",
            Field::SettlementRouting => "settlement routing number",
            Field::SettlementAccount => "settlement account number",
            Field::OriginatingBankName => "originating bank name",
            Field::FileModifier => "file modifier",
            Field::ServiceClassCode => "service class code",
            Field::Memo => "memo (company entry description)",
            Field::RoutingNumber => "routing number",
            Field::AccountNumber => "account number",
            Field::InternalId => "internal ID",
            Field::Name => "name",
            Field::Amount => "amount",
        };
        f.write_str(name)
    }
}

fn for_transaction(transaction: &Option<String>) -> String {
    match transaction {
        Some(id) => format!(" for transaction: {}", id),
        None => String::new(),
    }
}

/// A single field that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field}{}", for_transaction(.transaction))]
pub struct FieldError {
    pub field: Field,

    /// Internal id of the transaction the field belongs to, if any.
    pub transaction: Option<String>,
}

/// Ordered list of field failures found by one operation.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{}", join(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure for `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: Field) {
        if !ok {
            self.0.push(FieldError {
                field,
                transaction: None,
            });
        }
    }

    /// Like [`check`](Self::check), tagging the failure with a transaction id.
    pub fn check_for(&mut self, ok: bool, field: Field, transaction: &str) {
        if !ok {
            self.0.push(FieldError {
                field,
                transaction: Some(transaction.to_string()),
            });
        }
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// The failed fields, in the order they were checked.
    pub fn fields(&self) -> Vec<Field> {
        self.0.iter().map(|e| e.field).collect()
    }

    /// Returns `value` if nothing failed, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, ValidationErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Errors that can occur while building or writing a NACHA file.
#[derive(Error, Debug)]
pub enum NachaError {
    /// One or more input fields were rejected
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// An entry asked to join the open batch but none is open
    #[error("Cannot append to unopened batch for transaction: {internal_id}")]
    NoOpenBatch { internal_id: String },

    /// Close requested with no batch open
    #[error("No open batch to close")]
    NoBatchToClose,

    /// A batch must hold at least one entry before it is closed
    #[error("No entries in batch {batch} on close")]
    EmptyBatch { batch: u32 },

    /// The batch control record has already been written
    #[error("Batch {batch} is already closed")]
    BatchClosed { batch: u32 },

    /// The file control record has already been written
    #[error("File is already finalized")]
    FileClosed,

    /// A count or trace number would no longer fit its fixed-width field
    #[error("Too many {what}: the file format allows at most {limit}")]
    CapacityExceeded { what: &'static str, limit: usize },

    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid entry row
    #[error("Invalid entry at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// The originator CSV has a header but no data row
    #[error("Originator file contains no record")]
    MissingOriginator,

    /// At least one entry row failed, so no file is produced
    #[error("{count} entry row(s) rejected; no file written")]
    Rejected { count: usize },

    /// Missing input file arguments
    #[error("Missing input file argument. Usage: nacha-file <originator.csv> <entries.csv>")]
    MissingArgument,
}
