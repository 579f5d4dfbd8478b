//! Batches: a type 5 header, the entries, and a type 8 control record.

use crate::entry::EntryDetail;
use crate::error::{Field, NachaError, Result, ValidationErrors};
use crate::file::Originator;
use crate::format::{blank, format_number, format_text};
use crate::validate::{alphameric_only, numeric_only};
use chrono::NaiveDate;
use log::debug;

/// Entry hashes are reported modulo 10^10 (a 10-digit field).
pub const ENTRY_HASH_MODULUS: u64 = 10_000_000_000;

/// Most entries a batch control's 6-digit count can report.
pub const MAX_BATCH_ENTRIES: usize = 999_999;

/// Mixed debits and credits.
pub const DEFAULT_SERVICE_CLASS_CODE: &str = "200";

/// Standard entry class of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryClass {
    /// Corporate credit or debit
    #[default]
    Ccd,
    /// Prearranged payment and deposit (personal)
    Ppd,
}

impl EntryClass {
    /// PPD for personal accounts, CCD otherwise.
    pub fn from_personal(is_personal: bool) -> Self {
        if is_personal {
            EntryClass::Ppd
        } else {
            EntryClass::Ccd
        }
    }

    /// The three-letter code written to the batch header.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryClass::Ccd => "CCD",
            EntryClass::Ppd => "PPD",
        }
    }
}

/// Caller-supplied settings for a new batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Company entry description, shown to the receiver.
    pub memo: String,
    pub entry_class: EntryClass,
    pub service_class_code: String,
}

impl BatchOptions {
    /// A CCD batch with the mixed service class.
    pub fn new(memo: impl Into<String>) -> Self {
        BatchOptions {
            memo: memo.into(),
            entry_class: EntryClass::Ccd,
            service_class_code: DEFAULT_SERVICE_CLASS_CODE.to_string(),
        }
    }

    /// Marks the batch as personal (PPD) rather than corporate (CCD).
    pub fn personal(mut self) -> Self {
        self.entry_class = EntryClass::Ppd;
        self
    }

    /// Overrides the default service class code (`200`).
    pub fn service_class(mut self, code: impl Into<String>) -> Self {
        self.service_class_code = code.into();
        self
    }

    /// Checks the service class code and the memo.
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            numeric_only(&self.service_class_code, 3),
            Field::ServiceClassCode,
        );
        errors.check(alphameric_only(&self.memo, 10), Field::Memo);
        errors.into_result(())
    }
}

/// One batch and its running totals.
///
/// Totals only ever grow through [`Batch::append`], so they always equal
/// the sums over `entries`.
#[derive(Debug, Clone)]
pub struct Batch {
    number: u32,
    service_class_code: String,
    header: String,
    entries: Vec<EntryDetail>,
    total_debits: u64,
    total_credits: u64,
    hash: u64,
    control: Option<String>,
}

impl Batch {
    /// Opens batch `number` and writes its header record.
    ///
    /// `options` must already have passed [`BatchOptions::validate`].
    pub(crate) fn open(
        number: u32,
        options: &BatchOptions,
        originator: &Originator,
        effective_date: NaiveDate,
    ) -> Self {
        let header = [
            "5".to_string(),
            format_number(&options.service_class_code, 3),
            format_text(&originator.company_name, 16),
            blank(20),
            format_text(&originator.company_id, 10),
            options.entry_class.as_str().to_string(),
            format_text(&options.memo, 10),
            blank(6),
            format_text(&effective_date.format("%y%m%d").to_string(), 6),
            blank(3),
            // originator status code
            "1".to_string(),
            format_text(originator.settlement_routing.as_str(), 8),
            format_number(number, 7),
        ]
        .concat();

        debug!(
            "Opened batch {} ({} {})",
            number,
            options.service_class_code,
            options.entry_class.as_str()
        );

        Batch {
            number,
            service_class_code: options.service_class_code.clone(),
            header,
            entries: Vec::new(),
            total_debits: 0,
            total_credits: 0,
            hash: 0,
            control: None,
        }
    }

    /// Adds an entry and folds it into the running totals.
    pub fn append(&mut self, entry: EntryDetail) -> Result<()> {
        if !self.is_open() {
            return Err(NachaError::BatchClosed { batch: self.number });
        }

        let cents = entry.amount().minor_units();
        if entry.is_debit() {
            self.total_debits += cents;
        } else {
            self.total_credits += cents;
        }
        self.hash += entry.hash_value();
        self.entries.push(entry);
        Ok(())
    }

    /// Writes the control record. Fails on an empty or already closed batch.
    pub fn close(&mut self, originator: &Originator) -> Result<()> {
        if !self.is_open() {
            return Err(NachaError::BatchClosed { batch: self.number });
        }
        if self.entries.is_empty() {
            return Err(NachaError::EmptyBatch { batch: self.number });
        }

        let control = [
            "8".to_string(),
            format_number(&self.service_class_code, 3),
            format_number(self.entries.len(), 6),
            format_number(self.entry_hash(), 10),
            format_number(self.total_debits, 12),
            format_number(self.total_credits, 12),
            format_text(&originator.company_id, 10),
            // message authentication code
            blank(19),
            // reserved
            blank(6),
            format_text(originator.settlement_routing.as_str(), 8),
            format_number(self.number, 7),
        ]
        .concat();

        debug!(
            "Closed batch {}: {} entries, debits {}, credits {}",
            self.number,
            self.entries.len(),
            self.total_debits,
            self.total_credits
        );
        self.control = Some(control);
        Ok(())
    }

    /// True until the control record is written.
    pub fn is_open(&self) -> bool {
        self.control.is_none()
    }

    /// 1-based position of the batch in the file.
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn entries(&self) -> &[EntryDetail] {
        &self.entries
    }

    /// Sum of debit amounts, in cents.
    pub fn total_debits(&self) -> u64 {
        self.total_debits
    }

    /// Sum of credit amounts, in cents.
    pub fn total_credits(&self) -> u64 {
        self.total_credits
    }

    /// Raw sum of the entries' routing prefixes, before the modulus.
    pub fn hash_sum(&self) -> u64 {
        self.hash
    }

    /// The entry hash as written to the control record.
    pub fn entry_hash(&self) -> u64 {
        self.hash % ENTRY_HASH_MODULUS
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    /// The control record, once the batch is closed.
    pub fn control(&self) -> Option<&str> {
        self.control.as_deref()
    }

    /// Header, entries and control, one string per line.
    pub fn records(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len() + 2);
        lines.push(self.header.clone());
        lines.extend(self.entries.iter().map(EntryDetail::record));
        lines.extend(self.control.clone());
        lines
    }
}
