//! File assembly: the type 1 header, batches, the type 9 control record
//! and block padding.
//!
//! # Lifecycle
//!
//! A [`NachaFile`] is open from the moment [`NachaFile::new`] succeeds and
//! closed once [`NachaFile::finalize`] writes the file control record.
//! Within an open file the batch cursor moves between
//! [`BatchState::NoBatch`], [`BatchState::BatchOpen`] and
//! [`BatchState::BatchClosed`]. Opening a batch while another is open
//! closes the earlier one first.
//!
//! Every operation either succeeds completely or returns an error and
//! leaves the file untouched.

use crate::batch::{Batch, BatchOptions, ENTRY_HASH_MODULUS, MAX_BATCH_ENTRIES};
use crate::entry::{AccountKind, Direction, EntryDetail, Transaction, ValidTransaction};
use crate::error::{Field, NachaError, Result, ValidationErrors};
use crate::format::{blank, format_number, format_text};
use crate::routing::RoutingNumber;
use crate::validate::{alpha_numeric_only, alphameric_only, numeric_only};
use chrono::{Local, NaiveDateTime};
use log::debug;
use serde::Deserialize;
use std::str::FromStr;

/// Lines per block; the file is padded to a multiple of this.
pub const BLOCKING_FACTOR: usize = 10;

/// Characters per record, excluding the line terminator.
pub const RECORD_SIZE: usize = 94;

/// Largest trace number the 7-digit trace field can carry.
pub const MAX_TRACE_NUMBER: usize = 9_999_999;

/// Largest batch or block count the 6-digit file control fields can carry.
pub const MAX_FILE_COUNT: usize = 999_999;

/// File modifier used when the originator does not set one.
pub const DEFAULT_FILE_MODIFIER: &str = "A";

/// Originator settings as supplied by the caller, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OriginatorConfig {
    /// Immediate origin (usually the company's tax id)
    pub origin_id: String,
    pub company_id: String,
    pub company_name: String,
    pub settlement_routing: String,
    pub settlement_account: String,
    pub originating_bank_name: String,

    /// Mirror every entry against the settlement account. Defaults to off.
    #[serde(default)]
    pub balanced_file: Option<bool>,

    /// The settlement account is a savings account. Defaults to checking.
    #[serde(default)]
    pub settlement_is_savings: Option<bool>,

    /// Distinguishes files created on the same day. Defaults to `A`.
    #[serde(default)]
    pub file_modifier: Option<String>,
}

impl OriginatorConfig {
    /// Settings with every optional field left at its default.
    pub fn new(
        origin_id: impl Into<String>,
        company_id: impl Into<String>,
        company_name: impl Into<String>,
        settlement_routing: impl Into<String>,
        settlement_account: impl Into<String>,
        originating_bank_name: impl Into<String>,
    ) -> Self {
        OriginatorConfig {
            origin_id: origin_id.into(),
            company_id: company_id.into(),
            company_name: company_name.into(),
            settlement_routing: settlement_routing.into(),
            settlement_account: settlement_account.into(),
            originating_bank_name: originating_bank_name.into(),
            balanced_file: None,
            settlement_is_savings: None,
            file_modifier: None,
        }
    }

    /// Turns on balanced mode.
    pub fn balanced(mut self) -> Self {
        self.balanced_file = Some(true);
        self
    }

    /// Marks the settlement account as savings.
    pub fn settlement_savings(mut self) -> Self {
        self.settlement_is_savings = Some(true);
        self
    }

    /// Overrides the default file modifier.
    pub fn file_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.file_modifier = Some(modifier.into());
        self
    }
}

/// Validated originator settings shared by every record in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Originator {
    pub(crate) origin_id: String,
    pub(crate) company_id: String,
    pub(crate) company_name: String,
    pub(crate) settlement_routing: RoutingNumber,
    pub(crate) settlement_account: String,
    pub(crate) originating_bank_name: String,
    pub(crate) balanced_file: bool,
    pub(crate) settlement_kind: AccountKind,
    pub(crate) file_modifier: String,
}

impl Originator {
    /// Validates `config`, reporting every rejected field at once.
    pub fn from_config(config: &OriginatorConfig) -> std::result::Result<Self, ValidationErrors> {
        let settlement_routing = RoutingNumber::from_str(&config.settlement_routing).ok();
        let file_modifier = config
            .file_modifier
            .clone()
            .unwrap_or_else(|| DEFAULT_FILE_MODIFIER.to_string());

        let mut errors = ValidationErrors::new();
        errors.check(numeric_only(&config.origin_id, 10), Field::OriginId);
        errors.check(settlement_routing.is_some(), Field::SettlementRouting);
        errors.check(
            alpha_numeric_only(&file_modifier, 1),
            Field::FileModifier,
        );
        errors.check(
            alphameric_only(&config.originating_bank_name, 23),
            Field::OriginatingBankName,
        );
        errors.check(alphameric_only(&config.company_name, 23), Field::CompanyName);
        errors.check(alphameric_only(&config.company_id, 10), Field::CompanyId);
        errors.check(
            numeric_only(&config.settlement_account, 17),
            Field::SettlementAccount,
        );

        match settlement_routing {
            Some(settlement_routing) if errors.is_empty() => Ok(Originator {
                origin_id: config.origin_id.clone(),
                company_id: config.company_id.clone(),
                company_name: config.company_name.clone(),
                settlement_routing,
                settlement_account: config.settlement_account.clone(),
                originating_bank_name: config.originating_bank_name.clone(),
                balanced_file: config.balanced_file.unwrap_or(false),
                settlement_kind: AccountKind::from_savings(
                    config.settlement_is_savings.unwrap_or(false),
                ),
                file_modifier,
            }),
            _ => Err(errors),
        }
    }

    /// Name shown on batch headers and offset entries.
    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    /// Routing number of the originating bank.
    pub fn settlement_routing(&self) -> &RoutingNumber {
        &self.settlement_routing
    }

    /// Whether every entry gets a settlement-side mirror.
    pub fn is_balanced(&self) -> bool {
        self.balanced_file
    }

    /// The settlement-account side of `tx`, used in balanced files.
    fn offset_for(&self, tx: &ValidTransaction) -> ValidTransaction {
        ValidTransaction {
            amount: tx.amount,
            name: self.company_name.clone(),
            routing: self.settlement_routing.clone(),
            account: self.settlement_account.clone(),
            internal_id: tx.internal_id.clone(),
            account_kind: self.settlement_kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Open,
    Closed,
}

/// Where the file stands with respect to its most recent batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    NoBatch,
    BatchOpen,
    BatchClosed,
}

/// File-level totals, derived by summing over the batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTotals {
    pub batch_count: usize,
    pub entry_count: usize,
    /// Header, batch, and file control lines, excluding padding.
    pub line_count: usize,
    pub block_count: usize,
    pub padding_lines: usize,
    pub entry_hash: u64,
    pub total_debits: u64,
    pub total_credits: u64,
}

/// Returns `(block_count, padding_lines)` for a file of `line_count` lines.
///
/// ```
/// use nacha_file::file::block_layout;
///
/// assert_eq!(block_layout(23), (3, 7));
/// assert_eq!(block_layout(10), (1, 0));
/// ```
pub fn block_layout(line_count: usize) -> (usize, usize) {
    let blocks = line_count.div_ceil(BLOCKING_FACTOR);
    (blocks, blocks * BLOCKING_FACTOR - line_count)
}

/// Refuses a change that would push a trace number or count past the width
/// of its field.
///
/// `totals` describes the file before the change, `opens_batch` whether the
/// change starts a new batch, `batch_entries` the size of the receiving batch
/// afterwards and `added` the number of new entries.
fn check_capacity(
    totals: &FileTotals,
    opens_batch: bool,
    batch_entries: usize,
    added: usize,
) -> Result<()> {
    let exceeded = |what, limit| NachaError::CapacityExceeded { what, limit };

    if totals.entry_count + added > MAX_TRACE_NUMBER {
        return Err(exceeded("entries", MAX_TRACE_NUMBER));
    }
    if batch_entries > MAX_BATCH_ENTRIES {
        return Err(exceeded("entries in one batch", MAX_BATCH_ENTRIES));
    }
    let new_batch = usize::from(opens_batch);
    if totals.batch_count + new_batch > MAX_FILE_COUNT {
        return Err(exceeded("batches", MAX_FILE_COUNT));
    }
    let (blocks, _) = block_layout(totals.line_count + added + 2 * new_batch);
    if blocks > MAX_FILE_COUNT {
        return Err(exceeded("blocks", MAX_FILE_COUNT));
    }
    Ok(())
}

/// A NACHA file under construction.
#[derive(Debug, Clone)]
pub struct NachaFile {
    originator: Originator,
    created: NaiveDateTime,
    header: String,
    batches: Vec<Batch>,
    batch_section: String,
    footer: Option<String>,
}

impl NachaFile {
    /// Validates the originator and opens a file stamped with the local time.
    pub fn new(config: &OriginatorConfig) -> Result<Self> {
        Self::with_creation_time(config, Local::now().naive_local())
    }

    /// Like [`new`](Self::new) with an explicit creation time. The date is
    /// also used as the effective entry date of every batch.
    pub fn with_creation_time(config: &OriginatorConfig, created: NaiveDateTime) -> Result<Self> {
        let originator = Originator::from_config(config)?;

        let header = [
            "1".to_string(),
            // priority code
            "01".to_string(),
            // immediate destination and origin are blank-led 10-character fields
            " ".to_string(),
            format_number(originator.settlement_routing.as_str(), 9),
            " ".to_string(),
            format_number(&originator.origin_id, 9),
            created.format("%y%m%d").to_string(),
            created.format("%H%M").to_string(),
            format_text(&originator.file_modifier, 1),
            format_number(RECORD_SIZE, 3),
            format_number(BLOCKING_FACTOR, 2),
            // format code
            "1".to_string(),
            format_text(&originator.originating_bank_name, 23),
            format_text(&originator.company_name, 23),
            // reference code
            blank(8),
        ]
        .concat();

        debug!(
            "Opened file for {} (balanced: {})",
            originator.company_name, originator.balanced_file
        );

        Ok(NachaFile {
            originator,
            created,
            header,
            batches: Vec::new(),
            batch_section: String::new(),
            footer: None,
        })
    }

    /// The validated originator settings.
    pub fn originator(&self) -> &Originator {
        &self.originator
    }

    /// The file header record.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Batches in file order, the last possibly still open.
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// Open until [`finalize`](Self::finalize) succeeds.
    pub fn state(&self) -> FileState {
        if self.footer.is_some() {
            FileState::Closed
        } else {
            FileState::Open
        }
    }

    /// Derived from the most recent batch.
    pub fn batch_state(&self) -> BatchState {
        match self.batches.last() {
            None => BatchState::NoBatch,
            Some(batch) if batch.is_open() => BatchState::BatchOpen,
            Some(_) => BatchState::BatchClosed,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state() {
            FileState::Open => Ok(()),
            FileState::Closed => Err(NachaError::FileClosed),
        }
    }

    /// Opens the next batch and returns its number.
    ///
    /// A batch that is still open is closed first, which fails (and leaves
    /// it open) if it holds no entries.
    pub fn open_batch(&mut self, options: &BatchOptions) -> Result<u32> {
        self.ensure_open()?;
        options.validate()?;
        check_capacity(&self.totals(), true, 0, 0)?;

        if self.batch_state() == BatchState::BatchOpen {
            self.close_batch()?;
        }

        let number = self.batches.len() as u32 + 1;
        let batch = Batch::open(number, options, &self.originator, self.created.date());
        self.batches.push(batch);
        Ok(number)
    }

    /// Closes the open batch.
    pub fn close_batch(&mut self) -> Result<()> {
        self.ensure_open()?;
        match self.batches.last_mut() {
            Some(batch) if batch.is_open() => batch.close(&self.originator),
            _ => Err(NachaError::NoBatchToClose),
        }
    }

    /// Pulls funds from the receiver's account (codes 27/37).
    ///
    /// With `batch` set a new batch is opened for the entry, otherwise it
    /// joins the open batch. Returns the trace number of the entry.
    pub fn create_debit_entry(
        &mut self,
        tx: &Transaction,
        batch: Option<&BatchOptions>,
    ) -> Result<u32> {
        self.create_entry(Direction::Debit, tx, batch)
    }

    /// Pushes funds to the receiver's account (codes 22/32).
    ///
    /// See [`create_debit_entry`](Self::create_debit_entry) for `batch`.
    pub fn create_credit_entry(
        &mut self,
        tx: &Transaction,
        batch: Option<&BatchOptions>,
    ) -> Result<u32> {
        self.create_entry(Direction::Credit, tx, batch)
    }

    fn create_entry(
        &mut self,
        direction: Direction,
        tx: &Transaction,
        batch: Option<&BatchOptions>,
    ) -> Result<u32> {
        self.ensure_open()?;

        let mut errors = ValidationErrors::new();
        let valid = tx.validate().map_err(|e| errors.extend(e)).ok();
        if let Some(options) = batch {
            if let Err(e) = options.validate() {
                errors.extend(e);
            }
        }
        let valid = match valid {
            Some(valid) if errors.is_empty() => valid,
            _ => return Err(errors.into()),
        };

        let in_batch = match (batch, self.batches.last()) {
            (Some(_), _) => 0,
            (None, Some(open)) if open.is_open() => open.entries().len(),
            (None, _) => {
                return Err(NachaError::NoOpenBatch {
                    internal_id: tx.internal_id.clone(),
                })
            }
        };
        let added = if self.originator.balanced_file { 2 } else { 1 };
        check_capacity(&self.totals(), batch.is_some(), in_batch + added, added)?;

        if let Some(options) = batch {
            self.open_batch(options)?;
        }

        let trace = self.entry_count() as u32 + 1;
        let settlement = &self.originator.settlement_routing;
        let primary = EntryDetail::new(direction, &valid, settlement, trace);
        let offset = self.originator.balanced_file.then(|| {
            let mirror = self.originator.offset_for(&valid);
            EntryDetail::new(direction.opposite(), &mirror, settlement, trace + 1)
        });

        let current = self
            .batches
            .last_mut()
            .ok_or_else(|| NachaError::NoOpenBatch {
                internal_id: tx.internal_id.clone(),
            })?;
        current.append(primary)?;
        if let Some(offset) = offset {
            current.append(offset)?;
        }

        debug!(
            "Entry {} ({:?} {}) added to batch {} as trace {}",
            tx.internal_id,
            direction,
            valid.amount,
            current.number(),
            trace
        );
        Ok(trace)
    }

    fn entry_count(&self) -> usize {
        self.batches.iter().map(|b| b.entries().len()).sum()
    }

    /// Totals as the file control record reports them.
    ///
    /// Before finalization an open batch is counted as if already closed.
    pub fn totals(&self) -> FileTotals {
        let entry_count = self.entry_count();
        let line_count = 1 + (entry_count + 2 * self.batches.len()) + 1;
        let (block_count, padding_lines) = block_layout(line_count);
        let hash_sum: u64 = self.batches.iter().map(Batch::hash_sum).sum();

        FileTotals {
            batch_count: self.batches.len(),
            entry_count,
            line_count,
            block_count,
            padding_lines,
            entry_hash: hash_sum % ENTRY_HASH_MODULUS,
            total_debits: self.batches.iter().map(Batch::total_debits).sum(),
            total_credits: self.batches.iter().map(Batch::total_credits).sum(),
        }
    }

    /// Closes any open batch and writes the file control record and padding.
    ///
    /// May be called once; afterwards the file is closed and every
    /// mutating operation fails with [`NachaError::FileClosed`].
    pub fn finalize(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.batch_state() == BatchState::BatchOpen {
            self.close_batch()?;
        }

        let mut batch_section = String::new();
        for line in self.batches.iter().flat_map(Batch::records) {
            batch_section.push_str(&line);
            batch_section.push('\n');
        }

        let totals = self.totals();
        let mut footer = [
            "9".to_string(),
            format_number(totals.batch_count, 6),
            format_number(totals.block_count, 6),
            format_number(totals.entry_count, 8),
            format_number(totals.entry_hash, 10),
            format_number(totals.total_debits, 12),
            format_number(totals.total_credits, 12),
            blank(39),
        ]
        .concat();
        footer.push('\n');

        let filler = "9".repeat(RECORD_SIZE);
        for _ in 0..totals.padding_lines {
            footer.push_str(&filler);
            footer.push('\n');
        }

        debug!(
            "Finalized file: {} batches, {} entries, {} blocks",
            totals.batch_count, totals.entry_count, totals.block_count
        );

        self.batch_section = batch_section;
        self.footer = Some(footer);
        Ok(())
    }

    /// Finalizes the file and returns its full text.
    pub fn render(&mut self) -> Result<String> {
        self.finalize()?;
        let footer = self.footer.as_deref().unwrap_or_default();
        Ok(format!("{}\n{}{}", self.header, self.batch_section, footer))
    }
}
