//! # NACHA File Builder
//!
//! Assembles ACH payment files in the NACHA fixed-width format: a file
//! header, one or more batches of debit and credit entries, and the
//! control records and block padding receiving banks check on arrival.
//!
//! ## Design Principles
//!
//! - **Validate once**: raw input is checked at the boundary and carried as
//!   typed values ([`Amount`], [`RoutingNumber`]) from then on
//! - **Whole cents**: amounts and totals are integer minor units
//! - **Derived totals**: file-level counts and hashes are summed from the
//!   batches, never tracked twice
//! - **All or nothing**: a failed call leaves the file as it was
//!
//! ## Example
//!
//! ```
//! use nacha_file::{BatchOptions, NachaFile, OriginatorConfig, Transaction};
//!
//! let config = OriginatorConfig::new(
//!     "1234567890", "1234567890", "Acme Corp", "021000021", "987654321", "First Bank",
//! );
//! let mut file = NachaFile::new(&config).unwrap();
//!
//! let payee = Transaction::new("100.00", "John Doe", "011000015", "12345678", "INV001");
//! file.create_debit_entry(&payee, Some(&BatchOptions::new("RENT"))).unwrap();
//!
//! let contents = file.render().unwrap();
//! assert_eq!(contents.lines().count(), 10);
//! ```

pub mod amount;
pub mod batch;
pub mod engine;
pub mod entry;
pub mod error;
pub mod file;
pub mod format;
pub mod routing;
pub mod transaction;
pub mod validate;

pub use amount::{Amount, AmountError};
pub use batch::{Batch, BatchOptions, EntryClass};
pub use engine::AchEngine;
pub use entry::{build_entry, AccountKind, Direction, EntryDetail, Transaction, TransactionCode};
pub use error::{Field, FieldError, NachaError, Result, ValidationErrors};
pub use file::{BatchState, FileState, FileTotals, NachaFile, Originator, OriginatorConfig};
pub use routing::RoutingNumber;
pub use transaction::{ParsedTransaction, TransactionRecord};
