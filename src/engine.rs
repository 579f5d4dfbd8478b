//! CSV-driven file generation.
//!
//! Reads the originator from one CSV and entry rows from another, feeding
//! each row into a [`NachaFile`]. Rejected rows are logged and counted; a
//! file with any rejected row is never written.

use crate::entry::Direction;
use crate::error::{NachaError, Result};
use crate::file::{NachaFile, OriginatorConfig};
use crate::transaction::{ParsedTransaction, TransactionRecord};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::io::{Read, Write};

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader)
}

/// Reads the first originator record from CSV.
pub fn read_originator<R: Read>(reader: R) -> Result<OriginatorConfig> {
    let mut csv_reader = csv_reader(reader);
    let record = csv_reader
        .deserialize::<OriginatorConfig>()
        .next()
        .ok_or(NachaError::MissingOriginator)??;
    Ok(record)
}

/// Drives a [`NachaFile`] from CSV entry rows.
pub struct AchEngine {
    file: NachaFile,

    /// Every row that could not be added, in input order.
    rejected: Vec<NachaError>,
}

impl AchEngine {
    /// Wraps an already opened file.
    pub fn new(file: NachaFile) -> Self {
        AchEngine {
            file,
            rejected: Vec::new(),
        }
    }

    /// Builds an engine whose file is opened from an originator CSV.
    pub fn from_originator_csv<R: Read>(reader: R) -> Result<Self> {
        let config = read_originator(reader)?;
        Ok(Self::new(NachaFile::new(&config)?))
    }

    /// Adds every entry row, recording the ones that fail.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = csv_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<TransactionRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            let outcome = result
                .map_err(NachaError::from)
                .and_then(|record| record.parse(row_num))
                .and_then(|tx| self.apply(tx));

            match outcome {
                Ok(trace) => debug!("Row {}: added as trace {}", row_num, trace),
                Err(e) => {
                    warn!("Row {}: {}", row_num, e);
                    self.rejected.push(match e {
                        invalid @ NachaError::InvalidRecord { .. } => invalid,
                        other => NachaError::InvalidRecord {
                            row: row_num,
                            message: other.to_string(),
                        },
                    });
                }
            }
        }

        Ok(())
    }

    fn apply(&mut self, tx: ParsedTransaction) -> Result<u32> {
        let batch = tx.batch.as_ref();
        match tx.direction {
            Direction::Debit => self.file.create_debit_entry(&tx.transaction, batch),
            Direction::Credit => self.file.create_credit_entry(&tx.transaction, batch),
        }
    }

    /// Rows refused so far, each as an [`NachaError::InvalidRecord`].
    pub fn rejected(&self) -> &[NachaError] {
        &self.rejected
    }

    /// The file being built.
    pub fn file(&self) -> &NachaFile {
        &self.file
    }

    /// Renders the file and writes it out.
    ///
    /// Refuses with [`NachaError::Rejected`] when any row was rejected.
    pub fn write_output<W: Write>(&mut self, mut writer: W) -> Result<()> {
        if !self.rejected.is_empty() {
            return Err(NachaError::Rejected {
                count: self.rejected.len(),
            });
        }

        let contents = self.file.render()?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
