use crate::error::{OrchestratorError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One inbound transfer request: who asked and how much they declared.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct IntakeRecord {
    pub origin: String,
    pub amount: Decimal,
}

/// Streams transfer requests out of an `origin, amount` CSV.
///
/// Amounts are parsed but not validated; non-positive values are left for
/// intake to reject so they can be reported per row.
pub struct IntakeReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> IntakeReader<R> {
    /// Cells are trimmed, so `origin, amount` headers with spaces still match.
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// One item per data row; a malformed row yields an error and reading continues.
    pub fn records(self) -> impl Iterator<Item = Result<IntakeRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(OrchestratorError::from))
    }
}
