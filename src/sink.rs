use crate::error::HarvestError;
use crate::results::ListingRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column names of the output, in order
pub const HEADER: [&str; 3] = ["title", "location", "link"];

/// Destination for the final record list
pub trait RecordSink {
    /// Persist all records; called once, after assembly has completed
    fn write_records(&mut self, records: &[ListingRecord]) -> Result<(), HarvestError>;
}

/// Writes records as CSV rows under a `title,location,link` header
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    /// Create (or truncate) the output file
    pub fn create(path: impl AsRef<Path>) -> Result<Self, HarvestError> {
        let file = File::create(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(inner: W) -> Self {
        // Header is written by hand so it appears even with zero records
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        Self { writer }
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W, HarvestError> {
        self.writer
            .into_inner()
            .map_err(|e| HarvestError::Io(e.into_error()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_records(&mut self, records: &[ListingRecord]) -> Result<(), HarvestError> {
        self.writer.write_record(HEADER)?;
        for record in records {
            self.writer.serialize(record)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
