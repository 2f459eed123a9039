//! CSV ingestion into a [`Dataset`].

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tdash_common::{Column, Dataset, Record, Result, TDashError};
use tracing::{debug, info, instrument, warn};

/// Reads tweet exports. Unknown headers are ignored, short rows are padded
/// with missing values and malformed cells become missing.
pub struct DatasetLoader;

impl DatasetLoader {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Dataset> {
        let file = File::open(path).map_err(|e| {
            TDashError::dataset_with_source(format!("Cannot open dataset {}", path.display()), e)
        })?;
        let dataset = Self::from_reader(file)?.with_source(path);
        info!(
            "Loaded {} records with {} known columns from {}",
            dataset.len(),
            dataset.columns().count(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        // first occurrence of a column wins
        let mut positions: BTreeMap<Column, usize> = BTreeMap::new();
        for (index, header) in reader.byte_headers()?.iter().enumerate() {
            let header = String::from_utf8_lossy(header);
            match Column::from_header(header.trim()) {
                Some(column) => {
                    positions.entry(column).or_insert(index);
                }
                None => debug!(header = %header, "Ignoring unknown column"),
            }
        }
        if positions.is_empty() {
            warn!("Dataset header contains no known columns");
        }

        let mut records = Vec::new();
        for row in reader.byte_records() {
            let row = row?;
            let mut record = Record::default();
            for (&column, &index) in &positions {
                let cell = row.get(index).map(String::from_utf8_lossy).unwrap_or_default();
                record.set_field(column, &cell);
            }
            records.push(record);
        }

        Ok(Dataset::new(positions.into_keys(), records))
    }
}
