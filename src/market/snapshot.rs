//! Market snapshot files.
//!
//! A snapshot is a delimited table with a header row and a single data row.
//! Recognised columns (case-insensitive): `spot`, `risk_free_rate`,
//! `div_yield`, `vol`. Missing columns and empty cells are absent values;
//! unknown columns are ignored.
//!
//! ```text
//! Spot,Risk_Free_Rate,div_yield,vol
//! 102.5,0.035,0.005,0.22
//! ```

use super::environment::MarketEnvironment;
use crate::error::{PricingError, PricingResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Scalar market values; `None` means "leave unchanged".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSnapshot {
    pub spot: Option<f64>,
    pub risk_free_rate: Option<f64>,
    pub div_yield: Option<f64>,
    pub vol: Option<f64>,
}

impl MarketSnapshot {
    /// Parse the first data row of a snapshot table.
    pub fn from_reader<R: Read>(reader: R, source: &str) -> PricingResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: csv::StringRecord = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .collect();
        rdr.set_headers(headers);

        match rdr.deserialize::<MarketSnapshot>().next() {
            Some(row) => Ok(row?),
            None => Err(PricingError::SnapshotEmpty {
                path: source.to_string(),
            }),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> PricingResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_reader(file, &path.display().to_string())
    }
}

impl MarketEnvironment {
    /// Load a snapshot file and apply its present fields. A malformed file
    /// leaves the environment untouched.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> PricingResult<()> {
        let snapshot = MarketSnapshot::from_path(path.as_ref())?;
        debug!(path = %path.as_ref().display(), ?snapshot, "market snapshot loaded");
        self.apply_snapshot(&snapshot)
    }

    pub fn load_from_str(&mut self, contents: &str) -> PricingResult<()> {
        let snapshot = MarketSnapshot::from_reader(contents.as_bytes(), "<memory>")?;
        self.apply_snapshot(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_row() {
        let snap = MarketSnapshot::from_reader(
            "spot,risk_free_rate,div_yield,vol\n102.5,0.035,0.005,0.22\n".as_bytes(),
            "test",
        )
        .unwrap();
        assert_eq!(snap.spot, Some(102.5));
        assert_eq!(snap.risk_free_rate, Some(0.035));
        assert_eq!(snap.div_yield, Some(0.005));
        assert_eq!(snap.vol, Some(0.22));
    }

    #[test]
    fn test_headers_case_insensitive_and_blank_cells() {
        let snap = MarketSnapshot::from_reader(
            " SPOT , Vol ,Risk_Free_Rate,comment\n101,, 0.04 ,hello\n".as_bytes(),
            "test",
        )
        .unwrap();
        assert_eq!(snap.spot, Some(101.0));
        assert_eq!(snap.vol, None);
        assert_eq!(snap.risk_free_rate, Some(0.04));
        assert_eq!(snap.div_yield, None);
    }

    #[test]
    fn test_non_numeric_cell_fails() {
        let err = MarketSnapshot::from_reader("spot,vol\n100,abc\n".as_bytes(), "test").unwrap_err();
        assert!(matches!(err, PricingError::SnapshotParse(_)));
    }

    #[test]
    fn test_missing_data_row() {
        let err = MarketSnapshot::from_reader("spot,vol\n".as_bytes(), "empty.csv").unwrap_err();
        assert!(matches!(err, PricingError::SnapshotEmpty { .. }));
    }
}
