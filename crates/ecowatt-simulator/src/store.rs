// Copyright (c) 2025 ECOWATT LABS S.R.O.
//
// This file is part of EcoWatt.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@ecowatt-labs.cz

//! CSV-backed telemetry persistence shared by the simulator and the API.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use ecowatt_types::TelemetryRecord;

use crate::error::Result;

/// Append-only CSV file of hourly telemetry records.
#[derive(Debug, Clone)]
pub struct TelemetryStore {
    path: PathBuf,
}

impl TelemetryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Replace the store contents with the given records.
    pub fn write_all(&self, records: &[TelemetryRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        info!("Wrote {} telemetry records to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Append one record, writing the header only when the file is new.
    pub fn append(&self, record: &TelemetryRecord) -> Result<()> {
        let fresh = !self.path.exists();
        if fresh {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(fresh).from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        debug!(
            "Appended telemetry sample at {} (consumption {:.2} kWh)",
            record.timestamp, record.consumption_kwh
        );
        Ok(())
    }

    /// Load every record, in file order.
    pub fn load(&self) -> Result<Vec<TelemetryRecord>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }
}
