// Dweve Perfviz - Benchmark Result Analysis and Reporting
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Result file loading.
//!
//! A missing input file is a normal condition: every loader returns
//! `Ok(None)` and logs a warning, and the caller renders placeholder output.
//! Anything else that goes wrong (unreadable file, malformed CSV, oversized
//! input) is an error.

use crate::error::{PerfvizError, Result};
use crate::records::BenchmarkRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Default maximum input size (1 GB).
/// Can be overridden via the `PERFVIZ_MAX_FILE_SIZE` environment variable.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Environment variable overriding [`DEFAULT_MAX_FILE_SIZE`].
pub const MAX_FILE_SIZE_ENV: &str = "PERFVIZ_MAX_FILE_SIZE";

/// Returns the maximum input size, honoring `PERFVIZ_MAX_FILE_SIZE`.
pub fn max_file_size() -> u64 {
    std::env::var(MAX_FILE_SIZE_ENV)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// Checks that `path` exists and is within the size limit.
///
/// Returns `Ok(false)` when the file does not exist.
fn check_input(path: &Path) -> Result<bool> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "input file not found, treating as no data");
            return Ok(false);
        }
        Err(e) => return Err(PerfvizError::io_error(path, e)),
    };

    let max = max_file_size();
    if metadata.len() > max {
        return Err(PerfvizError::FileTooLarge {
            path: path.to_path_buf(),
            actual: metadata.len(),
            max,
        });
    }
    Ok(true)
}

/// Loads a CSV file with a header row into typed records.
///
/// # Returns
///
/// `Ok(None)` if the file does not exist, otherwise every row deserialized
/// by header name. Values are whitespace-trimmed.
///
/// # Errors
///
/// Returns an error if the file cannot be read, exceeds the size limit, or
/// a row fails to deserialize.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>> {
    if !check_input(path)? {
        return Ok(None);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| PerfvizError::csv_error(path, e))?;

    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()
        .map_err(|e| PerfvizError::csv_error(path, e))?;

    debug!(path = %path.display(), rows = records.len(), "loaded csv");
    Ok(Some(records))
}

/// Loads benchmark records and checks each row's value ranges.
///
/// # Errors
///
/// Same as [`load_records`], plus [`PerfvizError::InvalidConfig`] for a row
/// whose sparsity, throughput or intensity is out of range.
pub fn load_benchmarks(path: &Path) -> Result<Option<Vec<BenchmarkRecord>>> {
    let records = match load_records::<BenchmarkRecord>(path)? {
        Some(records) => records,
        None => return Ok(None),
    };
    for record in &records {
        record.validate()?;
    }
    Ok(Some(records))
}

/// Reads a free-text report under the same size guard as CSV inputs.
///
/// # Returns
///
/// `Ok(None)` if the file does not exist.
pub fn read_report(path: &Path) -> Result<Option<String>> {
    if !check_input(path)? {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .map_err(|e| PerfvizError::io_error(path, e))
}

/// Writes records as CSV with a header row, creating parent directories.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PerfvizError::io_error(parent, e))?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| PerfvizError::csv_error(path, e))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| PerfvizError::csv_error(path, e))?;
    }
    writer.flush().map_err(|e| PerfvizError::io_error(path, e))?;
    Ok(())
}
