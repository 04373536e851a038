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

//! JSON export for storage comparison results.

use crate::compare::ImprovementSummary;
use crate::error::{PerfvizError, Result};
use crate::extract::MetricSet;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Extracted metrics and derived improvements of one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct StorageComparison {
    /// Generation time (RFC 3339).
    pub timestamp: String,
    /// Hardware report metrics.
    pub hardware: MetricSet,
    /// Software report metrics.
    pub software: MetricSet,
    /// Improvement ratios; missing values serialize as `null`.
    pub improvements: ImprovementSummary,
}

impl StorageComparison {
    /// Creates a comparison stamped with the current time.
    pub fn new(hardware: MetricSet, software: MetricSet, improvements: ImprovementSummary) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            hardware,
            software,
            improvements,
        }
    }
}

/// Exports a storage comparison as pretty-printed JSON.
pub fn export_json(comparison: &StorageComparison, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(comparison)?;
    fs::write(path, json).map_err(|e| PerfvizError::io_error(path, e))
}
