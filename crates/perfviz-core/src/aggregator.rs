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

//! Result aggregation and statistics computation.
//!
//! Groups validation and benchmark records by a categorical key and
//! computes mean/max/min summaries. Groups live in ordered maps, so keys
//! are unique and output order is stable.

use crate::records::{BenchmarkRecord, ValidationRecord, ValidationStatus};
use serde::Serialize;
use std::collections::BTreeMap;

/// Statistical summary of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Statistics {
    /// Arithmetic mean.
    pub mean: f64,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// Number of samples.
    pub count: usize,
}

impl Statistics {
    /// Computes statistics over `values`; all zero for an empty slice.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let sum: f64 = values.iter().sum();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            mean: sum / values.len() as f64,
            min,
            max,
            count: values.len(),
        }
    }
}

/// Groups items under the key returned by `key_fn`.
pub fn group_by<'a, T, K, F>(items: &'a [T], key_fn: F) -> BTreeMap<K, Vec<&'a T>>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut grouped: BTreeMap<K, Vec<&'a T>> = BTreeMap::new();
    for item in items {
        grouped.entry(key_fn(item)).or_default().push(item);
    }
    grouped
}

/// Grouping granularity for validation summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// One group per implementation.
    Implementation,
    /// One group per implementation and matrix size.
    ImplementationSize,
    /// One group per implementation, size and sparsity.
    ImplementationSizeSparsity,
}

/// Composite group label for validation summaries.
///
/// Sparsity is stored in parts-per-million so the key is totally ordered.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ValidationKey {
    /// Implementation name.
    pub implementation: String,
    /// Matrix size, when grouped by size.
    pub matrix_size: Option<usize>,
    /// Sparsity in parts-per-million, when grouped by sparsity.
    pub sparsity_ppm: Option<u64>,
}

impl ValidationKey {
    fn of(record: &ValidationRecord, key: GroupKey) -> Self {
        let with_size = !matches!(key, GroupKey::Implementation);
        let with_sparsity = matches!(key, GroupKey::ImplementationSizeSparsity);
        Self {
            implementation: record.implementation.clone(),
            matrix_size: with_size.then_some(record.matrix_size),
            sparsity_ppm: with_sparsity.then(|| (record.sparsity * 1e6).round() as u64),
        }
    }
}

/// Summary of one validation group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    /// Group label.
    pub key: ValidationKey,
    /// Statistics of `max_relative_error` over the group's finite errors.
    pub error: Statistics,
    /// Number of passing records.
    pub passed: usize,
    /// Number of records in the group.
    pub total: usize,
    /// AND-reduction of the member statuses.
    pub overall: ValidationStatus,
}

/// Reduces member statuses to one group status.
///
/// `PASS` only if every member passed; any `ERROR` makes the group `ERROR`;
/// otherwise `FAIL`. An empty group is vacuously `PASS`.
pub fn overall_status<'a, I>(statuses: I) -> ValidationStatus
where
    I: IntoIterator<Item = &'a ValidationStatus>,
{
    let mut overall = ValidationStatus::Pass;
    for status in statuses {
        match status {
            ValidationStatus::Error => return ValidationStatus::Error,
            ValidationStatus::Fail => overall = ValidationStatus::Fail,
            ValidationStatus::Pass => {}
        }
    }
    overall
}

/// Summarizes validation records per group.
pub fn summarize_validation(records: &[ValidationRecord], key: GroupKey) -> Vec<ValidationSummary> {
    group_by(records, |r| ValidationKey::of(r, key))
        .into_iter()
        .map(|(key, members)| {
            let errors: Vec<f64> = members
                .iter()
                .map(|r| r.max_relative_error)
                .filter(|e| e.is_finite())
                .collect();
            ValidationSummary {
                key,
                error: Statistics::from_values(&errors),
                passed: members.iter().filter(|r| r.status.is_pass()).count(),
                total: members.len(),
                overall: overall_status(members.iter().map(|r| &r.status)),
            }
        })
        .collect()
}

/// Throughput summary of one benchmark group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThroughputSummary<K> {
    /// Group label.
    pub key: K,
    /// Statistics of `gflops`.
    pub gflops: Statistics,
}

/// Summarizes `gflops` per group.
pub fn summarize_throughput<K, F>(records: &[BenchmarkRecord], key_fn: F) -> Vec<ThroughputSummary<K>>
where
    K: Ord,
    F: Fn(&BenchmarkRecord) -> K,
{
    group_by(records, key_fn)
        .into_iter()
        .map(|(key, members)| {
            let values: Vec<f64> = members.iter().map(|r| r.gflops).collect();
            ThroughputSummary {
                key,
                gflops: Statistics::from_values(&values),
            }
        })
        .collect()
}
