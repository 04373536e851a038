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

//! Report writers for validation and storage comparison results.
//!
//! # Modules
//!
//! - `markdown`: Correctness validation report
//! - `console`: Fixed-width storage summary table
//! - `json`: Storage comparison export

pub mod console;
pub mod json;
pub mod markdown;

pub use console::{format_storage_summary, print_storage_summary};
pub use json::{export_json, StorageComparison};
pub use markdown::{export_markdown, CorrectnessReport};

/// Placeholder printed for a value that could not be extracted or derived.
pub const NOT_AVAILABLE: &str = "n/a";

/// Formats `value` with `decimals` places and comma-grouped thousands.
pub(crate) fn group_digits(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0.0, 0), "0");
        assert_eq!(group_digits(999.0, 0), "999");
        assert_eq!(group_digits(1000.0, 0), "1,000");
        assert_eq!(group_digits(1_234_567.891, 1), "1,234,567.9");
        assert_eq!(group_digits(-2500.0, 1), "-2,500.0");
        assert_eq!(group_digits(-0.01, 1), "0.0");
        assert_eq!(group_digits(199_900.0, 1), "199,900.0");
    }
}
