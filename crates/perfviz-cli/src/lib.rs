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

//! Perfviz CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! ## Matrix-multiply experiments
//!
//! - **all**: Render every experiment chart
//! - **speedup**: Single-thread comparison and thread scaling
//! - **break-even**: Dense versus CSR throughput and the break-even sparsity
//! - **working-set**: Throughput over matrix size
//! - **roofline**: Measured kernels against the theoretical roofline
//!
//! ## Validation
//!
//! - **validate**: Check the vectorized and row-parallel multiplies against
//!   the scalar reference and write the correctness report
//!
//! ## Storage
//!
//! - **storage**: Compare hardware and software storage reports

pub mod cli;
pub mod commands;
