// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - mesh importing

mod importer;

pub use importer::{import_stl, read_stl};
