// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

pub mod embl;
pub mod feature;
pub mod file;
pub mod line_code;
pub mod location;
pub mod record;
pub mod sections;
