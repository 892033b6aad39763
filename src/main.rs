// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use emblparse::errors::EmblError;

fn main() -> Result<(), EmblError> {
    emblparse::run()
}
