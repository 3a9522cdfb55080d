// Copyright (c) 2026 openvpn-as-chart contributors
// SPDX-License-Identifier: MIT

//! Values Schema Generator
//!
//! Generates a JSON schema for the chart values from the Rust types in
//! src/values.rs, so the strongly-typed model can be reviewed against
//! charts/openvpn-as/values.schema.json.
//!
//! Usage:
//!   cargo run --bin valuesgen                  # print to stdout
//!   cargo run --bin valuesgen -- <output-path> # write to a file

use openvpn_as_chart::values::ChartValues;
use std::fs;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let schema = schemars::schema_for!(ChartValues);
    let json = serde_json::to_string_pretty(&schema)?;

    match std::env::args().nth(1) {
        Some(output) => {
            let output = Path::new(&output);
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(output, format!("{json}\n"))?;
            println!("✓ Wrote values schema to {}", output.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
