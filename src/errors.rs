// Copyright (c) 2026 openvpn-as-chart contributors
// SPDX-License-Identifier: MIT

//! Error types for chart loading, values handling and helm invocations.
//!
//! The name resolver and resource builders never fail; everything that
//! touches the filesystem, parses YAML/JSON or shells out to `helm` reports
//! one of these structured errors.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can occur while loading a chart or layering its values.
#[derive(Error, Debug)]
pub enum ChartError {
    /// A chart file could not be read
    #[error("Failed to read '{}': {}", .path.display(), .source)]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A YAML chart file is malformed or does not match the expected shape
    ///
    /// Returned for `Chart.yaml` missing `name`/`version`, or a `values.yaml`
    /// that is not valid YAML.
    #[error("Invalid YAML in '{}': {}", .path.display(), .source)]
    Yaml {
        /// File that failed to parse
        path: PathBuf,
        /// Underlying parse error
        source: serde_yaml::Error,
    },

    /// `values.schema.json` is malformed
    #[error("Invalid JSON in '{}': {}", .path.display(), .source)]
    Json {
        /// File that failed to parse
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },

    /// A values file or schema parsed, but its top level is not a mapping/object
    #[error("Expected a mapping at the top level of '{}'", .path.display())]
    NotAMapping {
        /// Offending file
        path: PathBuf,
    },

    /// Layered values could not be converted into typed chart values
    #[error("Invalid chart values: {reason}")]
    InvalidValues {
        /// Explanation of what is invalid
        reason: String,
    },

    /// A `--set` expression is not of the form `path.to.key=value`
    #[error("Invalid set expression '{expression}': expected key=value")]
    InvalidSetExpression {
        /// The expression as given
        expression: String,
    },
}

/// Errors that can occur when rendering templates through the `helm` binary.
#[derive(Error, Debug)]
pub enum HelmError {
    /// `helm` could not be started (usually not on `PATH`)
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// `helm` ran but exited unsuccessfully
    #[error("helm exited with {status}: {stderr}")]
    CommandFailed {
        /// Exit status of the helm process
        status: ExitStatus,
        /// Captured standard error
        stderr: String,
    },

    /// `helm` succeeded but produced output that could not be interpreted
    #[error("Unexpected helm output: {reason}")]
    InvalidOutput {
        /// Explanation of what was wrong with the output
        reason: String,
    },

    /// A rendered helper document had no string `result` key
    #[error("Helper '{helper}' rendered no result")]
    MissingResult {
        /// Fully qualified helper name (`<namespace>.<helper>`)
        helper: String,
    },

    /// The chart could not be prepared for rendering
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// Temporary files for values or ad-hoc templates could not be written
    #[error("I/O error while preparing helm invocation: {0}")]
    Io(#[from] std::io::Error),
}
