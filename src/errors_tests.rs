// Copyright (c) 2026 openvpn-as-chart contributors
// SPDX-License-Identifier: MIT

//! Unit tests for `errors`

#[cfg(test)]
mod tests {
    use crate::errors::{ChartError, HelmError};
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_chart_error_io_display() {
        let err = ChartError::Io {
            path: PathBuf::from("charts/openvpn-as/Chart.yaml"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read 'charts/openvpn-as/Chart.yaml': no such file"
        );
    }

    #[test]
    fn test_chart_error_not_a_mapping_display() {
        let err = ChartError::NotAMapping {
            path: PathBuf::from("values.yaml"),
        };
        assert_eq!(
            err.to_string(),
            "Expected a mapping at the top level of 'values.yaml'"
        );
    }

    #[test]
    fn test_chart_error_yaml_display_names_file() {
        let source = serde_yaml::from_str::<serde_yaml::Value>("a: [").unwrap_err();
        let err = ChartError::Yaml {
            path: PathBuf::from("values.yaml"),
            source,
        };
        assert!(err.to_string().starts_with("Invalid YAML in 'values.yaml': "));
    }

    #[test]
    fn test_chart_error_invalid_values_display() {
        let err = ChartError::InvalidValues {
            reason: "replicaCount must be an integer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid chart values: replicaCount must be an integer"
        );
    }

    #[test]
    fn test_chart_error_invalid_set_expression_display() {
        let err = ChartError::InvalidSetExpression {
            expression: "replicaCount".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid set expression 'replicaCount': expected key=value"
        );
    }

    #[test]
    fn test_helm_error_display() {
        let err = HelmError::Spawn {
            program: "helm".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "Failed to run 'helm': not found");

        let err = HelmError::MissingResult {
            helper: "openvpn-as.full-name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Helper 'openvpn-as.full-name' rendered no result"
        );

        let err = HelmError::InvalidOutput {
            reason: "not yaml".to_string(),
        };
        assert_eq!(err.to_string(), "Unexpected helm output: not yaml");
    }

    #[test]
    fn test_helm_error_wraps_chart_error_transparently() {
        let chart_error = ChartError::InvalidValues {
            reason: "bad".to_string(),
        };
        let expected = chart_error.to_string();

        let err: HelmError = chart_error.into();
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_helm_error_from_io() {
        let err: HelmError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(
            err.to_string(),
            "I/O error while preparing helm invocation: denied"
        );
    }
}
