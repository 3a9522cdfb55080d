// Copyright (c) 2026 openvpn-as-chart contributors
// SPDX-License-Identifier: MIT

//! Unit tests for `names`

#[cfg(test)]
mod tests {
    use crate::chart::ChartMetadata;
    use crate::labels::{HELM_CHART, K8S_INSTANCE, K8S_MANAGED_BY, K8S_NAME, K8S_VERSION};
    use crate::names::{
        resolve_chart_label, resolve_full_name, resolve_labels, resolve_name,
        resolve_selector_labels, resolve_service_account_name, truncate_name, ReleaseContext,
        ResolvedNames,
    };
    use crate::values::ChartValues;

    const CHART_NAME: &str = "openvpn-as";
    const CHART_VERSION: &str = "0.3.1";
    const APP_VERSION: &str = "2.12.1-bc070def-Ubuntu22";
    const RELEASE_NAME: &str = "release-name";

    fn create_test_context(release_name: &str) -> ReleaseContext {
        ReleaseContext::new(
            release_name,
            ChartMetadata::new(CHART_NAME, CHART_VERSION).with_app_version(APP_VERSION),
        )
    }

    // ------------------------------------------------------------------------
    // truncate_name
    // ------------------------------------------------------------------------

    #[test]
    fn test_truncate_name_keeps_short_values() {
        assert_eq!(truncate_name("short"), "short");
        assert_eq!(truncate_name(""), "");
    }

    #[test]
    fn test_truncate_name_strips_every_trailing_dash() {
        let value = format!("{}----x", "a".repeat(60));
        assert_eq!(truncate_name(&value), "a".repeat(60));
        assert_eq!(truncate_name("abc---"), "abc");
    }

    #[test]
    fn test_truncate_name_counts_characters_not_bytes() {
        let value = "é".repeat(70);
        let truncated = truncate_name(&value);
        assert_eq!(truncated.chars().count(), 63);
    }

    // ------------------------------------------------------------------------
    // resolve_name
    // ------------------------------------------------------------------------

    #[test]
    fn test_name_comes_from_chart_name_by_default() {
        assert_eq!(resolve_name(CHART_NAME, None), CHART_NAME);
        assert_eq!(resolve_name("x", None), "x");
    }

    #[test]
    fn test_name_can_be_customized_with_name_override() {
        assert_eq!(resolve_name(CHART_NAME, Some("name-override")), "name-override");
    }

    #[test]
    fn test_name_treats_empty_override_as_absent() {
        assert_eq!(resolve_name(CHART_NAME, Some("")), CHART_NAME);
    }

    #[test]
    fn test_name_truncates_result_to_63_characters() {
        let chars = "abcdefghi";
        let expected = chars.repeat(7);
        let name_override = format!("{expected}{chars}");

        assert_eq!(resolve_name(CHART_NAME, Some(&name_override)), expected);
        assert_eq!(
            resolve_name("x", Some(&"a".repeat(70))),
            "a".repeat(63),
            "Long overrides are clamped to 63 characters"
        );
    }

    #[test]
    fn test_name_removes_leftover_dash() {
        let expected = format!("{}ab", "abcdefghij".repeat(6));
        let name_override = format!("{expected}-c");
        assert_eq!(name_override.len(), 64);

        assert_eq!(resolve_name(CHART_NAME, Some(&name_override)), expected);
    }

    #[test]
    fn test_name_never_exceeds_limit_or_ends_with_dash() {
        for length in 0..80 {
            for tail in ["", "-", "--", "-a"] {
                let name_override = format!("{}{tail}", "a".repeat(length));
                let name = resolve_name(CHART_NAME, Some(&name_override));
                assert!(name.chars().count() <= 63, "too long: {name}");
                assert!(!name.ends_with('-'), "trailing dash: {name}");
            }
        }
    }

    // ------------------------------------------------------------------------
    // resolve_full_name
    // ------------------------------------------------------------------------

    #[test]
    fn test_full_name_comes_from_release_name_and_chart_name_by_default() {
        assert_eq!(
            resolve_full_name(CHART_NAME, RELEASE_NAME, None, None),
            format!("{RELEASE_NAME}-{CHART_NAME}")
        );
        assert_eq!(resolve_full_name("chart", "rel", None, None), "rel-chart");
    }

    #[test]
    fn test_full_name_uses_name_override_instead_of_chart_name() {
        assert_eq!(
            resolve_full_name(CHART_NAME, RELEASE_NAME, Some("name-override"), None),
            format!("{RELEASE_NAME}-name-override")
        );
    }

    #[test]
    fn test_full_name_is_release_name_if_release_name_includes_chart_name() {
        let release_name = format!("{RELEASE_NAME}-{CHART_NAME}");
        assert_eq!(
            resolve_full_name(CHART_NAME, &release_name, None, None),
            release_name
        );
        assert_eq!(
            resolve_full_name("chart", "rel-chart", None, None),
            "rel-chart"
        );
    }

    #[test]
    fn test_full_name_is_release_name_if_release_name_includes_name_override() {
        let release_name = format!("{RELEASE_NAME}-name-override");
        assert_eq!(
            resolve_full_name(CHART_NAME, &release_name, Some("name-override"), None),
            release_name
        );
    }

    #[test]
    fn test_full_name_contains_check_is_not_anchored() {
        // "chart" sits in the middle of the release name, not at a segment boundary
        assert_eq!(
            resolve_full_name("chart", "my-chartered-release", None, None),
            "my-chartered-release"
        );
    }

    #[test]
    fn test_full_name_returns_containing_release_name_without_truncation() {
        let release_name = format!("{}-{CHART_NAME}-", "r".repeat(70));
        assert_eq!(
            resolve_full_name(CHART_NAME, &release_name, None, None),
            release_name,
            "A release name containing the base is used verbatim"
        );
    }

    #[test]
    fn test_full_name_truncates_length_to_63_characters_when_given_name_override() {
        let truncated_name_override = "a".repeat(62 - RELEASE_NAME.len());
        let name_override = format!("{truncated_name_override}abc");

        let full_name = resolve_full_name(CHART_NAME, RELEASE_NAME, Some(&name_override), None);

        assert_eq!(full_name.len(), 63);
        assert_eq!(full_name, format!("{RELEASE_NAME}-{truncated_name_override}"));
    }

    #[test]
    fn test_full_name_removes_trailing_dash_when_given_name_override() {
        let truncated_name_override = "a".repeat(61 - RELEASE_NAME.len());
        let name_override = format!("{truncated_name_override}-abc");

        let full_name = resolve_full_name(CHART_NAME, RELEASE_NAME, Some(&name_override), None);

        assert_eq!(full_name.len(), 62);
        assert_eq!(full_name, format!("{RELEASE_NAME}-{truncated_name_override}"));
    }

    #[test]
    fn test_full_name_truncates_length_to_63_characters_when_given_full_name_override() {
        let truncated = "a".repeat(63);
        let full_name_override = format!("{truncated}abc");

        let full_name = resolve_full_name(CHART_NAME, RELEASE_NAME, None, Some(&full_name_override));

        assert_eq!(full_name.len(), 63);
        assert_eq!(full_name, truncated);
    }

    #[test]
    fn test_full_name_removes_trailing_dash_when_given_full_name_override() {
        let truncated = "a".repeat(62);
        let full_name_override = format!("{truncated}-abc");

        assert_eq!(
            resolve_full_name(CHART_NAME, RELEASE_NAME, None, Some(&full_name_override)),
            truncated
        );
    }

    #[test]
    fn test_full_name_override_wins_over_name_override_and_release_name() {
        assert_eq!(
            resolve_full_name(
                CHART_NAME,
                "release-openvpn-as",
                Some("name-override"),
                Some("full-name-override")
            ),
            "full-name-override"
        );
    }

    #[test]
    fn test_full_name_treats_empty_overrides_as_absent() {
        assert_eq!(
            resolve_full_name(CHART_NAME, RELEASE_NAME, Some(""), Some("")),
            format!("{RELEASE_NAME}-{CHART_NAME}")
        );
    }

    #[test]
    fn test_full_name_never_exceeds_limit_or_ends_with_dash() {
        for length in 1..80 {
            let release_name = format!("{}-", "r".repeat(length));
            let full_name = resolve_full_name(CHART_NAME, &release_name, None, None);
            assert!(full_name.chars().count() <= 63, "too long: {full_name}");
            assert!(!full_name.ends_with('-'), "trailing dash: {full_name}");
        }
    }

    // ------------------------------------------------------------------------
    // chart label and labels
    // ------------------------------------------------------------------------

    #[test]
    fn test_chart_label_combines_chart_name_and_chart_version() {
        assert_eq!(
            resolve_chart_label(CHART_NAME, CHART_VERSION),
            format!("{CHART_NAME}-{CHART_VERSION}")
        );
    }

    #[test]
    fn test_chart_label_replaces_build_metadata_separator() {
        assert_eq!(
            resolve_chart_label(CHART_NAME, "1.0.0+build.5"),
            "openvpn-as-1.0.0_build.5"
        );
    }

    #[test]
    fn test_labels_includes_expected_default_labels() {
        let labels = resolve_labels(CHART_NAME, CHART_VERSION, APP_VERSION, RELEASE_NAME, None);

        assert_eq!(labels.len(), 5);
        assert_eq!(labels.get(K8S_INSTANCE).unwrap(), RELEASE_NAME);
        assert_eq!(labels.get(K8S_MANAGED_BY).unwrap(), "Helm");
        assert_eq!(labels.get(K8S_NAME).unwrap(), CHART_NAME);
        assert_eq!(labels.get(K8S_VERSION).unwrap(), APP_VERSION);
        assert_eq!(
            labels.get(HELM_CHART).unwrap(),
            &resolve_chart_label(CHART_NAME, CHART_VERSION)
        );
    }

    #[test]
    fn test_labels_name_follows_name_override() {
        let labels = resolve_labels(
            CHART_NAME,
            CHART_VERSION,
            APP_VERSION,
            RELEASE_NAME,
            Some("name-override"),
        );
        assert_eq!(labels.get(K8S_NAME).unwrap(), "name-override");
    }

    #[test]
    fn test_selector_labels_includes_expected_labels() {
        let selector_labels = resolve_selector_labels(CHART_NAME, RELEASE_NAME, None);

        assert_eq!(selector_labels.len(), 2);
        assert_eq!(selector_labels.get(K8S_INSTANCE).unwrap(), RELEASE_NAME);
        assert_eq!(
            selector_labels.get(K8S_NAME).unwrap(),
            &resolve_name(CHART_NAME, None)
        );
    }

    #[test]
    fn test_selector_labels_are_a_subset_of_labels() {
        for name_override in [None, Some("name-override")] {
            let labels =
                resolve_labels(CHART_NAME, CHART_VERSION, APP_VERSION, RELEASE_NAME, name_override);
            let selector_labels = resolve_selector_labels(CHART_NAME, RELEASE_NAME, name_override);

            for (key, value) in &selector_labels {
                assert_eq!(labels.get(key), Some(value), "selector label {key} differs");
            }
        }
    }

    // ------------------------------------------------------------------------
    // resolve_service_account_name
    // ------------------------------------------------------------------------

    #[test]
    fn test_service_account_name_is_default_when_not_created_and_no_name_given() {
        assert_eq!(resolve_service_account_name("f", false, None), "default");
        assert_eq!(resolve_service_account_name("f", false, Some("")), "default");
    }

    #[test]
    fn test_service_account_name_is_given_name_when_not_created() {
        assert_eq!(
            resolve_service_account_name("f", false, Some("service-account-name")),
            "service-account-name"
        );
    }

    #[test]
    fn test_service_account_name_is_full_name_when_created_and_no_name_given() {
        assert_eq!(resolve_service_account_name("f", true, None), "f");
    }

    #[test]
    fn test_service_account_name_is_given_name_when_created() {
        assert_eq!(
            resolve_service_account_name("f", true, Some("service-account-name")),
            "service-account-name"
        );
    }

    // ------------------------------------------------------------------------
    // ResolvedNames
    // ------------------------------------------------------------------------

    #[test]
    fn test_resolved_names_with_default_values() {
        let ctx = create_test_context(RELEASE_NAME);
        let names = ResolvedNames::resolve(&ctx, &ChartValues::default());

        assert_eq!(names.name, CHART_NAME);
        assert_eq!(names.full_name, format!("{RELEASE_NAME}-{CHART_NAME}"));
        assert_eq!(names.chart, format!("{CHART_NAME}-{CHART_VERSION}"));
        assert_eq!(names.labels.len(), 5);
        assert_eq!(names.selector_labels.len(), 2);
        assert_eq!(names.service_account_name, names.full_name);
    }

    #[test]
    fn test_resolved_names_follow_overrides() {
        let ctx = create_test_context(RELEASE_NAME);
        let mut values = ChartValues::default();
        values.name_override = Some("vpn".to_string());
        values.full_name_override = Some("corporate-vpn".to_string());
        values.service_account.create = false;

        let names = ResolvedNames::resolve(&ctx, &values);

        assert_eq!(names.name, "vpn");
        assert_eq!(names.full_name, "corporate-vpn");
        assert_eq!(names.labels.get(K8S_NAME).unwrap(), "vpn");
        assert_eq!(names.service_account_name, "default");
    }

    #[test]
    fn test_resolved_names_version_label_is_empty_without_app_version() {
        let ctx = ReleaseContext::new(RELEASE_NAME, ChartMetadata::new(CHART_NAME, CHART_VERSION));
        let names = ResolvedNames::resolve(&ctx, &ChartValues::default());

        assert_eq!(names.labels.get(K8S_VERSION).unwrap(), "");
    }
}
