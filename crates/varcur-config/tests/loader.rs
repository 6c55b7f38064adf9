use std::fs;

use varcur_config::{ConfigError, default_config, load_config, load_config_or_default};

const MINIMAL_TOML: &str = r#"
[[classification.options]]
name = "Class 1"
value = "1"
outdated_after_days = 10

[acmg.codes]
pathogenic = ["PVS", "PS", "PM", "PP"]
benign = ["BP", "BS", "BA"]
"#;

#[test]
fn loads_toml_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, MINIMAL_TOML).expect("write config");

    let config = load_config(&path).expect("load toml");
    assert_eq!(config.classification.options.len(), 1);
    assert_eq!(
        config.classification.option("1").and_then(|o| o.outdated_after_days),
        Some(10)
    );
    // Missing sections fall back to defaults.
    assert!(config.frequencies.groups.is_empty());
    assert!((config.frequencies.thresholds.hi_freq_cutoff - 0.01).abs() < f64::EPSILON);
}

#[test]
fn loads_backend_json_document() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "classification": {"options": [
                {"name": "Class 4", "value": "4", "include_report": true},
                {"name": "Class 5", "value": "5", "include_report": true, "outdated_after_days": 365}
            ]},
            "acmg": {"codes": {"pathogenic": ["PVS", "PS", "PM", "PP"], "benign": ["BP", "BS", "BA"], "other": []}},
            "frequencies": {"groups": {"GNOMAD_EXOMES": ["G"]}, "thresholds": {"hi_freq_cutoff": 0.05, "lo_freq_cutoff": 0.01}},
            "user": {"unused": true}
        }"#,
    )
    .expect("write config");

    let config = load_config(&path).expect("load json");
    let values: Vec<&str> = config.classification.values().collect();
    insta::assert_json_snapshot!(values, @r#"
    [
      "4",
      "5"
    ]
    "#);
    assert_eq!(config.frequencies.groups["GNOMAD_EXOMES"], vec!["G".to_string()]);
}

#[test]
fn rejects_unknown_extension() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.yaml");
    fs::write(&path, MINIMAL_TOML).expect("write config");
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
}

#[test]
fn rejects_duplicate_classification_values() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("dup.toml");
    let content = r#"
[[classification.options]]
name = "Class 1"
value = "1"

[[classification.options]]
name = "Again"
value = "1"

[acmg.codes]
pathogenic = ["PVS", "PS", "PM", "PP"]
benign = ["BP", "BS", "BA"]
"#;
    fs::write(&path, content).expect("write config");
    let err = load_config(&path).unwrap_err();
    assert!(
        matches!(err, ConfigError::DuplicateClassification { ref value } if value == "1"),
        "unexpected error: {err}"
    );
}

#[test]
fn missing_file_reports_path() {
    let err = load_config(std::path::Path::new("/nonexistent/varcur.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/varcur.toml"));
}

#[test]
fn falls_back_to_default_without_path() {
    let config = load_config_or_default(None).expect("default");
    assert_eq!(config, default_config().expect("default"));
}
