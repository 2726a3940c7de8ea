//! Integration tests for the sample config fixture.

use std::fs;
use std::path::Path;

/// Read the sample config file content.
fn read_sample_config() -> String {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    fs::read_to_string(config_path).expect("Failed to read sample config file")
}

#[test]
fn sample_config_file_exists() {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    assert!(config_path.exists(), "Sample config file should exist");
}

#[test]
fn sample_config_is_valid_toml() {
    let config_content = read_sample_config();
    let result: Result<toml::Value, _> = toml::from_str(&config_content);
    assert!(result.is_ok(), "Sample config should be valid TOML: {:?}", result.err());
}

#[test]
fn nyaasort_section_has_expected_structure() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");

    let section = value.get("nyaasort").expect("should have nyaasort section");

    for key in [
        "directory",
        "sorted_directory",
        "extensions",
        "dryrun",
        "overwrite",
        "verbose",
        "debug",
        "quiet",
    ] {
        assert!(section.get(key).is_some(), "nyaasort section should have '{key}'");
    }
}

#[test]
fn sample_extensions_are_sortable_video_types() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");

    let extensions = value
        .get("nyaasort")
        .and_then(|section| section.get("extensions"))
        .and_then(toml::Value::as_array)
        .expect("should have extensions array");

    for extension in extensions {
        let extension = extension.as_str().expect("extension should be a string");
        let mime = nyaa_sort::sort::guess_mime_type(&format!("episode.{extension}"));
        assert!(
            mime.is_some_and(|mime| mime.starts_with("video/")),
            "{extension} should be a video type"
        );
    }
}
