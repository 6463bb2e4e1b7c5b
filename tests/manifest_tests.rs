use model_staging::modules::manifest::{self, ManifestEntry, ManifestError};
use std::io::Write;

#[test]
fn test_parse_manifest() {
    let input = "de,https://example.com/models/de/\nen,https://example.com/models/en/\n";
    let entries = manifest::parse_manifest_str(input).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "de");
    assert_eq!(entries[0].base_url, "https://example.com/models/de/");
    assert_eq!(entries[1].name, "en");
}

#[test]
fn test_parse_manifest_with_checksums() {
    let sha = "0123456789abcdef".repeat(4);
    let input = format!(
        "de,https://example.com/de/,{}\nen,https://example.com/en/\n",
        sha
    );
    let entries = manifest::parse_manifest_str(&input).unwrap();

    assert_eq!(entries[0].sha256.as_deref(), Some(sha.as_str()));
    assert_eq!(entries[1].sha256, None);
}

#[test]
fn test_duplicate_names_rejected() {
    let input = "de,https://a.example/\n\nde,https://b.example/\n";
    assert!(matches!(
        manifest::parse_manifest_str(input),
        Err(ManifestError::DuplicateName { line: 3, .. })
    ));
}

#[test]
fn test_name_escaping_output_root_rejected() {
    let input = "../outside,https://a.example/\n";
    assert!(matches!(
        manifest::parse_manifest_str(input),
        Err(ManifestError::InvalidName { line: 1, .. })
    ));
}

#[test]
fn test_artifact_url_is_prefix_concatenation() {
    let entry = ManifestEntry::new("de", "https://example.com/models/de/");
    assert_eq!(
        entry.artifact_url("model.onnx"),
        "https://example.com/models/de/model.onnx"
    );

    // The prefix is used verbatim, including one without a trailing slash.
    let entry = ManifestEntry::new("de", "https://example.com/models/de-");
    assert_eq!(
        entry.artifact_url("model.onnx"),
        "https://example.com/models/de-model.onnx"
    );
}

#[tokio::test]
async fn test_load_manifest_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "de,https://example.com/models/de/").unwrap();
    writeln!(file, "en,https://example.com/models/en/").unwrap();

    let entries = manifest::load_manifest(file.path()).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].name, "en");
}

#[tokio::test]
async fn test_load_manifest_missing_file() {
    let result = manifest::load_manifest("does-not-exist.csv").await;
    assert!(matches!(result, Err(ManifestError::Io(_))));
}
