use std::collections::HashMap;
use std::path::PathBuf;

use docvault_config::{CheckerConfig, ConfigSource, checker::CONFIG_PATH_VAR};

const SAMPLE_TOML: &str = r#"
media_root = "/srv/docvault/media"
archive_dir = "/mnt/archive"
thumbnail_extension = "png"
log_filter = "docvault=debug"

[sanity]
max_concurrent_records = 3
ignored_file_patterns = ["*.partial", ".DS_Store"]
"#;

#[test]
fn toml_file_populates_layout_and_sanity_settings() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("checker.toml");
    std::fs::write(&path, SAMPLE_TOML).expect("write config");

    let config = CheckerConfig::load_from_file(&path).expect("load");
    assert_eq!(config.log_filter, "docvault=debug");
    assert_eq!(config.sanity.max_concurrent_records, 3);
    assert_eq!(
        config.sanity.ignored_file_patterns,
        vec!["*.partial".to_string(), ".DS_Store".to_string()]
    );

    let layout = config.layout();
    assert_eq!(
        layout.originals_dir,
        PathBuf::from("/srv/docvault/media/documents/originals")
    );
    assert_eq!(layout.archive_dir, PathBuf::from("/mnt/archive"));
    assert!(
        layout
            .thumbnail_path(&docvault_model_entry(9))
            .ends_with("0000009.png")
    );

    let matcher = config.sanity.ignore_matcher().expect("patterns");
    assert!(matcher.is_ignored("scan.partial"));
    assert!(!matcher.is_ignored("Thumbs.db"));
}

#[test]
fn config_path_variable_resolves_relative_to_working_dir() {
    let tmp = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir(tmp.path().join("conf")).expect("mkdir");
    std::fs::write(
        tmp.path().join("conf/checker.json"),
        r#"{"media_root": "/data/media", "sanity": {"max_concurrent_records": 1}}"#,
    )
    .expect("write config");
    let vars = HashMap::from([(CONFIG_PATH_VAR, "conf/checker.json".to_string())]);

    let (config, source) =
        CheckerConfig::load_with(|key| vars.get(key).cloned(), tmp.path()).expect("load");
    assert_eq!(
        source,
        ConfigSource::EnvPath(tmp.path().join("conf/checker.json"))
    );
    assert_eq!(config.media_root, PathBuf::from("/data/media"));
    assert_eq!(config.sanity.concurrency(), 1);
}

#[test]
fn well_known_file_in_config_dir_is_picked_up() {
    let tmp = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir(tmp.path().join("config")).expect("mkdir");
    let path = tmp.path().join("config/docvault.toml");
    std::fs::write(&path, "media_root = \"/opt/media\"\n").expect("write config");

    let (config, source) = CheckerConfig::load_with(|_| None, tmp.path()).expect("load");
    assert_eq!(source, ConfigSource::File(path));
    assert_eq!(config.media_root, PathBuf::from("/opt/media"));
    assert_eq!(config.thumbnail_extension, "webp");
}

#[test]
fn missing_config_file_is_an_error_with_context() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let err = CheckerConfig::load_from_file(&tmp.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("failed to read checker config"));
}

fn docvault_model_entry(id: i64) -> docvault_model::DocumentEntry {
    docvault_model::DocumentEntry::new(docvault_model::DocumentId(id))
}
