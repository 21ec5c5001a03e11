use csproj_fs::{ConfigFormat, ConfigStore, Error, NormalizedPath};
use serde::Deserialize;
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Deserialize, PartialEq)]
struct Marker {
    name: String,
}

#[test]
fn test_load_toml() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("marker.toml");
    fs::write(&file_path, "name = \"Game.Core\"\n").unwrap();

    let marker: Marker = ConfigStore::new()
        .load(&NormalizedPath::new(&file_path))
        .unwrap();
    assert_eq!(marker.name, "Game.Core");
}

#[test]
fn test_yaml_is_not_a_config_format() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("marker.yml");
    fs::write(&file_path, "name: Game.Core\n").unwrap();

    let result: Result<Marker, _> = ConfigStore::new().load(&NormalizedPath::new(&file_path));
    assert!(matches!(result, Err(Error::UnsupportedFormat { extension }) if extension == "yml"));
}

#[test]
fn test_load_as_json_ignores_extension() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("Game.Core.asmdef");
    fs::write(
        &file_path,
        r#"{"name": "Game.Core", "references": [], "autoReferenced": true}"#,
    )
    .unwrap();

    let marker: Marker = ConfigStore::new()
        .load_as(&NormalizedPath::new(&file_path), ConfigFormat::Json)
        .unwrap();
    assert_eq!(marker.name, "Game.Core");
}

#[test]
fn test_load_as_json_accepts_byte_order_mark() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("Game.Core.asmdef");
    fs::write(&file_path, "\u{feff}{\"name\": \"Game.Core\"}").unwrap();

    let marker: Marker = ConfigStore::new()
        .load_as(&NormalizedPath::new(&file_path), ConfigFormat::Json)
        .unwrap();
    assert_eq!(marker.name, "Game.Core");
}

#[test]
fn test_unknown_extension_is_unsupported() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("Game.Core.asmdef");
    fs::write(&file_path, "{}").unwrap();

    let result: Result<Marker, _> = ConfigStore::new().load(&NormalizedPath::new(&file_path));
    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
}

#[test]
fn test_malformed_content_reports_path_and_format() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("Broken.asmdef");
    fs::write(&file_path, "{ \"name\": ").unwrap();

    let err = ConfigStore::new()
        .load_as::<Marker>(&NormalizedPath::new(&file_path), ConfigFormat::Json)
        .unwrap_err();
    match err {
        Error::ConfigParse { path, format, .. } => {
            assert_eq!(path, file_path);
            assert_eq!(format, "JSON");
        }
        other => panic!("expected ConfigParse, got {other:?}"),
    }
}
