use super::*;
use std::io::Write;

#[test]
fn test_empty_document_uses_defaults() {
    let config = CompilerConfig::from_yaml_str("").unwrap();
    assert_eq!(config, CompilerConfig::default());
    assert_eq!(config.vector.default_knn_limit, DEFAULT_KNN_LIMIT);
    assert!(config.document.single_value_as_sum);
    assert_eq!(config.sql.from_alias_prefix, "t");
}

#[test]
fn test_parse_partial_config() {
    let yaml = r#"
vector:
  default_knn_limit: 5000
document:
  single_value_as_sum: false
"#;
    let config = CompilerConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.vector.default_knn_limit, 5000);
    assert!(!config.document.single_value_as_sum);
    assert_eq!(config.sql.from_alias_prefix, "t");
}

#[test]
fn test_unknown_fields_rejected() {
    let result = CompilerConfig::from_yaml_str("vector:\n  k: 3\n");
    assert!(matches!(result, Err(CoreError::YamlParse(_))));
}

#[test]
fn test_zero_knn_limit_rejected() {
    let result = CompilerConfig::from_yaml_str("vector:\n  default_knn_limit: 0\n");
    assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compiler.yml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "sql:\n  from_alias_prefix: sub").unwrap();

    let config = CompilerConfig::load(&path).unwrap();
    assert_eq!(config.sql.from_alias_prefix, "sub");
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = CompilerConfig::load(&dir.path().join("missing.yml"));
    assert!(matches!(result, Err(CoreError::ConfigNotFound { .. })));
}
