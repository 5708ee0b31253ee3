//! Integration tests for config loading across all file formats.

use isoserve::config::model::Config;
use isoserve::config::sources::parse_config_str;
use isoserve::config::validation::validate;

#[cfg(feature = "yaml")]
const YAML: &str = "\
listen_port: 8080
upstream_base_url: http://localhost:5173
proxy_prefix: /build
document_root: public
excluded_proxy_headers:
  - Date
  - Server
mime_overrides:
  wasm: application/wasm
  wgsl: text/wgsl
";

#[cfg(feature = "json")]
const JSON: &str = r#"{
  "listen_port": 8080,
  "upstream_base_url": "http://localhost:5173",
  "proxy_prefix": "/build",
  "document_root": "public",
  "excluded_proxy_headers": ["Date", "Server"],
  "mime_overrides": {"wasm": "application/wasm", "wgsl": "text/wgsl"}
}"#;

#[cfg(feature = "toml")]
const TOML: &str = r#"
listen_port = 8080
upstream_base_url = "http://localhost:5173"
proxy_prefix = "/build"
document_root = "public"
excluded_proxy_headers = ["Date", "Server"]

[mime_overrides]
wasm = "application/wasm"
wgsl = "text/wgsl"
"#;

#[cfg(feature = "yaml")]
#[test]
fn yaml_loads_and_validates() {
    let config = parse_config_str("yaml", YAML, "isoserve.yaml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.listen_port, 8080);
    assert_eq!(config.proxy_prefix, "/build");
    assert_eq!(config.mime_overrides["wgsl"], "text/wgsl");
    // Unset keys keep their defaults.
    assert_eq!(config.upstream_timeout_ms, 30_000);
}

#[cfg(feature = "json")]
#[test]
fn json_loads_and_validates() {
    let config = parse_config_str("json", JSON, "isoserve.json").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.excluded_proxy_headers, ["Date", "Server"]);
}

#[cfg(feature = "toml")]
#[test]
fn toml_loads_and_validates() {
    let config = parse_config_str("toml", TOML, "isoserve.toml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.document_root, std::path::PathBuf::from("public"));
}

#[cfg(all(feature = "yaml", feature = "json", feature = "toml"))]
#[test]
fn all_formats_produce_equivalent_configs() {
    let yaml_config = parse_config_str("yaml", YAML, "yaml").unwrap();
    let json_config = parse_config_str("json", JSON, "json").unwrap();
    let toml_config = parse_config_str("toml", TOML, "toml").unwrap();

    assert_eq!(yaml_config, json_config);
    assert_eq!(yaml_config, toml_config);
}

#[test]
fn unsupported_format_returns_error() {
    let result = parse_config_str("xml", "{}", "test.xml");
    assert!(result.is_err());
}

#[test]
fn invalid_config_fails_validation() {
    let config: Config =
        serde_json::from_str(r#"{"upstream_base_url": "localhost:3001", "proxy_prefix": "dist"}"#)
            .unwrap();
    let errors = validate(&config).unwrap_err();
    assert_eq!(errors.len(), 2);
}

#[cfg(feature = "yaml")]
#[tokio::test]
async fn load_reads_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dev.yaml");
    std::fs::write(&path, YAML).unwrap();

    let config = isoserve::config::load(Some(&path), dir.path()).await.unwrap();
    assert_eq!(config.upstream_base_url, "http://localhost:5173");
}
