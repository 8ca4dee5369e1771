//! Default configuration values

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "keepachange.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "keepachange.toml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_YAML,
        DEFAULT_CONFIG_TOML,
        ".keepachange.yaml",
        ".keepachange.toml",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# keepachange configuration

changelog:
  file: CHANGELOG.md
  fragments: changelogs/unreleased
  # version_url_pattern: "https://example.com/releases/{}"
"#;
