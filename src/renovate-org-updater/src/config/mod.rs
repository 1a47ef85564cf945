//! Run configuration.
//!
//! Settings may come from an optional TOML file; command-line options take
//! precedence over the file.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::UpdaterSettings;

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn can_load_settings() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(
            &path,
            r#"
organization = "Acme"
repository = "widgets"
dry-run = true
signing-key = "ABCDEF01"
api-url = "https://github.example.com/api/v3"
git-host = "github.example.com"
"#,
        )
        .unwrap();

        let settings = UpdaterSettings::load(&path).unwrap();

        assert_eq!(settings.organization, "Acme");
        assert_eq!(settings.repository.as_deref(), Some("widgets"));
        assert!(settings.dry_run);
        assert_eq!(settings.signing_key.as_deref(), Some("ABCDEF01"));
        assert_eq!(settings.git_host, "github.example.com");
        assert_eq!(
            settings.parsed_api_url("test").unwrap().unwrap().as_str(),
            "https://github.example.com/api/v3"
        );
    }

    #[test]
    fn empty_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(&path, "").unwrap();

        let settings = UpdaterSettings::load(&path).unwrap();
        assert_eq!(settings, UpdaterSettings::default());
        assert_eq!(settings.organization, "MyOrg");
        assert_eq!(settings.git_host, "github.com");
    }

    #[test]
    fn load_settings_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = UpdaterSettings::load(&temp.path().join("nonexistent.toml"));
        assert!(matches!(result, Err(ConfigError::MissingFile { .. })));
    }

    #[test]
    fn rejects_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(&path, "organisation = \"Acme\"\n").unwrap();

        let result = UpdaterSettings::load(&path);
        assert!(matches!(result, Err(ConfigError::TomlError { .. })));
    }

    #[test]
    fn rejects_empty_organization() {
        let settings = UpdaterSettings {
            organization: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate("test"),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn rejects_non_http_api_url() {
        let settings = UpdaterSettings {
            api_url: Some("ftp://github.example.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate("test"),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
