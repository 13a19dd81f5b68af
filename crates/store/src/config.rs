// Store configuration
// Resolves where a domain's preferences file lives.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Overrides the domain of the standard store.
pub const DOMAIN_ENV: &str = "PREFKIT_DOMAIN";

/// Overrides the directory every domain file is placed in.
pub const DIR_ENV: &str = "PREFKIT_DIR";

const DEFAULT_DOMAIN: &str = "prefkit";
const APP_DIR: &str = "prefkit";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Name of the preference domain; becomes the file stem.
    pub domain: String,

    /// Directory holding domain files. None = `PREFKIT_DIR` or the platform
    /// config dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Explicit store file, bypassing directory and domain resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Persist on every write. When false, call `FileStore::flush`.
    pub autosave: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            directory: None,
            file: None,
            autosave: true,
        }
    }
}

impl StoreConfig {
    /// Config for a named domain with every other field defaulted.
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    /// Config bound to an explicit file.
    pub fn for_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, StoreError> {
        let config: StoreConfig =
            toml::from_str(input).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.file.is_some() {
            return Ok(());
        }
        if self.domain.trim().is_empty() {
            return Err(StoreError::Config("domain must not be empty".to_string()));
        }
        if self.domain.contains(['/', '\\']) || self.domain == "." || self.domain == ".." {
            return Err(StoreError::Config(format!(
                "domain '{}' must be a plain name, not a path",
                self.domain
            )));
        }
        Ok(())
    }

    /// Directory that domain files are placed in.
    pub fn base_dir(&self) -> PathBuf {
        if let Some(dir) = &self.directory {
            return dir.clone();
        }
        if let Some(dir) = env::var_os(DIR_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Resolved store file path.
    pub fn path(&self) -> PathBuf {
        match &self.file {
            Some(file) => file.clone(),
            None => self.base_dir().join(format!("{}.json", self.domain)),
        }
    }
}

/// Domain used when none is configured: `PREFKIT_DOMAIN`, else the running
/// executable's name.
pub fn default_domain() -> String {
    if let Ok(domain) = env::var(DOMAIN_ENV) {
        if !domain.trim().is_empty() {
            return domain;
        }
    }
    env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::file_stem)
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_DOMAIN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::sync::Mutex;

    // Tests that touch the process environment run one at a time.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Sets env vars for the duration of a test and restores them on drop.
    struct EnvGuard {
        saved: Vec<(&'static str, Option<OsString>)>,
    }

    impl EnvGuard {
        fn set(vars: &[(&'static str, Option<&str>)]) -> Self {
            let saved = vars.iter().map(|(name, _)| (*name, env::var_os(name))).collect();
            for (name, value) in vars {
                match value {
                    Some(value) => env::set_var(name, value),
                    None => env::remove_var(name),
                }
            }
            Self { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(value) => env::set_var(name, value),
                    None => env::remove_var(name),
                }
            }
        }
    }

    #[test]
    fn test_from_toml_full() {
        let config = StoreConfig::from_toml(
            r#"
domain = "com.example.app"
directory = "/tmp/prefs"
autosave = false
"#,
        )
        .unwrap();

        assert_eq!(config.domain, "com.example.app");
        assert_eq!(config.directory, Some(PathBuf::from("/tmp/prefs")));
        assert!(!config.autosave);
        assert_eq!(config.path(), PathBuf::from("/tmp/prefs/com.example.app.json"));
    }

    #[test]
    fn test_from_toml_defaults() {
        let config = StoreConfig::from_toml(r#"domain = "editor""#).unwrap();
        assert!(config.autosave);
        assert_eq!(config.file, None);
        assert!(config.path().ends_with("editor.json"));
    }

    #[test]
    fn test_explicit_file_wins() {
        let config = StoreConfig::from_toml(
            r#"
domain = "ignored"
directory = "/tmp/prefs"
file = "/var/app/settings.json"
"#,
        )
        .unwrap();
        assert_eq!(config.path(), PathBuf::from("/var/app/settings.json"));
    }

    #[test]
    fn test_rejects_bad_domains() {
        assert!(matches!(
            StoreConfig::from_toml(r#"domain = """#),
            Err(StoreError::Config(_))
        ));
        assert!(matches!(
            StoreConfig::from_toml(r#"domain = "../escape""#),
            Err(StoreError::Config(_))
        ));
        assert!(StoreConfig::for_domain("..").validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = StoreConfig::from_toml(r#"domian = "typo""#).unwrap_err();
        assert!(err.to_string().starts_with("config error"));
    }

    #[test]
    fn test_for_file_skips_domain_validation() {
        let mut config = StoreConfig::for_file("/tmp/x.json");
        config.domain = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_dir_used_when_no_directory() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = EnvGuard::set(&[(DIR_ENV, Some("/srv/prefs"))]);

        let config = StoreConfig::for_domain("editor");
        assert_eq!(config.path(), PathBuf::from("/srv/prefs/editor.json"));
    }

    #[test]
    fn test_explicit_directory_beats_env_dir() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = EnvGuard::set(&[(DIR_ENV, Some("/srv/prefs"))]);

        let config = StoreConfig::from_toml(
            r#"
domain = "editor"
directory = "/opt/app"
"#,
        )
        .unwrap();
        assert_eq!(config.path(), PathBuf::from("/opt/app/editor.json"));
    }

    #[test]
    fn test_empty_env_dir_falls_back_to_platform_dir() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = EnvGuard::set(&[(DIR_ENV, Some(""))]);

        let expected = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        assert_eq!(StoreConfig::for_domain("editor").base_dir(), expected);
    }

    #[test]
    fn test_env_domain_is_default_domain() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = EnvGuard::set(&[
            (DOMAIN_ENV, Some("com.example.tool")),
            (DIR_ENV, Some("/srv/prefs")),
        ]);

        assert_eq!(default_domain(), "com.example.tool");
        assert_eq!(
            StoreConfig::default().path(),
            PathBuf::from("/srv/prefs/com.example.tool.json")
        );

        // An explicit domain still wins.
        let config = StoreConfig::from_toml(r#"domain = "editor""#).unwrap();
        assert_eq!(config.path(), PathBuf::from("/srv/prefs/editor.json"));
    }

    #[test]
    fn test_blank_env_domain_uses_executable_name() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = EnvGuard::set(&[(DOMAIN_ENV, Some("  "))]);

        let domain = default_domain();
        assert!(!domain.trim().is_empty());
        assert_ne!(domain, "  ");
    }
}
