//! Settings loading, defaults, and persistence.
//!
//! Scope: parse `symbolic.toml` (or an override path provided by the host)
//! into `Settings`. Every field carries a serde default so a partial file is
//! merged over `Settings::default()`. Unknown fields are ignored (TOML
//! deserialization tolerance) to allow forward evolution without warnings.
//!
//! The suggestion core only reads settings. Saving happens when the host
//! applies a user-driven change, never as a side effect of matching.

use anyhow::{Context as _, Result};
use core_match::{MatchMode, MatchOptions};
use core_symbols::SymbolRecord;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

pub const CONFIG_FILE_NAME: &str = "symbolic.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "Settings::default_trigger_char")]
    pub trigger_char: String,
    #[serde(default = "Settings::default_fuzzy_search")]
    pub fuzzy_search: bool,
    #[serde(default = "Settings::default_highlight")]
    pub highlight: bool,
    #[serde(default)]
    pub symbols: Vec<SymbolRecord>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trigger_char: Self::default_trigger_char(),
            fuzzy_search: Self::default_fuzzy_search(),
            highlight: Self::default_highlight(),
            symbols: Vec::new(),
        }
    }
}

/// Result of editing the trigger character from a settings surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerCharUpdate {
    Accepted,
    /// Input had more than one character; only the first was kept.
    Truncated,
}

impl Settings {
    fn default_trigger_char() -> String {
        "/".to_string()
    }
    const fn default_fuzzy_search() -> bool {
        true
    }
    const fn default_highlight() -> bool {
        true
    }

    /// The configured trigger, only when it is exactly one character.
    pub fn trigger(&self) -> Option<char> {
        let mut chars = self.trigger_char.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    pub fn set_trigger_char(&mut self, value: &str) -> TriggerCharUpdate {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(first), Some(_)) => {
                warn!(target: "config", given_len = value.chars().count(), "trigger_char_truncated");
                self.trigger_char = first.to_string();
                TriggerCharUpdate::Truncated
            }
            _ => {
                self.trigger_char = value.to_string();
                TriggerCharUpdate::Accepted
            }
        }
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            mode: if self.fuzzy_search {
                MatchMode::Fuzzy
            } else {
                MatchMode::Containment
            },
            highlight: self.highlight,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub settings: Settings,  // parsed (or default) data
    /// `raw` failed to parse; `settings` are defaults, not the file's content.
    pub parse_failed: bool,
}

/// Suffix appended to a config file preserved before overwriting it.
pub const BACKUP_SUFFIX: &str = "bak";

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("symbolic").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        debug!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<Settings>(&content) {
        Ok(settings) => {
            info!(
                target: "config",
                path = %path.display(),
                symbols = settings.symbols.len(),
                fuzzy_search = settings.fuzzy_search,
                highlight = settings.highlight,
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                settings,
                parse_failed: false,
            })
        }
        Err(e) => {
            // On parse error fall back to defaults rather than failing the host.
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config {
                raw: Some(content),
                settings: Settings::default(),
                parse_failed: true,
            })
        }
    }
}

impl Config {
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            raw: None,
            settings,
            parse_failed: false,
        }
    }

    /// Path the unparseable original is copied to before the first save.
    pub fn backup_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Serialize current settings to `path`, creating parent directories.
    ///
    /// When the loaded file failed to parse, its original text is written to
    /// `backup_path(path)` first so the user's content survives the save.
    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(&self.settings).context("serializing settings to TOML")?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config dir {}", parent.display()))?;
        }
        if self.parse_failed
            && let Some(original) = &self.raw
        {
            let backup = Self::backup_path(path);
            fs::write(&backup, original)
                .with_context(|| format!("backing up unparseable config to {}", backup.display()))?;
            warn!(target: "config", path = %path.display(), backup = %backup.display(), "config_backed_up_before_overwrite");
        }
        fs::write(path, &content).with_context(|| format!("writing {}", path.display()))?;
        self.parse_failed = false;
        debug!(target: "config", path = %path.display(), symbols = self.settings.symbols.len(), "config_saved");
        self.raw = Some(content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.settings, Settings::default());
        assert_eq!(cfg.settings.trigger(), Some('/'));
        assert!(cfg.settings.fuzzy_search);
        assert!(cfg.settings.highlight);
        assert!(cfg.settings.symbols.is_empty());
    }

    #[test]
    fn partial_file_merges_over_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "highlight = false\n[[symbols]]\nid = \"arrow\"\nglyph = \"→\"\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.settings.trigger_char, "/");
        assert!(cfg.settings.fuzzy_search);
        assert!(!cfg.settings.highlight);
        assert_eq!(
            cfg.settings.symbols,
            vec![SymbolRecord::new("arrow", "→")]
        );
    }

    #[test]
    fn parse_error_falls_back_and_logs_warning() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "trigger_char = [not toml").unwrap();
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let cfg = with_default(subscriber, || {
            load_from(Some(tmp.path().to_path_buf())).unwrap()
        });

        assert_eq!(cfg.settings, Settings::default());
        assert!(cfg.parse_failed);
        assert_eq!(cfg.raw.as_deref(), Some("trigger_char = [not toml"));
        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_parse_failed"));
    }

    #[test]
    fn save_then_load_preserves_order_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut cfg = Config::from_settings(Settings {
            trigger_char: ";".into(),
            fuzzy_search: false,
            highlight: true,
            symbols: vec![
                SymbolRecord::new("b", "β"),
                SymbolRecord::new("a", "α"),
            ],
        });
        cfg.save_to(&path).unwrap();
        assert!(cfg.raw.is_some());
        let loaded = load_from(Some(path)).unwrap();
        assert_eq!(loaded.settings, cfg.settings);
    }

    #[test]
    fn save_after_parse_failure_backs_up_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let broken = "highlight = flase\n[[symbols]]\nid = \"a\"\nglyph = \"x\"\n";
        std::fs::write(&path, broken).unwrap();
        let mut cfg = load_from(Some(path.clone())).unwrap();
        assert!(cfg.parse_failed);

        cfg.save_to(&path).unwrap();
        let backup = Config::backup_path(&path);
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), broken);
        assert!(!cfg.parse_failed);

        // A second save must not clobber the backup with already-valid content.
        cfg.settings.highlight = false;
        cfg.save_to(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), broken);
    }

    #[test]
    fn trigger_fails_closed_unless_single_char() {
        let mut s = Settings::default();
        s.trigger_char = String::new();
        assert_eq!(s.trigger(), None);
        s.trigger_char = "ab".into();
        assert_eq!(s.trigger(), None);
        s.trigger_char = "→".into();
        assert_eq!(s.trigger(), Some('→'));
    }

    #[test]
    fn set_trigger_char_truncates_multi_char_input() {
        let mut s = Settings::default();
        assert_eq!(s.set_trigger_char("::"), TriggerCharUpdate::Truncated);
        assert_eq!(s.trigger_char, ":");
        assert_eq!(s.set_trigger_char(""), TriggerCharUpdate::Accepted);
        assert_eq!(s.trigger(), None);
        assert_eq!(s.set_trigger_char("@"), TriggerCharUpdate::Accepted);
        assert_eq!(s.trigger(), Some('@'));
    }

    #[test]
    fn match_options_follow_flags() {
        let mut s = Settings::default();
        assert_eq!(
            s.match_options(),
            MatchOptions {
                mode: MatchMode::Fuzzy,
                highlight: true
            }
        );
        s.fuzzy_search = false;
        s.highlight = false;
        assert_eq!(
            s.match_options(),
            MatchOptions {
                mode: MatchMode::Containment,
                highlight: false
            }
        );
    }
}
