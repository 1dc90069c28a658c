//! Symbolic: inline symbol suggestions for a host text editor.
//!
//! `SymbolSuggest` is the object a host registers. It owns the loaded
//! settings, the symbol store, and the session controller, and forwards:
//! - editor changes -> detection + matching (`on_editor_change`)
//! - popup rows -> display collaborator (`rows`)
//! - user selection -> single range replace (`select`)
//! - settings-panel edits -> store commands + save (`apply`, `set_*`)
//!
//! Store mutations cancel any active session first, so no candidate slot or
//! store index from a previous evaluation is ever reused after the store
//! changed.

use anyhow::Result;
use core_config::{Config, Settings, TriggerCharUpdate, discover, load_from};
use core_match::Candidate;
use core_render::SuggestionRow;
use core_suggest::{Replacement, SuggestContext, SuggestController};
use core_symbols::{SymbolCommand, SymbolStore};
use core_text::TextEditor;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod logging;

pub use core_config as config;
pub use core_match as matching;
pub use core_render as render;
pub use core_suggest as suggest;
pub use core_symbols as symbols;
pub use core_text as text;

fn context<'a>(store: &'a SymbolStore, settings: &Settings) -> SuggestContext<'a> {
    SuggestContext::new(store.records(), settings.trigger(), settings.match_options())
}

pub struct SymbolSuggest {
    config: Config,
    store: SymbolStore,
    controller: SuggestController,
    settings_path: Option<PathBuf>,
}

impl SymbolSuggest {
    /// In-memory instance; nothing is persisted.
    pub fn new(settings: Settings) -> Self {
        let store = SymbolStore::from_records(settings.symbols.clone());
        Self {
            config: Config::from_settings(settings),
            store,
            controller: SuggestController::new(),
            settings_path: None,
        }
    }

    /// Load settings (merged over defaults) from `path` or the discovered
    /// location; later edits are saved back there.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(discover);
        let config = load_from(Some(path.clone()))?;
        let store = SymbolStore::from_records(config.settings.symbols.clone());
        info!(target: "runtime", path = %path.display(), symbols = store.len(), "suggester_loaded");
        Ok(Self {
            config,
            store,
            controller: SuggestController::new(),
            settings_path: Some(path),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.config.settings
    }

    pub fn store(&self) -> &SymbolStore {
        &self.store
    }

    pub fn controller(&self) -> &SuggestController {
        &self.controller
    }

    pub fn settings_path(&self) -> Option<&Path> {
        self.settings_path.as_deref()
    }

    /// Re-evaluate against the editor's cursor line.
    pub fn on_editor_change<E: TextEditor + ?Sized>(&mut self, editor: &E) -> &[Candidate] {
        let cursor = editor.cursor();
        let line = editor.line(cursor.line).unwrap_or_default();
        let ctx = context(&self.store, &self.config.settings);
        self.controller.refresh(&line, cursor, &ctx)
    }

    pub fn rows(&self) -> Vec<SuggestionRow> {
        self.controller.rows(self.config.settings.highlight)
    }

    pub fn select<E: TextEditor + ?Sized>(
        &mut self,
        editor: &mut E,
        slot: usize,
    ) -> Option<Replacement> {
        self.controller.commit_into(editor, slot)
    }

    pub fn cancel(&mut self) {
        self.controller.cancel();
    }

    /// Apply a settings-panel store edit and persist it.
    ///
    /// A rejected command (`core_symbols::StoreError`) leaves the store
    /// unchanged and is returned for the host to surface as a notice.
    pub fn apply(&mut self, cmd: SymbolCommand) -> Result<()> {
        self.controller.cancel();
        if let Err(e) = self.store.apply(cmd) {
            warn!(target: "symbols.store", error = %e, "command_rejected");
            return Err(e.into());
        }
        self.config.settings.symbols = self.store.records().to_vec();
        self.persist()
    }

    pub fn set_trigger_char(&mut self, value: &str) -> Result<TriggerCharUpdate> {
        self.controller.cancel();
        let update = self.config.settings.set_trigger_char(value);
        self.persist()?;
        Ok(update)
    }

    pub fn set_fuzzy_search(&mut self, on: bool) -> Result<()> {
        self.controller.cancel();
        self.config.settings.fuzzy_search = on;
        self.persist()
    }

    pub fn set_highlight(&mut self, on: bool) -> Result<()> {
        self.controller.cancel();
        self.config.settings.highlight = on;
        self.persist()
    }

    /// Non-empty ids used by more than one symbol.
    pub fn duplicate_ids(&self) -> Vec<String> {
        self.store.duplicate_ids()
    }

    fn persist(&mut self) -> Result<()> {
        match &self.settings_path {
            Some(path) => self.config.save_to(path),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_symbols::SymbolRecord;
    use core_text::{Buffer, Position};
    use pretty_assertions::assert_eq;

    fn suggester() -> SymbolSuggest {
        SymbolSuggest::new(Settings {
            symbols: vec![
                SymbolRecord::new("arrow", "→"),
                SymbolRecord::new("alpha", "α"),
            ],
            ..Settings::default()
        })
    }

    #[test]
    fn editor_change_then_select_inserts_glyph() {
        let mut s = suggester();
        let mut buf = Buffer::from_str("t", "go /arr");
        buf.set_cursor(Position::new(0, 7));
        assert_eq!(s.on_editor_change(&buf).len(), 1);
        assert_eq!(s.rows()[0].display_line(), "arrow →");
        s.select(&mut buf, 0).unwrap();
        assert_eq!(buf.text(), "go →");
        assert!(!s.controller().is_active());
    }

    #[test]
    fn apply_cancels_active_session() {
        let mut s = suggester();
        let mut buf = Buffer::from_str("t", "/a");
        buf.set_cursor(Position::new(0, 2));
        s.on_editor_change(&buf);
        assert!(s.controller().is_active());
        s.apply(SymbolCommand::Remove(0)).unwrap();
        assert!(!s.controller().is_active());
        assert_eq!(s.settings().symbols, vec![SymbolRecord::new("alpha", "α")]);
        assert_eq!(s.select(&mut buf, 0), None);
    }

    #[test]
    fn rejected_command_surfaces_store_error() {
        let mut s = suggester();
        let err = s
            .apply(SymbolCommand::SetId {
                index: 1,
                id: "arrow".into(),
            })
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<core_symbols::StoreError>(),
            Some(core_symbols::StoreError::DuplicateId { existing: 0, .. })
        ));
        assert_eq!(s.store().get(1).unwrap().id, "alpha");
    }

    #[test]
    fn highlight_toggle_changes_rows_not_matches() {
        let mut s = suggester();
        let mut buf = Buffer::from_str("t", "/ar");
        buf.set_cursor(Position::new(0, 3));
        s.on_editor_change(&buf);
        assert!(s.rows()[0].has_highlight());
        s.set_highlight(false).unwrap();
        assert_eq!(s.on_editor_change(&buf).len(), 1);
        assert!(!s.rows()[0].has_highlight());
    }
}
