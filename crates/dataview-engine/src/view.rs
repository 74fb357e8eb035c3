//! The view session object: records + config + live state + presets, with
//! an injected change-listener instead of any global notification hook.

use crate::export::{export_as, ExportFormat};
use crate::pipeline::project;
use crate::presets::PresetStore;
use dataview_core::{
    FilterValue, Record, Result, SavedFilter, SortState, ViewConfig, ViewState,
};

/// Invoked with the new projection after every state or collection change.
/// The presentation layer renders it; the engine exposes no rendering.
pub type ChangeListener = Box<dyn Fn(&[Record]) + Send + Sync>;

pub struct DataView {
    config: ViewConfig,
    records: Vec<Record>,
    state: ViewState,
    presets: PresetStore,
    listener: Option<ChangeListener>,
}

impl DataView {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
            state: ViewState::default(),
            presets: PresetStore::new(),
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: ChangeListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Replace the backing collection. The engine is agnostic to where the
    /// records came from (live API response or static fixture).
    pub fn set_records(&mut self, records: Vec<Record>) {
        self.records = records;
        self.notify();
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.state.search = query.into();
        self.notify();
    }

    /// Set one filter dimension. An inactive value (empty multiselect,
    /// "all" select, fully open bounds) clears the dimension instead.
    pub fn set_filter(&mut self, key: impl Into<String>, value: FilterValue) {
        let key = key.into();
        if value.is_active() {
            self.state.filters.insert(key, value);
        } else {
            self.state.filters.remove(&key);
        }
        self.notify();
    }

    pub fn clear_filter(&mut self, key: &str) {
        self.state.filters.remove(key);
        self.notify();
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.state.sort = sort;
        self.notify();
    }

    /// Reset search, filters and sort to the identity state.
    pub fn clear_all(&mut self) {
        self.state.clear();
        self.notify();
    }

    /// Recompute the projection from the current inputs. Deterministic:
    /// same inputs, same output, same order.
    pub fn projection(&self) -> Vec<Record> {
        project(&self.records, &self.config, &self.state)
    }

    pub fn save_preset(&mut self, name: &str) -> Result<SavedFilter> {
        self.presets.save(name, &self.state)
    }

    pub fn apply_preset(&mut self, id: &str) -> Result<()> {
        self.state = self.presets.load(id)?;
        self.notify();
        Ok(())
    }

    pub fn remove_preset(&mut self, id: &str) {
        self.presets.remove(id);
    }

    pub fn presets(&self) -> &[SavedFilter] {
        self.presets.list()
    }

    /// Serialize the current projection, never the raw collection.
    pub fn export(&self, format: ExportFormat) -> String {
        export_as(&self.projection(), format, &self.config.columns)
    }

    fn notify(&self) {
        if let Some(listener) = &self.listener {
            listener(&self.projection());
        }
    }
}
