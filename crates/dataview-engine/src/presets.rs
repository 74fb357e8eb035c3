//! Saved filter presets: named snapshots of the live state triple.

use dataview_core::{Result, SavedFilter, ViewError, ViewState};

/// In-memory preset list. Lives as long as the enclosing view session; the
/// engine makes no persistence guarantee beyond that.
#[derive(Debug, Default)]
pub struct PresetStore {
    presets: Vec<SavedFilter>,
}

impl PresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the given state under a name. The name must be non-empty
    /// after trimming.
    pub fn save(&mut self, name: &str, state: &ViewState) -> Result<SavedFilter> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ViewError::Validation("preset name must not be empty".into()));
        }
        let preset = SavedFilter::new(name.to_string(), state.clone());
        tracing::debug!(id = %preset.id, name, "saved filter preset");
        self.presets.push(preset.clone());
        Ok(preset)
    }

    /// Return the stored state for the caller to apply. Loading does not
    /// re-run the pipeline; the caller re-invokes `project`.
    pub fn load(&self, id: &str) -> Result<ViewState> {
        self.presets
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.state.clone())
            .ok_or(ViewError::PresetNotFound)
    }

    /// Idempotent: removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &str) {
        self.presets.retain(|p| p.id != id);
    }

    pub fn list(&self) -> &[SavedFilter] {
        &self.presets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataview_core::{FilterValue, SortDirection, SortState, ViewError};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn sample_state() -> ViewState {
        ViewState {
            search: "whey".into(),
            filters: BTreeMap::from([("category".to_string(), FilterValue::One(json!("protein")))]),
            sort: SortState::by("price", SortDirection::Desc),
        }
    }

    #[test]
    fn save_then_load_round_trips_state() {
        let mut store = PresetStore::new();
        let state = sample_state();
        let preset = store.save("restock check", &state).unwrap();
        assert_eq!(preset.name, "restock check");
        assert_eq!(store.load(&preset.id).unwrap(), state);
    }

    #[test]
    fn save_rejects_empty_name() {
        let mut store = PresetStore::new();
        assert!(matches!(
            store.save("", &ViewState::default()),
            Err(ViewError::Validation(_))
        ));
        assert!(matches!(
            store.save("   ", &ViewState::default()),
            Err(ViewError::Validation(_))
        ));
        assert!(store.list().is_empty());
    }

    #[test]
    fn save_trims_name() {
        let mut store = PresetStore::new();
        let preset = store.save("  vip customers  ", &ViewState::default()).unwrap();
        assert_eq!(preset.name, "vip customers");
    }

    #[test]
    fn ids_are_unique_per_save() {
        let mut store = PresetStore::new();
        let a = store.save("a", &ViewState::default()).unwrap();
        let b = store.save("a", &ViewState::default()).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn load_unknown_id_is_not_found() {
        let store = PresetStore::new();
        assert!(matches!(
            store.load("01ARZ3NDEKTSV4RRFFQ69G5FAV"),
            Err(ViewError::PresetNotFound)
        ));
    }

    #[test]
    fn remove_is_idempotent_and_load_after_remove_fails() {
        let mut store = PresetStore::new();
        let preset = store.save("temp", &sample_state()).unwrap();
        store.remove(&preset.id);
        assert!(matches!(
            store.load(&preset.id),
            Err(ViewError::PresetNotFound)
        ));
        // removing again is a no-op, not an error
        store.remove(&preset.id);
        store.remove("unknown");
    }
}
