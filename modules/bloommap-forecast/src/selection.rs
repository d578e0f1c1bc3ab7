use bloommap_common::{PredictionKey, PredictionRecord};

use crate::store::PredictionStore;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Detail(PredictionKey),
}

/// Single-slot selection for one page view. Holds the key, not the record,
/// so the detail panel always reads what the store has.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any current selection in one step.
    pub fn select(&mut self, key: PredictionKey) {
        self.state = SelectionState::Detail(key);
    }

    pub fn dismiss(&mut self) {
        self.state = SelectionState::Idle;
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, SelectionState::Idle)
    }

    pub fn selected_key(&self) -> Option<&PredictionKey> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Detail(key) => Some(key),
        }
    }

    /// Resolve against the store. A key that no longer matches a record
    /// yields `None`.
    pub fn resolve<'a>(&self, store: &'a PredictionStore) -> Option<&'a PredictionRecord> {
        self.selected_key().and_then(|key| store.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloommap_common::Species;

    #[test]
    fn starts_idle() {
        assert!(SelectionController::new().is_idle());
    }

    #[test]
    fn dismiss_on_idle_is_noop() {
        let mut controller = SelectionController::new();
        controller.dismiss();
        assert_eq!(controller.state(), &SelectionState::Idle);
    }

    #[test]
    fn select_replaces_without_passing_through_idle() {
        let mut controller = SelectionController::new();
        let a = PredictionKey::new("A", Species::Cherry);
        let b = PredictionKey::new("B", Species::Cherry);
        controller.select(a);
        controller.select(b.clone());
        assert_eq!(controller.state(), &SelectionState::Detail(b));
    }

    #[test]
    fn dismiss_returns_to_idle() {
        let mut controller = SelectionController::new();
        controller.select(PredictionKey::new("A", Species::Azalea));
        controller.dismiss();
        assert!(controller.is_idle());
        assert!(controller.selected_key().is_none());
    }

    #[test]
    fn unknown_key_resolves_to_none() {
        let store = PredictionStore::default();
        let mut controller = SelectionController::new();
        controller.select(PredictionKey::new("missing", Species::Cherry));
        assert!(controller.resolve(&store).is_none());
    }
}
