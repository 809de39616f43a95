use std::collections::BTreeSet;

/// What happens to selected ids that fall out of the visible list when the
/// filters change. `Retain` matches the observed dashboard behavior; the
/// pruning variant is opt-in via the `selection.pruneHidden` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrunePolicy {
    Retain,
    PruneHidden,
}

/// Set of chosen entity ids within one rendered list. Holds ids only; it
/// never owns the entities themselves.
#[derive(Debug)]
pub struct SelectionModel {
    policy: PrunePolicy,
    ids: BTreeSet<String>,
}

impl SelectionModel {
    pub fn new(policy: PrunePolicy) -> Self {
        Self {
            policy,
            ids: BTreeSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    /// Add the id if absent, remove it if present. Returns whether the id is
    /// selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
            return true;
        }
        false
    }

    /// Single-press select-all: if the selection already equals `visible` as
    /// a set, clear it; otherwise replace it with all of `visible`. Calling
    /// this twice restores the prior state.
    pub fn toggle_all<I, S>(&mut self, visible: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let visible: BTreeSet<String> =
            visible.into_iter().map(|s| s.as_ref().to_string()).collect();
        if self.ids == visible {
            self.ids.clear();
        } else {
            self.ids = visible;
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Apply the configured prune policy after a list re-render.
    pub fn sync_visible<S: AsRef<str>>(&mut self, visible: &[S]) {
        if self.policy == PrunePolicy::Retain {
            return;
        }
        let visible: BTreeSet<&str> = visible.iter().map(|s| s.as_ref()).collect();
        self.ids.retain(|id| visible.contains(id.as_str()));
    }

    /// Take the selection for a batch action. Batch actions require a
    /// non-empty selection; `None` signals the precondition failure. The
    /// selection is cleared once taken.
    pub fn drain_for_batch(&mut self) -> Option<Vec<String>> {
        if self.ids.is_empty() {
            return None;
        }
        let taken = self.ids.iter().cloned().collect();
        self.ids.clear();
        Some(taken)
    }
}
