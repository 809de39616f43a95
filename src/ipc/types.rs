use std::collections::HashMap;
use std::path::PathBuf;

use rusqlite::Connection;
use serde::Deserialize;

use crate::selection::{PrunePolicy, SelectionModel};
use crate::session::SessionStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
    pub session: SessionStore,
    pub prune_policy: PrunePolicy,
    selections: HashMap<&'static str, SelectionModel>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            workspace: None,
            db: None,
            session: SessionStore::default(),
            prune_policy: PrunePolicy::Retain,
            selections: HashMap::new(),
        }
    }

    /// Selection set for one rendered list, created on first use with the
    /// workspace's prune policy.
    pub fn selection(&mut self, list: &'static str) -> &mut SelectionModel {
        let policy = self.prune_policy;
        self.selections
            .entry(list)
            .or_insert_with(|| SelectionModel::new(policy))
    }

    /// Selections are scoped to a workspace; drop them when it changes.
    pub fn reset_selections(&mut self) {
        self.selections.clear();
    }
}
