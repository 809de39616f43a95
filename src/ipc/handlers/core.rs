use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::selection::PrunePolicy;
use crate::session::{SessionStore, SqliteSideChannel};
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    match db::open_db(&path) {
        Ok(conn) => {
            // The session side-channel lives in the workspace settings, so
            // the store boots once per workspace open.
            let session = match SessionStore::boot(&SqliteSideChannel::new(&conn)) {
                Ok(s) => s,
                Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
            };
            let prune = match db::settings_get(&conn, "selection.pruneHidden") {
                Ok(v) => {
                    if v.as_deref() == Some("true") {
                        PrunePolicy::PruneHidden
                    } else {
                        PrunePolicy::Retain
                    }
                }
                Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
            };

            state.workspace = Some(path.clone());
            state.db = Some(conn);
            state.session = session;
            state.prune_policy = prune;
            state.reset_selections();
            ok(&req.id, json!({ "workspacePath": path.to_string_lossy() }))
        }
        Err(e) => err(&req.id, "db_open_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
