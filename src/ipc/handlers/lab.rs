use crate::catalog::{self, LabTask, TaskStatus};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::listview::{self, FACET_ALL};
use crate::stats;
use serde_json::json;

fn handle_lab_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let tasks = match catalog::load_lab_tasks(conn) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    let tab = req.params.get("tab").and_then(|v| v.as_str()).unwrap_or("all");
    let scope: Box<dyn Fn(&LabTask) -> bool> = match tab {
        "all" => Box::new(|_| true),
        "not-started" => Box::new(|t: &LabTask| t.status == TaskStatus::NotStarted),
        "in-progress" => Box::new(|t: &LabTask| t.status == TaskStatus::InProgress),
        // Submitted and graded work share the completed tab.
        "completed" => Box::new(|t: &LabTask| t.status.is_completed()),
        other => {
            return err(
                &req.id,
                "bad_params",
                format!("unknown tab: {other}"),
                None,
            )
        }
    };
    let query = req.params.get("query").and_then(|v| v.as_str()).unwrap_or("");
    let category = req
        .params
        .get("category")
        .and_then(|v| v.as_str())
        .unwrap_or(FACET_ALL);

    let visible = listview::render(&tasks, scope, query, &[("category", category)]);
    ok(
        &req.id,
        json!({
            "tasks": visible,
            "total": visible.len()
        }),
    )
}

fn handle_lab_stats(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let tasks = match catalog::load_lab_tasks(conn) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    // Average over tasks that actually have a score; zero when none do.
    let average_score = stats::average(&tasks, |t| t.score).round() as i64;

    ok(
        &req.id,
        json!({
            "total": tasks.len(),
            "inProgress": stats::count_where(&tasks, |t| t.status == TaskStatus::InProgress),
            "completed": stats::count_where(&tasks, |t| t.status.is_completed()),
            "averageScore": average_score,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "lab.list" => Some(handle_lab_list(state, req)),
        "lab.stats" => Some(handle_lab_stats(state, req)),
        _ => None,
    }
}
