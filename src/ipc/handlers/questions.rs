use crate::catalog::{self, Question};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::listview::{self, FACET_ALL};
use crate::stats;
use serde_json::json;
use std::collections::HashSet;

/// The question bank is the one selectable list.
const LIST: &str = "questionBank";

fn load(state: &AppState, req: &Request) -> Result<Vec<Question>, serde_json::Value> {
    let Some(conn) = state.db.as_ref() else {
        return Err(err(&req.id, "no_workspace", "select a workspace first", None));
    };
    catalog::load_questions(conn).map_err(|e| err(&req.id, "db_query_failed", e.to_string(), None))
}

fn facet_param<'r>(req: &'r Request, name: &str) -> &'r str {
    req.params
        .get(name)
        .and_then(|v| v.as_str())
        .unwrap_or(FACET_ALL)
}

fn handle_questions_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let questions = match load(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let query = req.params.get("query").and_then(|v| v.as_str()).unwrap_or("");
    let facets = [
        ("category", facet_param(req, "category")),
        ("difficulty", facet_param(req, "difficulty")),
        ("type", facet_param(req, "type")),
    ];

    let visible = listview::render(&questions, |_| true, query, &facets);
    let visible_ids: Vec<&str> = visible.iter().map(|q| q.id.as_str()).collect();

    let selection = state.selection(LIST);
    selection.sync_visible(&visible_ids);

    let items: Vec<serde_json::Value> = visible
        .iter()
        .map(|q| {
            let mut v = serde_json::to_value(q).unwrap_or_else(|_| json!({}));
            v["selected"] = json!(selection.contains(&q.id));
            v
        })
        .collect();

    ok(
        &req.id,
        json!({
            "questions": items,
            "total": items.len(),
            "selectedCount": selection.len()
        }),
    )
}

fn handle_questions_stats(state: &mut AppState, req: &Request) -> serde_json::Value {
    let questions = match load(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let categories: HashSet<&str> = questions.iter().map(|q| q.category.as_str()).collect();
    let total_usage = stats::sum(&questions, |q| Some(q.usage_count as f64)) as i64;
    let selected = state.selection(LIST).len();

    ok(
        &req.id,
        json!({
            "total": questions.len(),
            "categoryCount": categories.len(),
            "totalUsage": total_usage,
            "selectedCount": selected
        }),
    )
}

fn handle_selection_toggle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.id", None);
    };

    let selection = state.selection(LIST);
    let selected = selection.toggle(id);
    ok(
        &req.id,
        json!({ "selected": selected, "selectedCount": selection.len() }),
    )
}

fn handle_selection_toggle_all(state: &mut AppState, req: &Request) -> serde_json::Value {
    let visible: Vec<String> = match req.params.get("visibleIds").and_then(|v| v.as_array()) {
        Some(arr) => arr
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        None => return err(&req.id, "bad_params", "missing params.visibleIds", None),
    };

    let selection = state.selection(LIST);
    selection.toggle_all(visible);
    ok(&req.id, json!({ "selectedCount": selection.len() }))
}

fn handle_selection_clear(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.selection(LIST).clear();
    ok(&req.id, json!({ "selectedCount": 0 }))
}

fn handle_batch_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(ids) = state.selection(LIST).drain_for_batch() else {
        return err(
            &req.id,
            "empty_selection",
            "batch delete requires a non-empty selection",
            None,
        );
    };

    let Some(conn) = state.db.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let tx = match conn.transaction() {
        Ok(tx) => tx,
        Err(e) => return err(&req.id, "db_delete_failed", e.to_string(), None),
    };

    let mut deleted = 0usize;
    for id in &ids {
        match tx.execute("DELETE FROM questions WHERE id = ?", [id]) {
            Ok(n) => deleted += n,
            Err(e) => {
                let _ = tx.rollback();
                return err(
                    &req.id,
                    "db_delete_failed",
                    e.to_string(),
                    Some(json!({ "table": "questions" })),
                );
            }
        }
    }
    if let Err(e) = tx.commit() {
        return err(&req.id, "db_commit_failed", e.to_string(), None);
    }

    ok(&req.id, json!({ "deleted": deleted }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "questions.list" => Some(handle_questions_list(state, req)),
        "questions.stats" => Some(handle_questions_stats(state, req)),
        "questions.selection.toggle" => Some(handle_selection_toggle(state, req)),
        "questions.selection.toggleAll" => Some(handle_selection_toggle_all(state, req)),
        "questions.selection.clear" => Some(handle_selection_clear(state, req)),
        "questions.batchDelete" => Some(handle_batch_delete(state, req)),
        _ => None,
    }
}
