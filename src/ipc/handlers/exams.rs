use crate::catalog::{self, Exam, ExamKind, ExamStatus};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::listview::{self, FACET_ALL};
use crate::stats;
use serde_json::json;

fn handle_exams_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let exams = match catalog::load_exams(conn) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    let tab = req.params.get("tab").and_then(|v| v.as_str()).unwrap_or("all");
    let scope: Box<dyn Fn(&Exam) -> bool> = match tab {
        "all" => Box::new(|_| true),
        "formal" => Box::new(|e: &Exam| e.kind == ExamKind::Formal),
        "mock" => Box::new(|e: &Exam| e.kind == ExamKind::Mock),
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
    let status = req
        .params
        .get("status")
        .and_then(|v| v.as_str())
        .unwrap_or(FACET_ALL);

    let visible = listview::render(&exams, scope, query, &[("status", status)]);
    ok(
        &req.id,
        json!({
            "exams": visible,
            "total": visible.len()
        }),
    )
}

fn handle_exams_stats(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let exams = match catalog::load_exams(conn) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    ok(
        &req.id,
        json!({
            "total": exams.len(),
            "upcoming": stats::count_where(&exams, |e| e.status == ExamStatus::Upcoming),
            "ongoing": stats::count_where(&exams, |e| e.status == ExamStatus::Ongoing),
            "ended": stats::count_where(&exams, |e| e.status == ExamStatus::Ended),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "exams.list" => Some(handle_exams_list(state, req)),
        "exams.stats" => Some(handle_exams_stats(state, req)),
        _ => None,
    }
}
