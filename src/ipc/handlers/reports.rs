use crate::catalog::{self, ExamKind, Report, ReportStatus};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::listview;
use crate::stats;
use serde_json::json;

fn handle_reports_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let reports = match catalog::load_reports(conn) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    let tab = req.params.get("tab").and_then(|v| v.as_str()).unwrap_or("all");
    let scope: Box<dyn Fn(&Report) -> bool> = match tab {
        "all" => Box::new(|_| true),
        "formal" => Box::new(|r: &Report| r.kind == ExamKind::Formal),
        "mock" => Box::new(|r: &Report| r.kind == ExamKind::Mock),
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

    let visible = listview::render(&reports, scope, query, &[]);
    let items: Vec<serde_json::Value> = visible.iter().map(|r| catalog::report_json(r)).collect();

    ok(
        &req.id,
        json!({
            "reports": items,
            "total": items.len()
        }),
    )
}

fn handle_reports_stats(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let reports = match catalog::load_reports(conn) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };

    let average_percent =
        stats::average(&reports, |r| Some(r.percentage() as f64)).round() as i64;
    let highest_percent = stats::max_or_zero(&reports, |r| Some(r.percentage() as f64)) as i64;

    ok(
        &req.id,
        json!({
            "total": reports.len(),
            "passed": stats::count_where(&reports, |r| r.status() == ReportStatus::Passed),
            "averagePercent": average_percent,
            "highestPercent": highest_percent,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.list" => Some(handle_reports_list(state, req)),
        "reports.stats" => Some(handle_reports_stats(state, req)),
        _ => None,
    }
}
