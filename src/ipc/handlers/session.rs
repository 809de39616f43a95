use crate::guard;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::session::{Role, SqliteSideChannel};
use serde_json::json;

fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let username = match req.params.get("username").and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => return err(&req.id, "bad_params", "missing username", None),
    };
    let role = match req
        .params
        .get("role")
        .and_then(|v| v.as_str())
        .and_then(Role::parse)
    {
        Some(r) => r,
        None => {
            return err(
                &req.id,
                "bad_params",
                "role must be \"student\" or \"teacher\"",
                None,
            )
        }
    };

    let mut channel = SqliteSideChannel::new(conn);
    match state.session.login(&mut channel, &username, role) {
        Ok(session) => ok(
            &req.id,
            json!({
                "session": session,
                "home": guard::home_route(role)
            }),
        ),
        Err(e) => err(&req.id, "db_write_failed", e.to_string(), None),
    }
}

fn handle_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let mut channel = SqliteSideChannel::new(conn);
    match state.session.logout(&mut channel) {
        Ok(()) => ok(&req.id, json!({ "session": null })),
        Err(e) => err(&req.id, "db_write_failed", e.to_string(), None),
    }
}

fn handle_current(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "session": state.session.current() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "session.login" => Some(handle_login(state, req)),
        "session.logout" => Some(handle_logout(state, req)),
        "session.current" => Some(handle_current(state, req)),
        _ => None,
    }
}
