use crate::guard;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::session::Role;
use serde_json::json;

fn handle_authorize(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(view) = req.params.get("view").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing params.view", None);
    };

    let decision = guard::authorize(&state.session, view);
    ok(&req.id, json!(decision))
}

fn handle_menu(state: &mut AppState, req: &Request) -> serde_json::Value {
    // Pure role -> menu mapping; falls back to the live session's role.
    let role = match req.params.get("role").and_then(|v| v.as_str()) {
        Some(raw) => match Role::parse(raw) {
            Some(r) => r,
            None => {
                return err(
                    &req.id,
                    "bad_params",
                    "role must be \"student\" or \"teacher\"",
                    None,
                )
            }
        },
        None => match state.session.current() {
            Some(session) => session.role,
            None => return err(&req.id, "bad_params", "missing params.role", None),
        },
    };

    ok(&req.id, json!({ "menu": guard::menu_for(role) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "guard.authorize" => Some(handle_authorize(state, req)),
        "guard.menu" => Some(handle_menu(state, req)),
        _ => None,
    }
}
