use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

/// Password-confirmation check only; there is no credential store behind it.
/// A mismatch is a user-visible warning and mutates nothing.
fn handle_change_password(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let new_password = match req.params.get("newPassword").and_then(|v| v.as_str()) {
        Some(v) if !v.is_empty() => v,
        _ => return err(&req.id, "bad_params", "missing newPassword", None),
    };
    let Some(confirm) = req.params.get("confirmPassword").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing confirmPassword", None);
    };

    if new_password != confirm {
        return err(
            &req.id,
            "password_mismatch",
            "new password and confirmation do not match",
            None,
        );
    }

    ok(&req.id, json!({ "changed": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "profile.changePassword" => Some(handle_change_password(state, req)),
        _ => None,
    }
}
