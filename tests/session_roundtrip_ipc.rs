use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_learnhubd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn learnhubd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    serde_json::from_str(line.trim()).expect("parse response json")
}

#[test]
fn session_survives_a_daemon_restart_until_logout() {
    let workspace = temp_dir("learnhub-session-roundtrip");
    let path = workspace.to_string_lossy().to_string();

    // First run: log in.
    {
        let (mut child, mut stdin, mut reader) = spawn_sidecar();
        let _ = request(
            &mut stdin,
            &mut reader,
            "1",
            "workspace.select",
            json!({ "path": path }),
        );
        let resp = request(
            &mut stdin,
            &mut reader,
            "2",
            "session.login",
            json!({ "username": "stu001", "role": "student" }),
        );
        assert_eq!(resp["ok"], true);
        assert_eq!(resp["result"]["session"]["role"], "student");
        assert_eq!(resp["result"]["session"]["username"], "stu001");
        assert_eq!(resp["result"]["home"], "/dashboard");
        drop(stdin);
        let _ = child.wait();
    }

    // Fresh boot: the side-channel restores the session.
    {
        let (mut child, mut stdin, mut reader) = spawn_sidecar();
        let _ = request(
            &mut stdin,
            &mut reader,
            "1",
            "workspace.select",
            json!({ "path": path }),
        );
        let resp = request(&mut stdin, &mut reader, "2", "session.current", json!({}));
        assert_eq!(resp["result"]["session"]["role"], "student");
        assert_eq!(resp["result"]["session"]["username"], "stu001");

        let out = request(&mut stdin, &mut reader, "3", "session.logout", json!({}));
        assert_eq!(out["ok"], true);
        drop(stdin);
        let _ = child.wait();
    }

    // After logout, a fresh boot is anonymous.
    {
        let (mut child, mut stdin, mut reader) = spawn_sidecar();
        let _ = request(
            &mut stdin,
            &mut reader,
            "1",
            "workspace.select",
            json!({ "path": path }),
        );
        let resp = request(&mut stdin, &mut reader, "2", "session.current", json!({}));
        assert!(resp["result"]["session"].is_null());
        drop(stdin);
        let _ = child.wait();
    }

    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn login_rejects_unknown_roles_and_missing_usernames() {
    let workspace = temp_dir("learnhub-session-badparams");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let bad_role = request(
        &mut stdin,
        &mut reader,
        "2",
        "session.login",
        json!({ "username": "x", "role": "admin" }),
    );
    assert_eq!(bad_role["ok"], false);
    assert_eq!(bad_role["error"]["code"], "bad_params");

    let no_user = request(
        &mut stdin,
        &mut reader,
        "3",
        "session.login",
        json!({ "role": "student" }),
    );
    assert_eq!(no_user["ok"], false);
    assert_eq!(no_user["error"]["code"], "bad_params");

    // Neither failed attempt created a session.
    let current = request(&mut stdin, &mut reader, "4", "session.current", json!({}));
    assert!(current["result"]["session"].is_null());

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn unrecognized_persisted_role_boots_anonymous() {
    let workspace = temp_dir("learnhub-session-badrole");
    let path = workspace.to_string_lossy().to_string();

    {
        let (mut child, mut stdin, mut reader) = spawn_sidecar();
        let _ = request(
            &mut stdin,
            &mut reader,
            "1",
            "workspace.select",
            json!({ "path": path }),
        );
        let _ = request(
            &mut stdin,
            &mut reader,
            "2",
            "session.login",
            json!({ "username": "t1", "role": "teacher" }),
        );
        drop(stdin);
        let _ = child.wait();
    }

    // Corrupt the stored role out of band.
    {
        let db = rusqlite::Connection::open(workspace.join("learnhub.sqlite3")).expect("open db");
        db.execute(
            "UPDATE settings SET value = 'admin' WHERE key = 'session.role'",
            [],
        )
        .expect("corrupt role");
    }

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": path }),
    );
    let resp = request(&mut stdin, &mut reader, "2", "session.current", json!({}));
    assert!(resp["result"]["session"].is_null());

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
