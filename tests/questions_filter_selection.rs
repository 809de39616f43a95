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

fn question_ids(resp: &serde_json::Value) -> Vec<String> {
    resp["result"]["questions"]
        .as_array()
        .expect("questions array")
        .iter()
        .map(|q| q["id"].as_str().expect("id").to_string())
        .collect()
}

#[test]
fn search_and_facets_are_conjoined_and_order_preserving() {
    let workspace = temp_dir("learnhub-questions-filter");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    // Empty query + all facets: the whole bank, in catalog order.
    let all = request(&mut stdin, &mut reader, "2", "questions.list", json!({}));
    assert_eq!(question_ids(&all), vec!["q-1", "q-2", "q-3"]);
    assert_eq!(all["result"]["total"], 3);

    // "learning" hits every title or content; case-insensitive.
    let learning = request(
        &mut stdin,
        &mut reader,
        "3",
        "questions.list",
        json!({ "query": "LEARNING" }),
    );
    assert_eq!(question_ids(&learning), vec!["q-1", "q-2", "q-3"]);

    // "labeled" only appears in q-3's content.
    let labeled = request(
        &mut stdin,
        &mut reader,
        "4",
        "questions.list",
        json!({ "query": "labeled" }),
    );
    assert_eq!(question_ids(&labeled), vec!["q-3"]);

    // Facets AND together.
    let filtered = request(
        &mut stdin,
        &mut reader,
        "5",
        "questions.list",
        json!({ "category": "Foundations", "difficulty": "easy", "type": "judge" }),
    );
    assert_eq!(question_ids(&filtered), vec!["q-3"]);

    // Query plus a facet that contradicts it yields an empty, valid result.
    let empty = request(
        &mut stdin,
        &mut reader,
        "6",
        "questions.list",
        json!({ "query": "depth", "category": "Foundations" }),
    );
    assert_eq!(empty["result"]["total"], 0);
    assert!(question_ids(&empty).is_empty());

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn selection_survives_filter_changes_and_toggle_all_is_idempotent_in_pairs() {
    let workspace = temp_dir("learnhub-questions-selection");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let toggled = request(
        &mut stdin,
        &mut reader,
        "2",
        "questions.selection.toggle",
        json!({ "id": "q-1" }),
    );
    assert_eq!(toggled["result"]["selected"], true);
    assert_eq!(toggled["result"]["selectedCount"], 1);

    // Filter q-1 out of view; with the default retain policy it stays selected.
    let hard_only = request(
        &mut stdin,
        &mut reader,
        "3",
        "questions.list",
        json!({ "difficulty": "hard" }),
    );
    assert_eq!(question_ids(&hard_only), vec!["q-2"]);
    assert_eq!(hard_only["result"]["selectedCount"], 1);

    // Re-include q-1: it still reports as selected.
    let back = request(&mut stdin, &mut reader, "4", "questions.list", json!({}));
    let q1 = &back["result"]["questions"][0];
    assert_eq!(q1["id"], "q-1");
    assert_eq!(q1["selected"], true);

    // toggleAll from a partial selection selects the whole visible list...
    let select_all = request(
        &mut stdin,
        &mut reader,
        "5",
        "questions.selection.toggleAll",
        json!({ "visibleIds": ["q-1", "q-2", "q-3"] }),
    );
    assert_eq!(select_all["result"]["selectedCount"], 3);

    // ...and a second press clears it: the pair restores the empty set.
    let clear_all = request(
        &mut stdin,
        &mut reader,
        "6",
        "questions.selection.toggleAll",
        json!({ "visibleIds": ["q-1", "q-2", "q-3"] }),
    );
    assert_eq!(clear_all["result"]["selectedCount"], 0);

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn batch_delete_requires_selection_then_removes_and_clears() {
    let workspace = temp_dir("learnhub-questions-batch");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let premature = request(
        &mut stdin,
        &mut reader,
        "2",
        "questions.batchDelete",
        json!({}),
    );
    assert_eq!(premature["ok"], false);
    assert_eq!(premature["error"]["code"], "empty_selection");

    let _ = request(
        &mut stdin,
        &mut reader,
        "3",
        "questions.selection.toggle",
        json!({ "id": "q-1" }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "4",
        "questions.selection.toggle",
        json!({ "id": "q-3" }),
    );

    let deleted = request(
        &mut stdin,
        &mut reader,
        "5",
        "questions.batchDelete",
        json!({}),
    );
    assert_eq!(deleted["ok"], true);
    assert_eq!(deleted["result"]["deleted"], 2);

    // The batch cleared the selection and the rows are gone.
    let after = request(&mut stdin, &mut reader, "6", "questions.list", json!({}));
    assert_eq!(question_ids(&after), vec!["q-2"]);
    assert_eq!(after["result"]["selectedCount"], 0);

    let stats = request(&mut stdin, &mut reader, "7", "questions.stats", json!({}));
    assert_eq!(stats["result"]["total"], 1);

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn prune_policy_drops_hidden_ids_when_enabled() {
    let workspace = temp_dir("learnhub-questions-prune");
    let path = workspace.to_string_lossy().to_string();

    // Pre-set the prune policy in the workspace settings.
    {
        let (mut child, mut stdin, mut reader) = spawn_sidecar();
        let _ = request(
            &mut stdin,
            &mut reader,
            "1",
            "workspace.select",
            json!({ "path": path }),
        );
        drop(stdin);
        let _ = child.wait();
        let db = rusqlite::Connection::open(workspace.join("learnhub.sqlite3")).expect("open db");
        db.execute(
            "INSERT INTO settings(key, value) VALUES('selection.pruneHidden', 'true')",
            [],
        )
        .expect("set policy");
    }

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
        "questions.selection.toggle",
        json!({ "id": "q-1" }),
    );

    // Rendering a view that hides q-1 prunes it under this policy.
    let hard_only = request(
        &mut stdin,
        &mut reader,
        "3",
        "questions.list",
        json!({ "difficulty": "hard" }),
    );
    assert_eq!(hard_only["result"]["selectedCount"], 0);

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
