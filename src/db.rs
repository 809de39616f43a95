use rusqlite::{Connection, OptionalExtension};
use serde_json::json;
use std::path::Path;

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join("learnhub.sqlite3");
    let conn = Connection::open(db_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS exams(
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            kind TEXT NOT NULL,
            status TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            participants INTEGER NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            attempts INTEGER,
            sort_order INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS lab_tasks(
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            status TEXT NOT NULL,
            due_date TEXT NOT NULL,
            progress INTEGER NOT NULL,
            score REAL,
            max_score REAL NOT NULL,
            resources TEXT NOT NULL,
            submission_count INTEGER NOT NULL,
            max_submissions INTEGER,
            sort_order INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS questions(
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            type TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            category TEXT NOT NULL,
            knowledge TEXT NOT NULL,
            content TEXT NOT NULL,
            options TEXT,
            answer TEXT NOT NULL,
            explanation TEXT NOT NULL,
            tags TEXT NOT NULL,
            created_at TEXT NOT NULL,
            usage_count INTEGER NOT NULL,
            sort_order INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS reports(
            id TEXT PRIMARY KEY,
            exam_title TEXT NOT NULL,
            exam_date TEXT NOT NULL,
            score REAL NOT NULL,
            total_score REAL NOT NULL,
            kind TEXT NOT NULL,
            rank INTEGER,
            total_participants INTEGER,
            duration TEXT NOT NULL,
            sort_order INTEGER NOT NULL
        )",
        [],
    )?;

    seed_defaults(&conn)?;

    Ok(conn)
}

pub fn settings_get(conn: &Connection, key: &str) -> anyhow::Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM settings WHERE key = ?", [key], |row| {
            row.get::<_, String>(0)
        })
        .optional()?;
    Ok(value)
}

pub fn settings_set(conn: &Connection, key: &str, value: &str) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [key, value],
    )?;
    Ok(())
}

pub fn settings_remove(conn: &Connection, key: &str) -> anyhow::Result<()> {
    conn.execute("DELETE FROM settings WHERE key = ?", [key])?;
    Ok(())
}

fn table_is_empty(conn: &Connection, table: &str) -> anyhow::Result<bool> {
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count == 0)
}

/// Populate empty catalog tables with the reference data set. Rows keep the
/// source dashboard's insertion order via `sort_order`.
fn seed_defaults(conn: &Connection) -> anyhow::Result<()> {
    if table_is_empty(conn, "exams")? {
        let exams: [(&str, &str, &str, &str, &str, i64, i64, &str, &str, Option<i64>); 4] = [
            (
                "exam-1",
                "Machine Learning Fundamentals Test",
                "Covers the basics of supervised and unsupervised learning",
                "formal",
                "upcoming",
                120,
                45,
                "2024-01-20 14:00",
                "2024-01-20 16:00",
                None,
            ),
            (
                "exam-2",
                "Python Programming Practicum",
                "Data structures, algorithms, object-oriented programming",
                "formal",
                "ongoing",
                90,
                38,
                "2024-01-18 10:00",
                "2024-01-18 11:30",
                None,
            ),
            (
                "exam-3",
                "Deep Learning Mock Practice",
                "Neural networks, CNN and RNN topics",
                "mock",
                "ongoing",
                60,
                52,
                "Open anytime",
                "No limit",
                Some(3),
            ),
            (
                "exam-4",
                "Data Analysis Comprehensive Test",
                "Statistics basics, data visualization, pandas usage",
                "mock",
                "ongoing",
                75,
                29,
                "Open anytime",
                "No limit",
                Some(5),
            ),
        ];
        for (i, e) in exams.iter().enumerate() {
            conn.execute(
                "INSERT INTO exams(id, title, description, kind, status, duration_minutes,
                                   participants, start_time, end_time, attempts, sort_order)
                 VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![e.0, e.1, e.2, e.3, e.4, e.5, e.6, e.7, e.8, e.9, i as i64],
            )?;
        }
    }

    if table_is_empty(conn, "lab_tasks")? {
        let tasks: [(
            &str,
            &str,
            &str,
            &str,
            &str,
            &str,
            i64,
            Option<f64>,
            f64,
            serde_json::Value,
            i64,
            Option<i64>,
        ); 5] = [
            (
                "task-1",
                "Image Classification Dataset Labeling",
                "Label the cat and dog image set accurately; 1000 images required",
                "data-annotation",
                "in-progress",
                "2024-01-25",
                65,
                None,
                100.0,
                json!(["dataset.zip", "labeling-guidelines.pdf", "labeling-tool-guide.md"]),
                2,
                Some(3),
            ),
            (
                "task-2",
                "CNN Model Training Experiment",
                "Train a convolutional network in PyTorch on the CIFAR-10 task",
                "model-training",
                "submitted",
                "2024-01-20",
                100,
                Some(88.0),
                100.0,
                json!(["starter_code.py", "cifar10-dataset.zip", "requirements.pdf"]),
                1,
                Some(2),
            ),
            (
                "task-3",
                "Sales Data Analysis Report",
                "Analyze e-commerce sales data; deliver a visual report with insights",
                "data-analysis",
                "graded",
                "2024-01-15",
                100,
                Some(92.0),
                100.0,
                json!(["sales_data.csv", "analysis-template.xlsx", "references.pdf"]),
                1,
                None,
            ),
            (
                "task-4",
                "Customer Service Bot Development",
                "Build an LLM-backed support bot that handles common questions",
                "ai-agent",
                "not-started",
                "2024-02-01",
                0,
                None,
                100.0,
                json!(["api-docs.pdf", "sample-dialogues.json", "evaluation-criteria.md"]),
                0,
                Some(3),
            ),
            (
                "task-5",
                "AI Art Creation Challenge",
                "Create a themed poster with Stable Diffusion; originality counts",
                "ai-image",
                "in-progress",
                "2024-01-30",
                30,
                None,
                100.0,
                json!(["theme-brief.pdf", "prompt-engineering-guide.md", "rubric.pdf"]),
                1,
                Some(5),
            ),
        ];
        for (i, t) in tasks.iter().enumerate() {
            conn.execute(
                "INSERT INTO lab_tasks(id, title, description, category, status, due_date,
                                       progress, score, max_score, resources,
                                       submission_count, max_submissions, sort_order)
                 VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    t.0,
                    t.1,
                    t.2,
                    t.3,
                    t.4,
                    t.5,
                    t.6,
                    t.7,
                    t.8,
                    t.9.to_string(),
                    t.10,
                    t.11,
                    i as i64
                ],
            )?;
        }
    }

    if table_is_empty(conn, "questions")? {
        let questions: [(
            &str,
            &str,
            &str,
            &str,
            &str,
            &str,
            &str,
            Option<serde_json::Value>,
            &str,
            &str,
            serde_json::Value,
            &str,
            i64,
        ); 3] = [
            (
                "q-1",
                "What is machine learning?",
                "single",
                "easy",
                "Foundations",
                "Machine Learning Overview",
                "Machine learning is a branch of artificial intelligence whose goal is \
                 to let computers learn from data without explicit programming. Which \
                 option describes it best?",
                Some(json!([
                    "A technique for computers to program themselves automatically",
                    "A method where algorithms learn patterns and regularities from data",
                    "A technology for building intelligent robots",
                    "A method for storing and retrieving data"
                ])),
                "B",
                "Machine learning lets algorithms learn patterns from data so they can \
                 predict or decide on new inputs.",
                json!(["fundamentals", "theory"]),
                "2024-01-15",
                15,
            ),
            (
                "q-2",
                "Effect of network depth in deep learning",
                "essay",
                "hard",
                "Deep Learning",
                "Neural Network Architecture",
                "Discuss how increasing the number of layers in a deep neural network \
                 affects model performance, covering benefits, likely problems, and \
                 mitigations for each problem.",
                None,
                "Depth improves representational power and feature abstraction, at the \
                 cost of vanishing or exploding gradients, overfitting, and compute; \
                 mitigations include residual connections, batch normalization, dropout, \
                 and pretraining.",
                "Open-ended; a strong answer covers both theory and practice.",
                json!(["deep-learning", "architecture", "optimization"]),
                "2024-01-14",
                8,
            ),
            (
                "q-3",
                "Supervised learning requires labeled data",
                "judge",
                "easy",
                "Foundations",
                "Learning Paradigms",
                "Supervised learning algorithms require labeled data during training.",
                None,
                "True",
                "Supervised learning fits an input-output mapping from labeled training \
                 examples.",
                json!(["supervised-learning", "fundamentals"]),
                "2024-01-13",
                22,
            ),
        ];
        for (i, q) in questions.iter().enumerate() {
            conn.execute(
                "INSERT INTO questions(id, title, type, difficulty, category, knowledge,
                                       content, options, answer, explanation, tags,
                                       created_at, usage_count, sort_order)
                 VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    q.0,
                    q.1,
                    q.2,
                    q.3,
                    q.4,
                    q.5,
                    q.6,
                    q.7.as_ref().map(|v| v.to_string()),
                    q.8,
                    q.9,
                    q.10.to_string(),
                    q.11,
                    q.12,
                    i as i64
                ],
            )?;
        }
    }

    if table_is_empty(conn, "reports")? {
        let reports: [(&str, &str, &str, f64, f64, &str, Option<i64>, Option<i64>, &str); 4] = [
            (
                "report-1",
                "Machine Learning Fundamentals Test",
                "2024-01-15",
                88.0,
                100.0,
                "formal",
                Some(5),
                Some(45),
                "1h 45m",
            ),
            (
                "report-2",
                "Python Programming Practicum",
                "2024-01-10",
                92.0,
                100.0,
                "formal",
                Some(2),
                Some(38),
                "1h 20m",
            ),
            (
                "report-3",
                "Deep Learning Mock Practice",
                "2024-01-08",
                76.0,
                100.0,
                "mock",
                None,
                None,
                "55m",
            ),
            (
                "report-4",
                "Data Analysis Comprehensive Test",
                "2024-01-05",
                65.0,
                100.0,
                "mock",
                None,
                None,
                "1h 10m",
            ),
        ];
        for (i, r) in reports.iter().enumerate() {
            conn.execute(
                "INSERT INTO reports(id, exam_title, exam_date, score, total_score, kind,
                                     rank, total_participants, duration, sort_order)
                 VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![r.0, r.1, r.2, r.3, r.4, r.5, r.6, r.7, r.8, i as i64],
            )?;
        }
    }

    Ok(())
}
