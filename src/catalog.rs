use rusqlite::Connection;
use serde::Serialize;

use crate::listview::ListEntity;

/// Pass mark applied to a report's derived percentage. Reports below this
/// read as failed; `status` is never stored alongside the primary scores.
pub const PASS_THRESHOLD_PERCENT: i64 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamKind {
    Formal,
    Mock,
}

impl ExamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExamKind::Formal => "formal",
            ExamKind::Mock => "mock",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "formal" => Some(ExamKind::Formal),
            "mock" => Some(ExamKind::Mock),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamStatus {
    Upcoming,
    Ongoing,
    Ended,
}

impl ExamStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ExamStatus::Upcoming => "upcoming",
            ExamStatus::Ongoing => "ongoing",
            ExamStatus::Ended => "ended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "upcoming" => Some(ExamStatus::Upcoming),
            "ongoing" => Some(ExamStatus::Ongoing),
            "ended" => Some(ExamStatus::Ended),
            _ => None,
        }
    }
}

/// Exam lifecycle state is catalog-given, not derived from the time window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: ExamKind,
    pub status: ExamStatus,
    pub duration_minutes: i64,
    pub participants: i64,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskCategory {
    DataAnnotation,
    ModelTraining,
    DataAnalysis,
    AiAgent,
    AiImage,
}

impl TaskCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskCategory::DataAnnotation => "data-annotation",
            TaskCategory::ModelTraining => "model-training",
            TaskCategory::DataAnalysis => "data-analysis",
            TaskCategory::AiAgent => "ai-agent",
            TaskCategory::AiImage => "ai-image",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "data-annotation" => Some(TaskCategory::DataAnnotation),
            "model-training" => Some(TaskCategory::ModelTraining),
            "data-analysis" => Some(TaskCategory::DataAnalysis),
            "ai-agent" => Some(TaskCategory::AiAgent),
            "ai-image" => Some(TaskCategory::AiImage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Submitted,
    Graded,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not-started",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Submitted => "submitted",
            TaskStatus::Graded => "graded",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not-started" => Some(TaskStatus::NotStarted),
            "in-progress" => Some(TaskStatus::InProgress),
            "submitted" => Some(TaskStatus::Submitted),
            "graded" => Some(TaskStatus::Graded),
            _ => None,
        }
    }

    /// "Completed" in the lab view groups submitted and graded work.
    pub fn is_completed(self) -> bool {
        matches!(self, TaskStatus::Submitted | TaskStatus::Graded)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabTask {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: TaskCategory,
    pub status: TaskStatus,
    pub due_date: String,
    pub progress: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub max_score: f64,
    pub resources: Vec<String>,
    pub submission_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_submissions: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Single,
    Multiple,
    Judge,
    Essay,
}

impl QuestionType {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Single => "single",
            QuestionType::Multiple => "multiple",
            QuestionType::Judge => "judge",
            QuestionType::Essay => "essay",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(QuestionType::Single),
            "multiple" => Some(QuestionType::Multiple),
            "judge" => Some(QuestionType::Judge),
            "essay" => Some(QuestionType::Essay),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub category: String,
    pub knowledge: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub answer: String,
    pub explanation: String,
    pub tags: Vec<String>,
    pub created_at: String,
    pub usage_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Passed,
    Failed,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Passed => "passed",
            ReportStatus::Failed => "failed",
        }
    }
}

/// Score report. Only the primary fields are stored; `percentage` and
/// pass/fail status are computed from them at read time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub exam_title: String,
    pub exam_date: String,
    pub score: f64,
    pub total_score: f64,
    pub kind: ExamKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_participants: Option<i64>,
    pub duration: String,
}

impl Report {
    pub fn percentage(&self) -> i64 {
        if self.total_score <= 0.0 {
            return 0;
        }
        (100.0 * self.score / self.total_score).round() as i64
    }

    pub fn status(&self) -> ReportStatus {
        if self.percentage() >= PASS_THRESHOLD_PERCENT {
            ReportStatus::Passed
        } else {
            ReportStatus::Failed
        }
    }
}

impl ListEntity for Exam {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.description]
    }

    fn facet(&self, name: &str) -> Option<String> {
        match name {
            "kind" => Some(self.kind.as_str().to_string()),
            "status" => Some(self.status.as_str().to_string()),
            _ => None,
        }
    }
}

impl ListEntity for LabTask {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.description]
    }

    fn facet(&self, name: &str) -> Option<String> {
        match name {
            "category" => Some(self.category.as_str().to_string()),
            "status" => Some(self.status.as_str().to_string()),
            _ => None,
        }
    }
}

impl ListEntity for Question {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.content]
    }

    fn facet(&self, name: &str) -> Option<String> {
        match name {
            "category" => Some(self.category.clone()),
            "difficulty" => Some(self.difficulty.as_str().to_string()),
            "type" => Some(self.question_type.as_str().to_string()),
            _ => None,
        }
    }
}

impl ListEntity for Report {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.exam_title]
    }

    fn facet(&self, name: &str) -> Option<String> {
        match name {
            "kind" => Some(self.kind.as_str().to_string()),
            "status" => Some(self.status().as_str().to_string()),
            _ => None,
        }
    }
}

fn bad_enum(table: &str, column: &str, value: &str) -> anyhow::Error {
    anyhow::anyhow!("{table}.{column}: unrecognized value {value:?}")
}

fn json_strings(raw: &str) -> anyhow::Result<Vec<String>> {
    Ok(serde_json::from_str(raw)?)
}

pub fn load_exams(conn: &Connection) -> anyhow::Result<Vec<Exam>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, kind, status, duration_minutes,
                participants, start_time, end_time, attempts
         FROM exams ORDER BY sort_order",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
                row.get::<_, Option<i64>>(9)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut exams = Vec::with_capacity(rows.len());
    for (id, title, description, kind, status, duration, participants, start, end, attempts) in rows
    {
        exams.push(Exam {
            kind: ExamKind::parse(&kind).ok_or_else(|| bad_enum("exams", "kind", &kind))?,
            status: ExamStatus::parse(&status)
                .ok_or_else(|| bad_enum("exams", "status", &status))?,
            id,
            title,
            description,
            duration_minutes: duration,
            participants,
            start_time: start,
            end_time: end,
            attempts,
        });
    }
    Ok(exams)
}

pub fn load_lab_tasks(conn: &Connection) -> anyhow::Result<Vec<LabTask>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, category, status, due_date, progress,
                score, max_score, resources, submission_count, max_submissions
         FROM lab_tasks ORDER BY sort_order",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, Option<f64>>(7)?,
                row.get::<_, f64>(8)?,
                row.get::<_, String>(9)?,
                row.get::<_, i64>(10)?,
                row.get::<_, Option<i64>>(11)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut tasks = Vec::with_capacity(rows.len());
    for (
        id,
        title,
        description,
        category,
        status,
        due_date,
        progress,
        score,
        max_score,
        resources,
        submission_count,
        max_submissions,
    ) in rows
    {
        tasks.push(LabTask {
            category: TaskCategory::parse(&category)
                .ok_or_else(|| bad_enum("lab_tasks", "category", &category))?,
            status: TaskStatus::parse(&status)
                .ok_or_else(|| bad_enum("lab_tasks", "status", &status))?,
            resources: json_strings(&resources)?,
            id,
            title,
            description,
            due_date,
            progress,
            score,
            max_score,
            submission_count,
            max_submissions,
        });
    }
    Ok(tasks)
}

pub fn load_questions(conn: &Connection) -> anyhow::Result<Vec<Question>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, type, difficulty, category, knowledge, content,
                options, answer, explanation, tags, created_at, usage_count
         FROM questions ORDER BY sort_order",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, Option<String>>(7)?,
                row.get::<_, String>(8)?,
                row.get::<_, String>(9)?,
                row.get::<_, String>(10)?,
                row.get::<_, String>(11)?,
                row.get::<_, i64>(12)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut questions = Vec::with_capacity(rows.len());
    for (
        id,
        title,
        question_type,
        difficulty,
        category,
        knowledge,
        content,
        options,
        answer,
        explanation,
        tags,
        created_at,
        usage_count,
    ) in rows
    {
        questions.push(Question {
            question_type: QuestionType::parse(&question_type)
                .ok_or_else(|| bad_enum("questions", "type", &question_type))?,
            difficulty: Difficulty::parse(&difficulty)
                .ok_or_else(|| bad_enum("questions", "difficulty", &difficulty))?,
            options: options.as_deref().map(json_strings).transpose()?,
            tags: json_strings(&tags)?,
            id,
            title,
            category,
            knowledge,
            content,
            answer,
            explanation,
            created_at,
            usage_count,
        });
    }
    Ok(questions)
}

pub fn load_reports(conn: &Connection) -> anyhow::Result<Vec<Report>> {
    let mut stmt = conn.prepare(
        "SELECT id, exam_title, exam_date, score, total_score, kind,
                rank, total_participants, duration
         FROM reports ORDER BY sort_order",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, Option<i64>>(6)?,
                row.get::<_, Option<i64>>(7)?,
                row.get::<_, String>(8)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut reports = Vec::with_capacity(rows.len());
    for (id, exam_title, exam_date, score, total_score, kind, rank, total_participants, duration) in
        rows
    {
        reports.push(Report {
            kind: ExamKind::parse(&kind).ok_or_else(|| bad_enum("reports", "kind", &kind))?,
            id,
            exam_title,
            exam_date,
            score,
            total_score,
            rank,
            total_participants,
            duration,
        });
    }
    Ok(reports)
}

/// Serialize a report with its derived display fields attached.
pub fn report_json(report: &Report) -> serde_json::Value {
    let mut value = serde_json::to_value(report).unwrap_or_else(|_| serde_json::json!({}));
    value["percentage"] = serde_json::json!(report.percentage());
    value["status"] = serde_json::json!(report.status().as_str());
    value
}
