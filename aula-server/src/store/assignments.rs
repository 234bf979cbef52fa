use aula_core::{Assignment, FileRef, Grade, Submission};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::error::ApiError;

// Le colonne assigned_to/attachments sono array JSON serializzati in TEXT:
// la resa SQLite degli array di documento dell'originale.

fn decode_json<T: serde::de::DeserializeOwned>(raw: &str, what: &str) -> Result<T, ApiError> {
    serde_json::from_str(raw).map_err(|e| ApiError::Internal(format!("decode {}: {}", what, e)))
}

fn encode_json<T: serde::Serialize>(value: &T, what: &str) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Internal(format!("encode {}: {}", what, e)))
}

fn submission_from_row(row: &SqliteRow) -> Result<Submission, ApiError> {
    let attachments_raw: String = row.try_get("attachments")?;
    let score: Option<f64> = row.try_get("grade_score")?;
    let grade = match score {
        Some(score) => Some(Grade {
            score,
            feedback: row
                .try_get::<Option<String>, _>("grade_feedback")?
                .unwrap_or_default(),
            graded_at: row
                .try_get::<Option<String>, _>("graded_at")?
                .unwrap_or_default(),
        }),
        None => None,
    };
    Ok(Submission {
        submission_id: row.try_get("submission_id")?,
        user_id: row.try_get("user_id")?,
        content: row.try_get("content")?,
        attachments: decode_json::<Vec<FileRef>>(&attachments_raw, "submission attachments")?,
        submitted_at: row.try_get("submitted_at")?,
        grade,
    })
}

fn assignment_from_row(row: &SqliteRow, submissions: Vec<Submission>) -> Result<Assignment, ApiError> {
    let assigned_to_raw: String = row.try_get("assigned_to")?;
    let attachments_raw: String = row.try_get("attachments")?;
    Ok(Assignment {
        assignment_id: row.try_get("assignment_id")?,
        creator_id: row.try_get("creator_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        due_date: row.try_get("due_date")?,
        assigned_to: decode_json(&assigned_to_raw, "assigned_to")?,
        attachments: decode_json(&attachments_raw, "assignment attachments")?,
        submissions,
        created_at: row.try_get("created_at")?,
    })
}

async fn submissions_for(
    pool: &SqlitePool,
    assignment_id: &str,
) -> Result<Vec<Submission>, ApiError> {
    let rows = sqlx::query(
        "SELECT submission_id, user_id, content, attachments, submitted_at, \
                grade_score, grade_feedback, graded_at \
         FROM submissions WHERE assignment_id = ? ORDER BY submitted_at ASC, rowid ASC",
    )
    .bind(assignment_id)
    .fetch_all(pool)
    .await?;
    rows.iter().map(submission_from_row).collect()
}

pub async fn create_assignment(pool: &SqlitePool, assignment: &Assignment) -> Result<(), ApiError> {
    sqlx::query(
        "INSERT INTO assignments (assignment_id, creator_id, title, description, due_date, \
                                  assigned_to, attachments, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&assignment.assignment_id)
    .bind(&assignment.creator_id)
    .bind(&assignment.title)
    .bind(&assignment.description)
    .bind(&assignment.due_date)
    .bind(encode_json(&assignment.assigned_to, "assigned_to")?)
    .bind(encode_json(&assignment.attachments, "attachments")?)
    .bind(&assignment.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_assignment(
    pool: &SqlitePool,
    assignment_id: &str,
) -> Result<Option<Assignment>, ApiError> {
    let row = sqlx::query(
        "SELECT assignment_id, creator_id, title, description, due_date, \
                assigned_to, attachments, created_at \
         FROM assignments WHERE assignment_id = ?",
    )
    .bind(assignment_id)
    .fetch_optional(pool)
    .await?;
    match row {
        Some(row) => {
            let submissions = submissions_for(pool, assignment_id).await?;
            Ok(Some(assignment_from_row(&row, submissions)?))
        }
        None => Ok(None),
    }
}

/// Compiti creati dall'utente o a lui assegnati, più recenti per primi.
/// json_each scioglie l'array JSON di assigned_to per il test di appartenenza.
pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Assignment>, ApiError> {
    let rows = sqlx::query(
        "SELECT assignment_id, creator_id, title, description, due_date, \
                assigned_to, attachments, created_at \
         FROM assignments \
         WHERE creator_id = ? \
            OR EXISTS (SELECT 1 FROM json_each(assignments.assigned_to) WHERE json_each.value = ?) \
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut assignments = Vec::with_capacity(rows.len());
    for row in &rows {
        let assignment_id: String = row.try_get("assignment_id")?;
        let submissions = submissions_for(pool, &assignment_id).await?;
        assignments.push(assignment_from_row(row, submissions)?);
    }
    Ok(assignments)
}

pub async fn add_submission(
    pool: &SqlitePool,
    assignment_id: &str,
    submission: &Submission,
) -> Result<(), ApiError> {
    sqlx::query(
        "INSERT INTO submissions (submission_id, assignment_id, user_id, content, attachments, submitted_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&submission.submission_id)
    .bind(assignment_id)
    .bind(&submission.user_id)
    .bind(&submission.content)
    .bind(encode_json(&submission.attachments, "attachments")?)
    .bind(&submission.submitted_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn grade_submission(
    pool: &SqlitePool,
    assignment_id: &str,
    submission_id: &str,
    grade: &Grade,
) -> Result<(), ApiError> {
    let result = sqlx::query(
        "UPDATE submissions SET grade_score = ?, grade_feedback = ?, graded_at = ? \
         WHERE submission_id = ? AND assignment_id = ?",
    )
    .bind(grade.score)
    .bind(&grade.feedback)
    .bind(&grade.graded_at)
    .bind(submission_id)
    .bind(assignment_id)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!(
            "submission {} not found",
            submission_id
        )));
    }
    Ok(())
}
