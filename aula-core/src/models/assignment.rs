use serde::{Deserialize, Serialize};

/// Riferimento stabile a un file caricato sul blob store esterno.
/// Il core conserva solo il riferimento, mai il contenuto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub filename: String,
    pub content_type: String, // es. 'application/pdf'
    pub url: String,
}

/// Voto assegnato dal creatore a una consegna.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub score: f64,
    #[serde(default)]
    pub feedback: String,
    pub graded_at: String, // RFC3339 UTC
}

/// Consegna di uno studente per un compito.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub submission_id: String,
    pub user_id: String,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<FileRef>,
    pub submitted_at: String, // RFC3339 UTC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
}

/// Compito creato da un docente e assegnato a uno o più utenti.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub assignment_id: String,
    pub creator_id: String,
    pub title: String,
    pub description: String,
    pub due_date: String, // RFC3339 UTC
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<FileRef>,
    #[serde(default)]
    pub submissions: Vec<Submission>,
    pub created_at: String, // RFC3339 UTC
}

impl Assignment {
    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.assigned_to.iter().any(|id| id == user_id)
    }

    pub fn submission_by_user(&self, user_id: &str) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.user_id == user_id)
    }
}
