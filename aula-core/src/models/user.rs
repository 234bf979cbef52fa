use serde::{Deserialize, Serialize};

/// Utente esposto al client/server sul wire (non è un modello di DB:
/// password_hash e token restano lato server e non passano mai di qui).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    pub created_at: String, // RFC3339 UTC
}
