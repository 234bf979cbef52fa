use serde::{Deserialize, Serialize};

/// Stato di un messaggio diretto sul wire.
/// `read` è assorbente: un messaggio letto non torna mai a `sent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStatus {
    #[serde(rename = "sent")]
    Sent,
    #[serde(rename = "read")]
    Read,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Sent => "sent",
            MessageStatus::Read => "read",
        }
    }

    /// Parsing dal valore salvato nella colonna `status`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sent" => Some(MessageStatus::Sent),
            "read" => Some(MessageStatus::Read),
            _ => None,
        }
    }
}

/// Messaggio diretto persistito dal server e notificato via WS.
/// (senderId, receiverId) sono immutabili dopo la creazione; lo stato
/// può solo avanzare `sent -> read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    /// Testo del messaggio; può mancare se c'è un'immagine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Riferimento (URL) all'immagine sul blob store, mai i bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub is_urgent: bool,
    pub status: MessageStatus,
    pub created_at: String, // RFC3339 UTC
}

impl Message {
    /// True se il messaggio appartiene alla conversazione tra `a` e `b`,
    /// in una qualsiasi delle due direzioni.
    pub fn belongs_to(&self, a: &str, b: &str) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }
}
