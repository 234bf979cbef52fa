use aula_core::{new_id, now_timestamp, Message, MessageStatus};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::error::ApiError;

const MESSAGE_COLUMNS: &str =
    "message_id, sender_id, receiver_id, text, image, is_urgent, status, created_at";

fn message_from_row(row: &SqliteRow) -> Result<Message, ApiError> {
    let status_raw: String = row.try_get("status")?;
    let status = MessageStatus::parse(&status_raw)
        .ok_or_else(|| ApiError::Internal(format!("unknown message status '{}'", status_raw)))?;
    Ok(Message {
        message_id: row.try_get("message_id")?,
        sender_id: row.try_get("sender_id")?,
        receiver_id: row.try_get("receiver_id")?,
        text: row.try_get("text")?,
        image: row.try_get("image")?,
        is_urgent: row.try_get("is_urgent")?,
        status,
        created_at: row.try_get("created_at")?,
    })
}

/// Crea e persiste un nuovo messaggio con stato iniziale `sent`.
/// Serve almeno uno tra testo e immagine, altrimenti 400.
pub async fn create_message(
    pool: &SqlitePool,
    sender_id: &str,
    receiver_id: &str,
    text: Option<String>,
    image: Option<String>,
    is_urgent: bool,
) -> Result<Message, ApiError> {
    if text.is_none() && image.is_none() {
        return Err(ApiError::Validation(
            "message needs at least text or image".to_string(),
        ));
    }

    let message = Message {
        message_id: new_id(),
        sender_id: sender_id.to_string(),
        receiver_id: receiver_id.to_string(),
        text,
        image,
        is_urgent,
        status: MessageStatus::Sent,
        created_at: now_timestamp(),
    };

    sqlx::query(
        "INSERT INTO messages (message_id, sender_id, receiver_id, text, image, is_urgent, status, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&message.message_id)
    .bind(&message.sender_id)
    .bind(&message.receiver_id)
    .bind(message.text.as_deref())
    .bind(message.image.as_deref())
    .bind(message.is_urgent)
    .bind(message.status.as_str())
    .bind(&message.created_at)
    .execute(pool)
    .await?;

    Ok(message)
}

pub async fn get_message(pool: &SqlitePool, message_id: &str) -> Result<Option<Message>, ApiError> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM messages WHERE message_id = ?",
        MESSAGE_COLUMNS
    ))
    .bind(message_id)
    .fetch_optional(pool)
    .await?;
    row.as_ref().map(message_from_row).transpose()
}

/// Tutti i messaggi tra `user_a` e `user_b`, in entrambe le direzioni,
/// in ordine di creazione come persistito (non di arrivo dei push).
/// rowid spareggia eventuali timestamp identici.
pub async fn list_conversation(
    pool: &SqlitePool,
    user_a: &str,
    user_b: &str,
) -> Result<Vec<Message>, ApiError> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM messages \
         WHERE (sender_id = ? AND receiver_id = ?) OR (sender_id = ? AND receiver_id = ?) \
         ORDER BY created_at ASC, rowid ASC",
        MESSAGE_COLUMNS
    ))
    .bind(user_a)
    .bind(user_b)
    .bind(user_b)
    .bind(user_a)
    .fetch_all(pool)
    .await?;
    rows.iter().map(message_from_row).collect()
}

/// Imposta lo stato del messaggio. Idempotente, e `read` è assorbente:
/// un tentativo di retrocessione a `sent` restituisce il record invariato.
/// Chi chiama decide se l'esito merita una notifica, non lo store.
pub async fn set_status(
    pool: &SqlitePool,
    message_id: &str,
    status: MessageStatus,
) -> Result<Message, ApiError> {
    let current = get_message(pool, message_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("message {} not found", message_id)))?;

    if current.status == status
        || (current.status == MessageStatus::Read && status == MessageStatus::Sent)
    {
        return Ok(current);
    }

    sqlx::query("UPDATE messages SET status = ? WHERE message_id = ?")
        .bind(status.as_str())
        .bind(message_id)
        .execute(pool)
        .await?;

    Ok(Message { status, ..current })
}

/// Aggiorna testo/immagine/urgenza; i campi None restano invariati.
/// (senderId, receiverId) non si toccano mai. Nessuna notifica live.
pub async fn edit_message(
    pool: &SqlitePool,
    message_id: &str,
    text: Option<String>,
    image: Option<String>,
    is_urgent: Option<bool>,
) -> Result<Message, ApiError> {
    let current = get_message(pool, message_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("message {} not found", message_id)))?;

    let updated = Message {
        text: text.or_else(|| current.text.clone()),
        image: image.or_else(|| current.image.clone()),
        is_urgent: is_urgent.unwrap_or(current.is_urgent),
        ..current
    };

    sqlx::query("UPDATE messages SET text = ?, image = ?, is_urgent = ? WHERE message_id = ?")
        .bind(updated.text.as_deref())
        .bind(updated.image.as_deref())
        .bind(updated.is_urgent)
        .bind(message_id)
        .execute(pool)
        .await?;

    Ok(updated)
}

/// Rimozione esplicita. Nessuna notifica live.
pub async fn delete_message(pool: &SqlitePool, message_id: &str) -> Result<(), ApiError> {
    let result = sqlx::query("DELETE FROM messages WHERE message_id = ?")
        .bind(message_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!(
            "message {} not found",
            message_id
        )));
    }
    Ok(())
}
