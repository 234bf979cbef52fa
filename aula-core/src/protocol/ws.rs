/* This file defines how data "travel" through the web socket.
    WsEvent is the server -> client envelope: everything the server pushes
    to a live session (new messages, read receipts, assignment notices).
    WsCommand is the client -> server side, which for this system is only
    the authenticate frame: sends happen over HTTP, the socket is push-only.
*/
use serde::{Deserialize, Serialize};

use crate::{error::Error, models::{Message, User}};

/// Evento WS (S→C) con envelope { type, payload }.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WsEvent {
    /// Conferma di autenticazione della sessione.
    #[serde(rename = "authOk")]
    AuthOk(User),
    /// Nuovo messaggio diretto per l'utente connesso.
    #[serde(rename = "newMessage")]
    NewMessage(Message),
    /// Ricevuta di lettura: il payload è il solo messageId.
    #[serde(rename = "messageRead")]
    MessageRead(String),
    /// Un compito è stato assegnato all'utente connesso.
    #[serde(rename = "newAssignment")]
    NewAssignment(AssignmentNotice),
    /// Uno studente ha consegnato (inviato al creatore del compito).
    #[serde(rename = "newSubmission")]
    NewSubmission(SubmissionNotice),
    /// La consegna dell'utente connesso è stata valutata.
    #[serde(rename = "submissionGraded")]
    SubmissionGraded(GradeNotice),
    /// Server → Client: errore fuori banda.
    #[serde(rename = "error")]
    Error(Error),
}

/// Comando WS (C→S) con envelope { type, payload }.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WsCommand {
    /// Prima frame della sessione se il token non è nel query param.
    #[serde(rename = "authenticate")]
    Authenticate(Authenticate),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authenticate {
    pub token: String,
}

/// Avviso compatto di nuovo compito (niente payload completo: il client
/// fa il fetch dal dettaglio se interessato).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentNotice {
    pub assignment_id: String,
    pub title: String,
    pub creator: String, // full name
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionNotice {
    pub assignment_id: String,
    pub title: String,
    pub student: String, // full name
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeNotice {
    pub assignment_id: String,
    pub title: String,
    pub score: f64,
}
