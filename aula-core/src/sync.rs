//! Stato di sincronizzazione lato client per la conversazione aperta.
//!
//! Il client parte da uno snapshot completo (GET /api/messages/:peer) e poi
//! ripiega sugli eventi push `newMessage` / `messageRead`. Lo stesso record
//! può arrivare due volte (append ottimistico della POST + push), quindi la
//! riconciliazione deduplica per messageId. Eventi di conversazioni diverse
//! da quella aperta vengono ignorati. Alla chiusura lo stato si butta via:
//! alla riapertura un nuovo snapshot recupera ogni push perso.

use crate::models::{Message, MessageStatus};
use crate::protocol::ws::WsEvent;

/// Sequenza locale ordinata dei messaggi della conversazione aperta,
/// riconciliata con gli eventi push. Nessun I/O, nessun transport.
#[derive(Debug, Clone)]
pub struct ConversationSync {
    me: String,
    peer: String,
    messages: Vec<Message>,
}

impl ConversationSync {
    pub fn new(me: impl Into<String>, peer: impl Into<String>) -> Self {
        Self {
            me: me.into(),
            peer: peer.into(),
            messages: Vec::new(),
        }
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Vista corrente, nell'ordine del server.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn contains(&self, message_id: &str) -> bool {
        self.messages.iter().any(|m| m.message_id == message_id)
    }

    /// Sostituisce lo stato locale con uno snapshot appena fetchato.
    /// Lo snapshot è la fonte di verità: vince su qualunque stato locale.
    pub fn apply_snapshot(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    /// Append del messaggio restituito dalla propria POST di invio.
    /// Se il push è arrivato prima della risposta HTTP il record c'è già.
    pub fn optimistic_append(&mut self, message: Message) {
        if !self.contains(&message.message_id) {
            self.messages.push(message);
        }
    }

    /// Ripiega un evento push nello stato locale.
    /// Ritorna true se la vista è cambiata.
    pub fn apply_event(&mut self, event: &WsEvent) -> bool {
        match event {
            WsEvent::NewMessage(message) => {
                // Solo la conversazione aperta: eventi di altri peer
                // verranno recuperati dallo snapshot alla loro apertura.
                if !message.belongs_to(&self.me, &self.peer) {
                    return false;
                }
                // Dedupe contro l'append ottimistico.
                if self.contains(&message.message_id) {
                    return false;
                }
                self.messages.push(message.clone());
                true
            }
            WsEvent::MessageRead(message_id) => {
                match self
                    .messages
                    .iter_mut()
                    .find(|m| m.message_id == *message_id)
                {
                    // `read` è assorbente: mai retrocedere.
                    Some(m) if m.status != MessageStatus::Read => {
                        m.status = MessageStatus::Read;
                        true
                    }
                    // id sconosciuto o già letto: no-op
                    _ => false,
                }
            }
            // Gli avvisi dei compiti non toccano la vista conversazione.
            _ => false,
        }
    }
}
