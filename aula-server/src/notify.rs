use aula_core::WsEvent;

use crate::registry::ConnectionRegistry;

/// Consegna best-effort di un evento alla sessione live dell'utente, se c'è.
/// At-most-once: nessun retry, nessuna coda. Lo store è la fonte di verità
/// e un push mancato viene recuperato dal prossimo fetch completo del client.
/// Un lookup e un send per chiamata: l'unico ordinamento garantito tra due
/// notifiche allo stesso utente è l'ordine di chiamata.
pub fn notify(registry: &ConnectionRegistry, user_id: &str, event: &WsEvent) {
    let Some(tx) = registry.lookup(user_id) else {
        tracing::debug!(user_id, "no live channel, push skipped");
        return;
    };

    let payload = match serde_json::to_string(event) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("serialize ws event: {}", e);
            return;
        }
    };

    if tx.send(payload).is_err() {
        // Canale morto: la sessione sta chiudendo e farà lei l'unbind.
        // Il drop è sicuro, ma non va scambiato per una consegna.
        tracing::debug!(user_id, "live channel closed, push dropped");
    }
}
