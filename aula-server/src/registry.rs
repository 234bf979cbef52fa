use dashmap::DashMap;
use tokio::sync::mpsc::UnboundedSender;

/// Registro delle connessioni live: mappa user_id -> sender verso la sessione
/// WebSocket dell'utente. Al massimo un binding per utente; una seconda
/// connessione dello stesso utente sostituisce la prima (last-connect-wins).
/// Effimero: niente di tutto questo viene persistito.
#[derive(Default)]
pub struct ConnectionRegistry {
    inner: DashMap<String, UnboundedSender<String>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Registra (o sostituisce) il canale live dell'utente.
    pub fn bind(&self, user_id: &str, tx: UnboundedSender<String>) {
        self.inner.insert(user_id.to_string(), tx);
    }

    /// Rimuove il binding incondizionatamente; nessun errore se assente.
    pub fn unbind(&self, user_id: &str) {
        self.inner.remove(user_id);
    }

    /// Rimuove il binding solo se appartiene ancora a questa sessione.
    /// Una sessione soppiantata da una connessione più recente non deve
    /// cancellare il binding della sua sostituta in fase di teardown.
    pub fn unbind_if_current(&self, user_id: &str, tx: &UnboundedSender<String>) {
        self.inner.remove_if(user_id, |_, current| current.same_channel(tx));
    }

    /// Canale live dell'utente, se connesso.
    pub fn lookup(&self, user_id: &str) -> Option<UnboundedSender<String>> {
        self.inner.get(user_id).map(|entry| entry.value().clone())
    }

    pub fn is_connected(&self, user_id: &str) -> bool {
        self.inner.contains_key(user_id)
    }
}
