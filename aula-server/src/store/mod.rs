//! Accesso allo store persistito, un modulo per entità.
//! Nessun modulo qui decide se notificare: quella scelta appartiene al
//! livello lifecycle, lo store garantisce solo validazione e invarianti
//! (payload obbligatorio, stato monotono, ordinamento di creazione).

pub mod assignments;
pub mod messages;
pub mod users;
