use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Restituisce l'istante corrente in UTC formattato come RFC3339
/// (es. "2026-08-29T12:34:56.123456789Z"). La precisione sub-secondo
/// rende l'ordinamento lessicografico dei timestamp quello di creazione.
pub fn now_timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339).expect("error formatting timestamp")
}
