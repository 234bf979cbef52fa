use aula_core::sync::ConversationSync;
use aula_core::{Message, MessageStatus, WsEvent};

const ME: &str = "me-0000";
const PEER: &str = "peer-0000";
const OTHER: &str = "other-0000";

fn msg(id: &str, from: &str, to: &str, text: &str) -> Message {
    Message {
        message_id: id.to_string(),
        sender_id: from.to_string(),
        receiver_id: to.to_string(),
        text: Some(text.to_string()),
        image: None,
        is_urgent: false,
        status: MessageStatus::Sent,
        created_at: "2026-08-29T10:00:00Z".to_string(),
    }
}

fn ids(sync: &ConversationSync) -> Vec<&str> {
    sync.messages().iter().map(|m| m.message_id.as_str()).collect()
}

/*
    Obiettivo test: un push newMessage del peer per la conversazione aperta
    viene appeso in coda allo snapshot.
*/
#[test]
fn push_from_peer_appends() {
    let mut sync = ConversationSync::new(ME, PEER);
    sync.apply_snapshot(vec![msg("m1", ME, PEER, "hi")]);

    let changed = sync.apply_event(&WsEvent::NewMessage(msg("m2", PEER, ME, "hey")));

    assert!(changed);
    assert_eq!(ids(&sync), vec!["m1", "m2"]);
}

/*
    Obiettivo test: dedupe per id. La risposta alla propria POST (append
    ottimistico) e il push possono portare lo stesso record: il secondo
    arrivo non deve produrre un duplicato, in nessuno dei due ordini.
*/
#[test]
fn optimistic_append_and_push_dedupe_by_id() {
    let mut sync = ConversationSync::new(ME, PEER);
    let sent = msg("m1", ME, PEER, "hi");

    // risposta HTTP prima, push dopo
    sync.optimistic_append(sent.clone());
    assert!(!sync.apply_event(&WsEvent::NewMessage(sent.clone())));
    assert_eq!(ids(&sync), vec!["m1"]);

    // push prima, risposta HTTP dopo
    let mut sync = ConversationSync::new(ME, PEER);
    assert!(sync.apply_event(&WsEvent::NewMessage(sent.clone())));
    sync.optimistic_append(sent);
    assert_eq!(ids(&sync), vec!["m1"]);
}

/*
    Obiettivo test: un newMessage di una conversazione diversa da quella
    aperta viene ignorato (variante filtrata per peer). Verrà recuperato
    dallo snapshot quando quella conversazione sarà aperta.
*/
#[test]
fn push_from_other_conversation_is_ignored() {
    let mut sync = ConversationSync::new(ME, PEER);
    sync.apply_snapshot(vec![msg("m1", ME, PEER, "hi")]);

    assert!(!sync.apply_event(&WsEvent::NewMessage(msg("x1", OTHER, ME, "psst"))));
    assert!(!sync.apply_event(&WsEvent::NewMessage(msg("x2", ME, OTHER, "psst"))));
    assert_eq!(ids(&sync), vec!["m1"]);
}

/*
    Obiettivo test: messageRead aggiorna lo stato del record corrispondente;
    un id sconosciuto è un no-op; ripetere l'evento non cambia più nulla.
*/
#[test]
fn message_read_updates_matching_record() {
    let mut sync = ConversationSync::new(ME, PEER);
    sync.apply_snapshot(vec![msg("m1", ME, PEER, "hi"), msg("m2", ME, PEER, "you there?")]);

    assert!(sync.apply_event(&WsEvent::MessageRead("m1".to_string())));
    assert_eq!(sync.messages()[0].status, MessageStatus::Read);
    assert_eq!(sync.messages()[1].status, MessageStatus::Sent);

    // id sconosciuto: no-op
    assert!(!sync.apply_event(&WsEvent::MessageRead("nope".to_string())));
    // già letto: no-op
    assert!(!sync.apply_event(&WsEvent::MessageRead("m1".to_string())));
    assert_eq!(sync.messages()[0].status, MessageStatus::Read);
}

/*
    Obiettivo test: nessuna sequenza di eventi riporta un messaggio letto a
    `sent`: anche un newMessage duplicato con status sent non sovrascrive
    il record già letto.
*/
#[test]
fn read_status_is_monotone() {
    let mut sync = ConversationSync::new(ME, PEER);
    let original = msg("m1", ME, PEER, "hi");
    sync.apply_snapshot(vec![original.clone()]);
    sync.apply_event(&WsEvent::MessageRead("m1".to_string()));

    // replay del push originale (status sent): deduplicato, non retrocede
    assert!(!sync.apply_event(&WsEvent::NewMessage(original)));
    assert_eq!(sync.messages()[0].status, MessageStatus::Read);
}

/*
    Obiettivo test: lo snapshot sostituisce per intero lo stato locale
    (è il meccanismo di recupero dei push persi alla riapertura).
*/
#[test]
fn snapshot_replaces_local_state() {
    let mut sync = ConversationSync::new(ME, PEER);
    sync.apply_snapshot(vec![msg("m1", ME, PEER, "hi")]);
    sync.apply_event(&WsEvent::NewMessage(msg("m2", PEER, ME, "hey")));

    sync.apply_snapshot(vec![
        msg("m1", ME, PEER, "hi"),
        msg("m2", PEER, ME, "hey"),
        msg("m3", PEER, ME, "missed while offline"),
    ]);
    assert_eq!(ids(&sync), vec!["m1", "m2", "m3"]);
}

/*
    Obiettivo test: gli avvisi dei compiti non toccano la vista
    della conversazione.
*/
#[test]
fn assignment_notices_do_not_touch_conversation() {
    let mut sync = ConversationSync::new(ME, PEER);
    sync.apply_snapshot(vec![msg("m1", ME, PEER, "hi")]);

    let notice = WsEvent::NewAssignment(aula_core::AssignmentNotice {
        assignment_id: "a1".to_string(),
        title: "Compito".to_string(),
        creator: "Prof".to_string(),
    });
    assert!(!sync.apply_event(&notice));
    assert_eq!(ids(&sync), vec!["m1"]);
}
