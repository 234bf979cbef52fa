use anyhow::Result;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use aula_core::{
    new_id, now_timestamp, CreateAssignmentRequest, GradeSubmissionRequest,
    SubmitAssignmentRequest, User, WsEvent,
};
use aula_server::registry::ConnectionRegistry;
use aula_server::{
    connect_pool, error::ApiError, lifecycle, run_migrations, sqlite_url_for_path, store, AppState,
};

async fn test_state(td: &TempDir) -> Result<Arc<AppState>> {
    let url = sqlite_url_for_path(td.path().join("aula.db").as_path())?;
    let pool = connect_pool(&url).await?;
    run_migrations(&pool).await?;
    Ok(Arc::new(AppState {
        pool,
        registry: ConnectionRegistry::new(),
    }))
}

async fn make_user(state: &AppState, full_name: &str) -> Result<User> {
    let user = User {
        user_id: new_id(),
        full_name: full_name.to_string(),
        profile_pic: None,
        created_at: now_timestamp(),
    };
    store::users::insert_user(&state.pool, &user, "hash", &new_id()).await?;
    Ok(user)
}

fn bind_channel(state: &AppState, user: &User) -> UnboundedReceiver<String> {
    let (tx, rx) = unbounded_channel::<String>();
    state.registry.bind(&user.user_id, tx);
    rx
}

fn next_event(rx: &mut UnboundedReceiver<String>) -> WsEvent {
    let raw = rx.try_recv().expect("expected a pushed event");
    serde_json::from_str(&raw).expect("valid ws event json")
}

fn assignment_req(assigned_to: Vec<String>) -> CreateAssignmentRequest {
    CreateAssignmentRequest {
        title: "Esercizi capitolo 3".to_string(),
        description: "Tutti gli esercizi pari".to_string(),
        due_date: "2026-09-15T23:59:59Z".to_string(),
        assigned_to,
        attachments: vec![],
    }
}

fn submit_req(content: &str) -> SubmitAssignmentRequest {
    SubmitAssignmentRequest {
        content: content.to_string(),
        attachments: vec![],
    }
}

/*
    La creazione persiste il compito e avvisa ogni assegnatario connesso con
    un notice compatto (id, titolo, nome del creatore): la notifica segue
    la persistenza, gli offline recuperano dalla GET.
*/
#[tokio::test]
async fn create_assignment_notifies_each_connected_assignee() -> Result<()> {
    let td = TempDir::new()?;
    let state = test_state(&td).await?;
    let prof = make_user(&state, "Prof").await?;
    let s1 = make_user(&state, "S1").await?;
    let s2 = make_user(&state, "S2").await?;
    let s3 = make_user(&state, "S3 offline").await?;
    let mut rx1 = bind_channel(&state, &s1);
    let mut rx2 = bind_channel(&state, &s2);

    let created = lifecycle::create_assignment(
        &state,
        &prof,
        assignment_req(vec![s1.user_id.clone(), s2.user_id.clone(), s3.user_id.clone()]),
    )
    .await?;

    for rx in [&mut rx1, &mut rx2] {
        match next_event(rx) {
            WsEvent::NewAssignment(notice) => {
                assert_eq!(notice.assignment_id, created.assignment_id);
                assert_eq!(notice.creator, prof.full_name);
            }
            other => panic!("expected newAssignment push, got {:?}", other),
        }
    }

    // S3 era offline: lo trova comunque nel listing
    let visible = store::assignments::list_for_user(&state.pool, &s3.user_id).await?;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].assignment_id, created.assignment_id);
    Ok(())
}

/*
    Campi obbligatori mancanti (assignedTo vuoto) → 400, nessun record.
*/
#[tokio::test]
async fn create_assignment_requires_assignees() -> Result<()> {
    let td = TempDir::new()?;
    let state = test_state(&td).await?;
    let prof = make_user(&state, "Prof").await?;

    let err = lifecycle::create_assignment(&state, &prof, assignment_req(vec![]))
        .await
        .expect_err("empty assignedTo must be rejected");
    assert!(matches!(err, ApiError::Validation(_)));

    let visible = store::assignments::list_for_user(&state.pool, &prof.user_id).await?;
    assert!(visible.is_empty());
    Ok(())
}

/*
    Consegna: solo un assegnatario può consegnare (403 altrimenti), la
    seconda consegna dello stesso studente è respinta con 400, e il
    creatore connesso riceve il notice newSubmission.
*/
#[tokio::test]
async fn submit_enforces_assignment_and_uniqueness() -> Result<()> {
    let td = TempDir::new()?;
    let state = test_state(&td).await?;
    let prof = make_user(&state, "Prof").await?;
    let student = make_user(&state, "Student").await?;
    let intruder = make_user(&state, "Intruder").await?;
    let mut prof_rx = bind_channel(&state, &prof);

    let created =
        lifecycle::create_assignment(&state, &prof, assignment_req(vec![student.user_id.clone()]))
            .await?;

    let err = lifecycle::submit_assignment(
        &state,
        &intruder,
        &created.assignment_id,
        submit_req("sono qui per caso"),
    )
    .await
    .expect_err("non-assignee must be rejected");
    assert!(matches!(err, ApiError::Forbidden(_)), "got {:?}", err);

    let after =
        lifecycle::submit_assignment(&state, &student, &created.assignment_id, submit_req("fatto"))
            .await?;
    assert_eq!(after.submissions.len(), 1);
    assert_eq!(after.submissions[0].user_id, student.user_id);
    assert!(after.submissions[0].grade.is_none());

    match next_event(&mut prof_rx) {
        WsEvent::NewSubmission(notice) => {
            assert_eq!(notice.assignment_id, created.assignment_id);
            assert_eq!(notice.student, student.full_name);
        }
        other => panic!("expected newSubmission push, got {:?}", other),
    }

    let err = lifecycle::submit_assignment(
        &state,
        &student,
        &created.assignment_id,
        submit_req("di nuovo"),
    )
    .await
    .expect_err("duplicate submission must be rejected");
    assert!(matches!(err, ApiError::Validation(_)), "got {:?}", err);
    Ok(())
}

/*
    Valutazione: solo il creatore può farlo (403 per chiunque altro); il
    voto viene persistito e lo studente connesso riceve submissionGraded.
*/
#[tokio::test]
async fn grading_is_creator_only_and_notifies_student() -> Result<()> {
    let td = TempDir::new()?;
    let state = test_state(&td).await?;
    let prof = make_user(&state, "Prof").await?;
    let student = make_user(&state, "Student").await?;

    let created =
        lifecycle::create_assignment(&state, &prof, assignment_req(vec![student.user_id.clone()]))
            .await?;
    let after =
        lifecycle::submit_assignment(&state, &student, &created.assignment_id, submit_req("fatto"))
            .await?;
    let submission_id = after.submissions[0].submission_id.clone();

    // lo studente non può valutare la propria consegna
    let err = lifecycle::grade_submission(
        &state,
        &student,
        &created.assignment_id,
        &submission_id,
        GradeSubmissionRequest {
            score: 30.0,
            feedback: String::new(),
        },
    )
    .await
    .expect_err("non-creator must not grade");
    assert!(matches!(err, ApiError::Forbidden(_)), "got {:?}", err);

    let mut student_rx = bind_channel(&state, &student);
    let graded = lifecycle::grade_submission(
        &state,
        &prof,
        &created.assignment_id,
        &submission_id,
        GradeSubmissionRequest {
            score: 27.5,
            feedback: "bene".to_string(),
        },
    )
    .await?;

    let grade = graded.submissions[0].grade.as_ref().expect("grade applied");
    assert_eq!(grade.score, 27.5);
    assert_eq!(grade.feedback, "bene");

    match next_event(&mut student_rx) {
        WsEvent::SubmissionGraded(notice) => {
            assert_eq!(notice.assignment_id, created.assignment_id);
            assert_eq!(notice.score, 27.5);
        }
        other => panic!("expected submissionGraded push, got {:?}", other),
    }
    Ok(())
}

/*
    Il listing mostra solo i compiti creati da o assegnati all'utente.
*/
#[tokio::test]
async fn listing_is_scoped_to_creator_or_assignee() -> Result<()> {
    let td = TempDir::new()?;
    let state = test_state(&td).await?;
    let prof = make_user(&state, "Prof").await?;
    let student = make_user(&state, "Student").await?;
    let outsider = make_user(&state, "Outsider").await?;

    let created =
        lifecycle::create_assignment(&state, &prof, assignment_req(vec![student.user_id.clone()]))
            .await?;

    for user in [&prof, &student] {
        let visible = store::assignments::list_for_user(&state.pool, &user.user_id).await?;
        assert_eq!(visible.len(), 1, "{} must see the assignment", user.full_name);
        assert_eq!(visible[0].assignment_id, created.assignment_id);
    }
    let visible = store::assignments::list_for_user(&state.pool, &outsider.user_id).await?;
    assert!(visible.is_empty(), "outsider must not see the assignment");
    Ok(())
}
