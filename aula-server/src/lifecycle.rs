//! Orchestrazione persist → notify per messaggi e compiti.
//!
//! La notifica segue sempre una persistenza riuscita, mai il contrario:
//! un fallimento dello store esce come errore senza che nessun client veda
//! un messaggio fantasma. Il fallimento della notifica invece non è un
//! errore (vedi notify): il client recupera dal prossimo fetch.

use aula_core::{
    new_id, now_timestamp, Assignment, AssignmentNotice, CreateAssignmentRequest,
    EditMessageRequest, Grade, GradeNotice, GradeSubmissionRequest, Message, MessageStatus,
    SendMessageRequest, SubmissionNotice, SubmitAssignmentRequest, Submission, User, WsEvent,
};

use crate::{error::ApiError, notify::notify, store, AppState};

/// Invio di un messaggio diretto: valida, persiste, poi notifica il
/// destinatario con il record canonico (id, timestamp e stato del server).
pub async fn send_message(
    state: &AppState,
    sender: &User,
    receiver_id: &str,
    req: SendMessageRequest,
) -> Result<Message, ApiError> {
    let message = store::messages::create_message(
        &state.pool,
        &sender.user_id,
        receiver_id,
        req.text,
        req.image,
        req.is_urgent,
    )
    .await?;

    notify(
        &state.registry,
        receiver_id,
        &WsEvent::NewMessage(message.clone()),
    );
    Ok(message)
}

/// Ricevuta di lettura. Idempotente: rimarcare un messaggio già letto
/// restituisce il record invariato e NON rinotifica il mittente; la
/// notifica parte solo se questa chiamata ha davvero fatto la transizione
/// `sent -> read`.
pub async fn mark_read(state: &AppState, message_id: &str) -> Result<Message, ApiError> {
    let current = store::messages::get_message(&state.pool, message_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("message {} not found", message_id)))?;

    if current.status == MessageStatus::Read {
        return Ok(current);
    }

    let updated = store::messages::set_status(&state.pool, message_id, MessageStatus::Read).await?;
    notify(
        &state.registry,
        &updated.sender_id,
        &WsEvent::MessageRead(updated.message_id.clone()),
    );
    Ok(updated)
}

/// Modifica di un messaggio: solo store, nessun push (il flusso live copre
/// soltanto newMessage e messageRead).
pub async fn edit_message(
    state: &AppState,
    message_id: &str,
    req: EditMessageRequest,
) -> Result<Message, ApiError> {
    store::messages::edit_message(&state.pool, message_id, req.text, req.image, req.is_urgent).await
}

/// Rimozione di un messaggio: solo store, nessun push.
pub async fn delete_message(state: &AppState, message_id: &str) -> Result<(), ApiError> {
    store::messages::delete_message(&state.pool, message_id).await
}

/// Creazione di un compito: valida, persiste, poi avvisa ogni assegnatario
/// connesso con un notice compatto.
pub async fn create_assignment(
    state: &AppState,
    creator: &User,
    req: CreateAssignmentRequest,
) -> Result<Assignment, ApiError> {
    if req.title.trim().is_empty()
        || req.description.trim().is_empty()
        || req.due_date.trim().is_empty()
        || req.assigned_to.is_empty()
    {
        return Err(ApiError::Validation("missing required fields".to_string()));
    }

    let assignment = Assignment {
        assignment_id: new_id(),
        creator_id: creator.user_id.clone(),
        title: req.title,
        description: req.description,
        due_date: req.due_date,
        assigned_to: req.assigned_to,
        attachments: req.attachments,
        submissions: Vec::new(),
        created_at: now_timestamp(),
    };
    store::assignments::create_assignment(&state.pool, &assignment).await?;

    for user_id in &assignment.assigned_to {
        notify(
            &state.registry,
            user_id,
            &WsEvent::NewAssignment(AssignmentNotice {
                assignment_id: assignment.assignment_id.clone(),
                title: assignment.title.clone(),
                creator: creator.full_name.clone(),
            }),
        );
    }
    Ok(assignment)
}

/// Consegna di uno studente: 403 se non assegnatario, 400 se ha già
/// consegnato; persiste e poi avvisa il creatore del compito.
pub async fn submit_assignment(
    state: &AppState,
    student: &User,
    assignment_id: &str,
    req: SubmitAssignmentRequest,
) -> Result<Assignment, ApiError> {
    if req.content.trim().is_empty() {
        return Err(ApiError::Validation("content is required".to_string()));
    }

    let assignment = store::assignments::get_assignment(&state.pool, assignment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("assignment {} not found", assignment_id)))?;

    if !assignment.is_assigned_to(&student.user_id) {
        return Err(ApiError::Forbidden(
            "you are not assigned to this assignment".to_string(),
        ));
    }
    if assignment.submission_by_user(&student.user_id).is_some() {
        return Err(ApiError::Validation(
            "you have already submitted this assignment".to_string(),
        ));
    }

    let submission = Submission {
        submission_id: new_id(),
        user_id: student.user_id.clone(),
        content: req.content,
        attachments: req.attachments,
        submitted_at: now_timestamp(),
        grade: None,
    };
    store::assignments::add_submission(&state.pool, assignment_id, &submission).await?;

    notify(
        &state.registry,
        &assignment.creator_id,
        &WsEvent::NewSubmission(SubmissionNotice {
            assignment_id: assignment.assignment_id.clone(),
            title: assignment.title.clone(),
            student: student.full_name.clone(),
        }),
    );

    let mut assignment = assignment;
    assignment.submissions.push(submission);
    Ok(assignment)
}

/// Valutazione di una consegna: solo il creatore del compito può farlo;
/// persiste il voto e poi avvisa lo studente.
pub async fn grade_submission(
    state: &AppState,
    grader: &User,
    assignment_id: &str,
    submission_id: &str,
    req: GradeSubmissionRequest,
) -> Result<Assignment, ApiError> {
    let assignment = store::assignments::get_assignment(&state.pool, assignment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("assignment {} not found", assignment_id)))?;

    if assignment.creator_id != grader.user_id {
        return Err(ApiError::Forbidden(
            "only the creator can grade submissions".to_string(),
        ));
    }

    let student_id = assignment
        .submissions
        .iter()
        .find(|s| s.submission_id == submission_id)
        .map(|s| s.user_id.clone())
        .ok_or_else(|| ApiError::NotFound(format!("submission {} not found", submission_id)))?;

    let grade = Grade {
        score: req.score,
        feedback: req.feedback,
        graded_at: now_timestamp(),
    };
    store::assignments::grade_submission(&state.pool, assignment_id, submission_id, &grade).await?;

    notify(
        &state.registry,
        &student_id,
        &WsEvent::SubmissionGraded(GradeNotice {
            assignment_id: assignment.assignment_id.clone(),
            title: assignment.title.clone(),
            score: grade.score,
        }),
    );

    // rilettura per restituire il documento con il voto applicato
    store::assignments::get_assignment(&state.pool, assignment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("assignment {} not found", assignment_id)))
}
