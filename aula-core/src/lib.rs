//! aula-core: tipi condivisi tra client e server (modelli, DTO HTTP, eventi WS,
//! errori) più la riconciliazione client-side della conversazione aperta.
//! Niente I/O o dipendenze non compatibili con WASM.

pub mod models;
pub mod protocol;
pub mod error;
pub mod sync;
pub mod utils;

// Re-export utili per ridurre i percorsi nei crate client/server
pub use error::Error;
pub use models::{
    assignment::{Assignment, FileRef, Grade, Submission},
    message::{Message, MessageStatus},
    user::User,
};
pub use protocol::ws::{
    AssignmentNotice, Authenticate, GradeNotice, SubmissionNotice, WsCommand, WsEvent,
};
pub use protocol::http::{
    CreateAssignmentRequest, DeleteMessageResponse, EditMessageRequest, GradeSubmissionRequest,
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, SendMessageRequest,
    SubmitAssignmentRequest,
};
pub use sync::ConversationSync;
pub use utils::{new_id, now_timestamp};
