pub mod ws;
pub mod http;

// Re-export comodi
pub use ws::{AssignmentNotice, Authenticate, GradeNotice, SubmissionNotice, WsCommand, WsEvent};
pub use http::{
    CreateAssignmentRequest, DeleteMessageResponse, EditMessageRequest, GradeSubmissionRequest,
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, SendMessageRequest,
    SubmitAssignmentRequest,
};
