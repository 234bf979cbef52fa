pub mod user;
pub mod message;
pub mod assignment;

// Re-export per comodità
pub use user::User;
pub use message::{Message, MessageStatus};
pub use assignment::{Assignment, FileRef, Grade, Submission};
