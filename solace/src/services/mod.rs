mod auth;
mod conversation;

pub use auth::AuthService;
pub use conversation::{ConversationService, PromptSubmission};
