mod chats;
mod prompts;
mod resources;
mod sentiments;
mod users;

pub use chats::ChatRepository;
pub use prompts::PromptRepository;
pub use resources::{FaqRepository, ResourceRepository};
pub use sentiments::SentimentRepository;
pub use users::{TokenRepository, UserRepository};
