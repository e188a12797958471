pub mod auth;
pub mod chats;
pub mod health;
pub mod resources;
pub mod users;

pub use health::health_check;
