mod chat;
mod resource;
mod user;

pub use chat::*;
pub use resource::*;
pub use user::*;
