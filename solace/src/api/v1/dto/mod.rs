pub mod auth;
pub mod chat;
pub mod resources;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest, UpdateUserRequest, UserResponse};
pub use chat::{
    ChatResponse, PromptResponse, SentimentRangeQuery, SentimentResponse, SubmitPromptRequest,
    SubmitPromptResponse,
};
pub use resources::{CreateFaqRequest, CreateResourceRequest, FaqResponse, ResourceResponse};
