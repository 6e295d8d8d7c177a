pub mod quiz;
pub mod user;

pub use quiz::{Question, QuestionOption, Quiz};
pub use user::User;
