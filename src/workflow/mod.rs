pub mod quiz_flow;
pub mod submission;

pub use quiz_flow::{Phase, QuizFlow, ReviewRow};
pub use submission::Submission;
