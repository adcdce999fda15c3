pub mod quiz;

pub use quiz::{QuizQuestion, QuizSession, ScoreSummary};
