pub mod content_validator;
pub mod quiz_generator;
pub mod text_extractor;

pub use content_validator::ContentValidator;
pub use quiz_generator::{LlmQuizGenerator, QuizProducer};
pub use text_extractor::{DocFormat, TextExtractor};
