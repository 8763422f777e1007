#![forbid(unsafe_code)]

pub mod generator;
pub mod model;

pub use generator::{QuestionError, generate_question};
