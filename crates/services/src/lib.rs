#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod quiz_service;
pub mod user_service;

pub use app_services::AppServices;
pub use catalog_service::{CatalogService, FunctionDraft};
pub use error::{AppServicesError, CatalogServiceError, QuizServiceError, UserServiceError};
pub use quiz_service::{AnswerOutcome, POINTS_PER_CORRECT_ANSWER, QuizService};
pub use user_service::{Registration, UserService};
