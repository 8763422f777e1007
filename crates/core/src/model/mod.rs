mod field;
mod function;
mod ids;
mod level;
mod module;
mod quiz;
mod user;

pub use field::{FieldError, LONG_TEXT_MAX, SHORT_TEXT_MAX};
pub use ids::{FunctionId, ModuleId, ParseIdError, UserId};

pub use function::{Function, FunctionError};
pub use level::{Level, POINTS_PER_LEVEL};
pub use module::{Module, ModuleError};
pub use quiz::{CHOICES_PER_QUESTION, Question, QuizItem, QuizItemError, SAMPLE_CODE_PROMPT};
pub use user::{User, UserError};
