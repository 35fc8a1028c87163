//! SQLite storage for questionnaire answers.

mod model;
mod repository;

pub use model::UserAnswersDB;
pub use repository::AnswersRepository;
