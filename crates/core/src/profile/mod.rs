//! Profile module - questionnaire answers and the user risk scorer.

mod profile_model;
mod profile_service;
mod profile_traits;

pub use profile_model::{RiskCategory, UserRiskProfile, ANSWER_COUNT, MAX_GRADE};
pub use profile_service::{
    heuristic_level, level_from_output, ScorerReport, UserRiskScorer, MAX_RISK_LEVEL,
};
pub use profile_traits::UserAnswersSourceTrait;
