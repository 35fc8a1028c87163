//! Risk module - tiers, heuristic labels and the trained classifier.

mod risk_classifier;
mod risk_labeler;
mod risk_model;

pub use risk_classifier::RiskClassifier;
pub use risk_labeler::{label, DIVIDEND_THRESHOLD};
pub use risk_model::{credit_rating, features, rating_for_grade, RiskTier, LOWEST_CREDIT_RATING};
