//! Questionnaire answers and risk categories.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::risk::RiskTier;

/// Number of questionnaire answers.
pub const ANSWER_COUNT: usize = 4;

/// Highest grade a single answer may take.
pub const MAX_GRADE: u8 = 4;

/// A validated questionnaire response: four grades, each in `0..=4`.
///
/// Deserializes from either a plain array `[1, 2, 0, 4]` or the questionnaire
/// document `{"question_1": {"answer_grade": 1}, ...}`. Always serializes as
/// the array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAnswers", into = "Vec<u8>")]
pub struct UserRiskProfile {
    answers: [u8; ANSWER_COUNT],
}

impl UserRiskProfile {
    pub fn new(answers: &[i64]) -> std::result::Result<Self, ValidationError> {
        if answers.len() != ANSWER_COUNT {
            return Err(ValidationError::AnswerCount {
                expected: ANSWER_COUNT,
                actual: answers.len(),
            });
        }
        let mut grades = [0u8; ANSWER_COUNT];
        for (index, value) in answers.iter().enumerate() {
            grades[index] = u8::try_from(*value)
                .ok()
                .filter(|g| *g <= MAX_GRADE)
                .ok_or(ValidationError::AnswerOutOfRange {
                    index,
                    value: *value,
                })?;
        }
        Ok(Self { answers: grades })
    }

    /// Parses either accepted JSON shape.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn answers(&self) -> [u8; ANSWER_COUNT] {
        self.answers
    }

    pub fn as_features(&self) -> [f64; ANSWER_COUNT] {
        self.answers.map(f64::from)
    }
}

impl From<UserRiskProfile> for Vec<u8> {
    fn from(profile: UserRiskProfile) -> Self {
        profile.answers.to_vec()
    }
}

#[derive(Deserialize)]
struct AnswerGrade {
    answer_grade: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnswers {
    List(Vec<i64>),
    Questionnaire(BTreeMap<String, AnswerGrade>),
}

impl TryFrom<RawAnswers> for UserRiskProfile {
    type Error = ValidationError;

    fn try_from(raw: RawAnswers) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawAnswers::List(values) => UserRiskProfile::new(&values),
            RawAnswers::Questionnaire(mut questions) => {
                let mut values = Vec::with_capacity(ANSWER_COUNT);
                for n in 1..=ANSWER_COUNT {
                    let key = format!("question_{}", n);
                    let grade = questions
                        .remove(&key)
                        .ok_or(ValidationError::MissingField(key))?;
                    values.push(grade.answer_grade);
                }
                UserRiskProfile::new(&values)
            }
        }
    }
}

/// User-facing risk category of a portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    #[serde(rename = "Низкий")]
    Low,
    #[serde(rename = "Средний")]
    Medium,
    #[serde(rename = "Высокий")]
    High,
}

impl RiskCategory {
    /// Category for a scorer level. Level 3 is reachable through the clamp
    /// but has no category.
    pub fn from_level(level: u8) -> Result<Self> {
        match level {
            0 => Ok(RiskCategory::Low),
            1 => Ok(RiskCategory::Medium),
            2 => Ok(RiskCategory::High),
            other => Err(Error::UndefinedRiskLevel(other)),
        }
    }

    pub fn tier(&self) -> RiskTier {
        match self {
            RiskCategory::Low => RiskTier::Low,
            RiskCategory::Medium => RiskTier::Medium,
            RiskCategory::High => RiskTier::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Низкий",
            RiskCategory::Medium => "Средний",
            RiskCategory::High => "Высокий",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_format() {
        let profile = UserRiskProfile::from_json("[1, 2, 0, 4]").unwrap();
        assert_eq!(profile.answers(), [1, 2, 0, 4]);
        assert_eq!(serde_json::to_string(&profile).unwrap(), "[1,2,0,4]");
    }

    #[test]
    fn test_questionnaire_format() {
        let json = r#"{
            "question_1": {"answer_grade": 3},
            "question_2": {"answer_grade": 0},
            "question_3": {"answer_grade": 4},
            "question_4": {"answer_grade": 2}
        }"#;
        let profile = UserRiskProfile::from_json(json).unwrap();
        assert_eq!(profile.answers(), [3, 0, 4, 2]);
    }

    #[test]
    fn test_missing_question_is_rejected() {
        let json = r#"{
            "question_1": {"answer_grade": 3},
            "question_2": {"answer_grade": 0},
            "question_4": {"answer_grade": 2}
        }"#;
        let err = serde_json::from_str::<UserRiskProfile>(json).unwrap_err();
        assert!(err.to_string().contains("question_3"));
    }

    #[test]
    fn test_grades_outside_range_are_rejected() {
        assert!(matches!(
            UserRiskProfile::new(&[0, 5, 1, 1]),
            Err(ValidationError::AnswerOutOfRange { index: 1, value: 5 })
        ));
        assert!(matches!(
            UserRiskProfile::new(&[0, 1, -1, 1]),
            Err(ValidationError::AnswerOutOfRange { index: 2, value: -1 })
        ));
        assert!(matches!(
            UserRiskProfile::new(&[0, 1, 1]),
            Err(ValidationError::AnswerCount { expected: 4, actual: 3 })
        ));
        assert!(matches!(
            UserRiskProfile::from_json("[0, 1, 9, 1]"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(
            serde_json::to_string(&RiskCategory::Medium).unwrap(),
            "\"Средний\""
        );
        let back: RiskCategory = serde_json::from_str("\"Высокий\"").unwrap();
        assert_eq!(back, RiskCategory::High);
    }

    #[test]
    fn test_level_three_has_no_category() {
        assert_eq!(RiskCategory::from_level(0).unwrap(), RiskCategory::Low);
        assert_eq!(RiskCategory::from_level(2).unwrap().tier(), RiskTier::High);
        assert!(matches!(
            RiskCategory::from_level(3),
            Err(Error::UndefinedRiskLevel(3))
        ));
    }
}
