use super::profile_model::UserRiskProfile;
use crate::errors::Result;

/// Read access to stored questionnaire answers.
pub trait UserAnswersSourceTrait: Send + Sync {
    /// Answers stored for `owner_key`, or `None` if the user has not answered.
    fn get(&self, owner_key: &str) -> Result<Option<UserRiskProfile>>;
}
