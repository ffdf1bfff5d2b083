use serde::Deserialize;
use validator::Validate;

/// Editable part of an author profile
#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::ToSchema)]
#[serde(default)]
pub(crate) struct ProfileForm {
    #[validate(length(max = 2000, message = "Must have at most 2000 characters."))]
    #[schema(max_length = 2000)]
    pub(crate) bio: String,
}
