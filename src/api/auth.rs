use serde::Deserialize;
use uuid::Uuid;

use super::ApiErrors;

// struct representing the authorized caller, deserializable from JWT claims
#[derive(Debug, Deserialize, Clone)]
pub(crate) struct User {
    sub: String,
    #[serde(default)]
    preferred_username: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl User {
    /// The subject claim as author id. Tokens with a non-uuid subject cannot
    /// author recipes.
    pub(crate) fn author_id(&self) -> Result<Uuid, ApiErrors> {
        Uuid::parse_str(&self.sub).map_err(|_| ApiErrors::PermissionDenied)
    }

    pub(crate) fn preferred_username(&self) -> String {
        self.preferred_username
            .clone()
            .unwrap_or_else(|| self.sub.clone())
    }

    pub(crate) fn given_name(&self) -> &str {
        self.given_name.as_deref().unwrap_or_default()
    }

    pub(crate) fn family_name(&self) -> &str {
        self.family_name.as_deref().unwrap_or_default()
    }

    pub(crate) fn email(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }

    pub(crate) fn name_and_sub(&self) -> String {
        format!("{} ({})", self.preferred_username(), self.sub)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_claims() {
        // Arrange
        let claims = json!({
            "sub": "8d5f6c5e-3a43-4a3c-9d4a-1b2f3c4d5e6f",
            "preferred_username": "maria",
            "given_name": "Maria",
            "iss": "https://sso.example.com"
        });

        // Act
        let user: User = serde_json::from_value(claims).unwrap();

        // Assert
        assert!(user.author_id().is_ok());
        assert_eq!(user.preferred_username(), "maria");
        assert_eq!(user.given_name(), "Maria");
        assert_eq!(user.family_name(), "");
        assert_eq!(
            user.name_and_sub(),
            "maria (8d5f6c5e-3a43-4a3c-9d4a-1b2f3c4d5e6f)"
        );
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let user: User = serde_json::from_value(json!({ "sub": "service-account" })).unwrap();
        assert_eq!(user.author_id(), Err(ApiErrors::PermissionDenied));
        assert_eq!(user.preferred_username(), "service-account");
    }
}
