//! Account forms sent to the auth routes.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Role selectable at registration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Management,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Management => "management",
            Role::Staff => "staff",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "management" => Ok(Role::Management),
            "staff" => Ok(Role::Staff),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

/// Login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Registration form. `confirm_password` never leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
    pub role: Role,
}

impl Registration {
    /// The only checks made before the form is posted.
    pub fn validate(&self) -> DomainResult<()> {
        if self.password.is_empty() {
            return Err(DomainError::validation("Password cannot be empty"));
        }
        if self.password != self.confirm_password {
            return Err(DomainError::validation("Passwords do not match"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordReset {
    pub new_password: String,
}

/// Partial profile update; absent fields are left unchanged by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(password: &str, confirm: &str) -> Registration {
        Registration {
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            role: Role::Staff,
        }
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let err = registration("secret", "secreT").validate().unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn empty_password_is_rejected() {
        let err = registration("", "").validate().unwrap_err();
        assert_eq!(err, DomainError::validation("Password cannot be empty"));
    }

    #[test]
    fn confirmation_is_not_serialized() {
        let body = serde_json::to_value(registration("secret", "secret")).unwrap();
        assert_eq!(body["role"], "staff");
        assert!(body.get("confirm_password").is_none());
    }

    #[test]
    fn role_parsing() {
        assert_eq!("Management".parse::<Role>().unwrap(), Role::Management);
        assert!(matches!("owner".parse::<Role>(), Err(DomainError::InvalidRole(r)) if r == "owner"));
    }

    #[test]
    fn profile_update_skips_absent_fields() {
        let update = ProfileUpdate {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, serde_json::json!({ "email": "new@example.com" }));
        assert!(ProfileUpdate::default().is_empty());
    }
}
