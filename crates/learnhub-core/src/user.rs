use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Who a user is on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            other => Err(CoreError::InvalidRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status. Self-registered students start inactive and become active
/// on their first enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, UserStatus::Active)
    }
}

impl FromStr for UserStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            other => Err(CoreError::InvalidUserStatus(other.to_string())),
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user as exposed by the API. The password hash never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account fields supplied on registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_email(&self.email)?;
        require("password", &self.password)?;
        require("name", &self.name)?;
        require("phone", &self.phone)?;
        Ok(())
    }
}

/// Admin-created account; unlike registration the status may be chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[serde(flatten)]
    pub account: NewUser,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

/// Partial user update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(password) = &self.password {
            require("password", password)?;
        }
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        if let Some(phone) = &self.phone {
            require("phone", phone)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Password reset proven only by knowing the phone number on file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub email: String,
    pub phone: String,
    pub new_password: String,
}

impl PasswordReset {
    pub fn validate(&self) -> Result<(), CoreError> {
        require("email", &self.email)?;
        require("phone", &self.phone)?;
        require("newPassword", &self.new_password)?;
        Ok(())
    }
}

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::MissingField(field));
    }
    Ok(())
}

/// Loose shape check: a non-empty local part and domain around a single `@`.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    require("email", email)?;
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(CoreError::InvalidEmail(email.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            password: "secret".into(),
            name: "Ada".into(),
            phone: "555-0100".into(),
            role: None,
        }
    }

    #[rstest]
    #[case("student", Role::Student)]
    #[case("admin", Role::Admin)]
    fn role_parses_from_wire_name(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>().unwrap(), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "banned".parse::<UserStatus>().unwrap_err();
        assert_eq!(err, CoreError::InvalidUserStatus("banned".into()));
    }

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("", false)]
    #[case("ada", false)]
    #[case("@example.com", false)]
    #[case("ada@", false)]
    #[case("a@b@c", false)]
    fn email_shape(#[case] email: &str, #[case] ok: bool) {
        assert_eq!(validate_email(email).is_ok(), ok);
    }

    #[test]
    fn blank_fields_fail_validation() {
        let mut user = new_user("ada@example.com");
        assert!(user.validate().is_ok());

        user.phone = "  ".into();
        assert_eq!(user.validate(), Err(CoreError::MissingField("phone")));
    }

    #[test]
    fn create_user_flattens_account_fields() {
        let json = r#"{"email":"a@b.c","password":"p","name":"n","phone":"1","status":"inactive"}"#;
        let parsed: CreateUser = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.account.email, "a@b.c");
        assert_eq!(parsed.account.role, None);
        assert_eq!(parsed.status, Some(UserStatus::Inactive));
    }

    #[test]
    fn password_reset_uses_camel_case() {
        let json = r#"{"email":"a@b.c","phone":"1","newPassword":"x"}"#;
        let parsed: PasswordReset = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.new_password, "x");
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(UserUpdate::default().validate().is_ok());
        let bad = UserUpdate {
            email: Some("nope".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn update_rejects_blank_phone() {
        let update = UserUpdate {
            phone: Some("".into()),
            ..Default::default()
        };
        assert_eq!(update.validate(), Err(CoreError::MissingField("phone")));
    }
}
