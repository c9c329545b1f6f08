use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unknown role: {0}")]
    InvalidRole(String),
    #[error("unknown user status: {0}")]
    InvalidUserStatus(String),
    #[error("unknown course status: {0}")]
    InvalidCourseStatus(String),
    #[error("unknown access state: {0}")]
    InvalidAccessState(String),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        insta::assert_snapshot!(CoreError::InvalidRole("owner".into()).to_string(), @"unknown role: owner");
        insta::assert_snapshot!(CoreError::MissingField("title").to_string(), @"missing required field: title");
    }
}
