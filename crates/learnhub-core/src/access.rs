//! Course access: enrollments, pending requests and the state machine
//! linking them for a single (student, course) pair.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::CoreError;

/// Identifies one student's relation to one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct StudentCourse {
    pub student_id: Uuid,
    pub course_id: Uuid,
}

impl StudentCourse {
    pub fn new(student_id: Uuid, course_id: Uuid) -> Self {
        Self {
            student_id,
            course_id,
        }
    }
}

impl fmt::Display for StudentCourse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.student_id, self.course_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn pair(&self) -> StudentCourse {
        StudentCourse::new(self.student_id, self.course_id)
    }
}

/// A pending ask for course access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl AccessRequest {
    pub fn pair(&self) -> StudentCourse {
        StudentCourse::new(self.student_id, self.course_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum AccessState {
    #[default]
    None,
    Requested,
    Enrolled,
}

impl AccessState {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessState::None => "none",
            AccessState::Requested => "requested",
            AccessState::Enrolled => "enrolled",
        }
    }

    /// Derive the state from what the store holds for a pair. An enrollment
    /// wins over a leftover request.
    pub fn from_records(enrolled: bool, requested: bool) -> Self {
        match (enrolled, requested) {
            (true, _) => AccessState::Enrolled,
            (false, true) => AccessState::Requested,
            (false, false) => AccessState::None,
        }
    }

    /// Next state after `event`. Events that do not apply to the current
    /// state leave it unchanged, except approving without a pending request.
    pub fn apply(self, event: AccessEvent) -> Result<AccessState, TransitionError> {
        use AccessEvent::*;
        use AccessState::*;

        let next = match (self, event) {
            (None, Request) => Requested,
            (Requested | Enrolled, Request) => self,
            (Requested, Approve) => Enrolled,
            (None | Enrolled, Approve) => return Err(TransitionError::NoPendingRequest(self)),
            (Requested, Withdraw) => None,
            (None | Enrolled, Withdraw) => self,
            (_, Enroll) => Enrolled,
            (Enrolled, Unenroll) => None,
            (None | Requested, Unenroll) => self,
        };
        Ok(next)
    }
}

impl FromStr for AccessState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(AccessState::None),
            "requested" => Ok(AccessState::Requested),
            "enrolled" => Ok(AccessState::Enrolled),
            other => Err(CoreError::InvalidAccessState(other.to_string())),
        }
    }
}

impl fmt::Display for AccessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessEvent {
    /// Student asks for access.
    Request,
    /// Admin grants a pending request.
    Approve,
    /// Admin rejects, or the student withdraws, a pending request.
    Withdraw,
    /// Admin enrolls directly.
    Enroll,
    /// Admin revokes access.
    Unenroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("no pending request to approve (state: {0})")]
    NoPendingRequest(AccessState),
}
