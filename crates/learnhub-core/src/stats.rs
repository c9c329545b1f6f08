use serde::{Deserialize, Serialize};

use crate::course::{Course, CourseStatus};
use crate::user::{Role, User};

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: u64,
    pub active_students: u64,
    pub total_courses: u64,
    pub active_courses: u64,
    pub total_enrollments: u64,
    pub pending_requests: u64,
}

impl DashboardStats {
    /// Tally users and courses; enrollment and request counts come from the
    /// store directly.
    pub fn tally(
        users: &[User],
        courses: &[Course],
        total_enrollments: u64,
        pending_requests: u64,
    ) -> Self {
        let students = users.iter().filter(|u| u.role == Role::Student);
        let (total_students, active_students) =
            students.fold((0, 0), |(total, active), u| {
                (total + 1, active + u64::from(u.status.is_active()))
            });

        Self {
            total_students,
            active_students,
            total_courses: courses.len() as u64,
            active_courses: courses
                .iter()
                .filter(|c| c.status == CourseStatus::Active)
                .count() as u64,
            total_enrollments,
            pending_requests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::fixtures::course;
    use crate::user::UserStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: Role, status: UserStatus) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", Uuid::new_v4()),
            name: "n".into(),
            phone: "1".into(),
            role,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn admins_are_not_students() {
        let users = vec![
            user(Role::Student, UserStatus::Active),
            user(Role::Student, UserStatus::Inactive),
            user(Role::Admin, UserStatus::Active),
        ];
        let mut draft = course("Draft", vec![]);
        draft.status = CourseStatus::Draft;
        let courses = vec![course("Live", vec![]), draft];

        let stats = DashboardStats::tally(&users, &courses, 4, 2);
        assert_eq!(
            stats,
            DashboardStats {
                total_students: 2,
                active_students: 1,
                total_courses: 2,
                active_courses: 1,
                total_enrollments: 4,
                pending_requests: 2,
            }
        );
    }
}
