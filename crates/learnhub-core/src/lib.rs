pub mod access;
pub mod course;
pub mod error;
pub mod progress;
pub mod stats;
pub mod user;

pub use access::{
    AccessEvent, AccessRequest, AccessState, Enrollment, StudentCourse, TransitionError,
};
pub use course::{
    Course, CourseFilter, CourseModule, CourseStatus, CourseUpdate, Material, NewCourse, Video,
};
pub use error::CoreError;
pub use progress::{NextVideo, ProgressSummary, WatchedVideos};
pub use stats::DashboardStats;
pub use user::{
    CreateUser, Credentials, NewUser, PasswordReset, Role, User, UserStatus, UserUpdate,
    validate_email,
};
