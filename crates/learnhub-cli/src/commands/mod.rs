pub mod admin;
pub mod init;
pub mod schema;
pub mod serve;
pub mod status;

pub use admin::{
    cmd_approve, cmd_courses, cmd_enroll, cmd_progress, cmd_requests, cmd_stats, cmd_unenroll,
    cmd_users,
};
pub use init::cmd_init;
pub use schema::cmd_schema;
pub use serve::cmd_serve;
pub use status::cmd_status;
