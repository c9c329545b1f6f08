//! sea-orm entities, one per collection. There are no foreign keys: an
//! enrollment, request or progress row may name a user or course that no
//! longer exists.

pub mod access_request;
pub mod course;
pub mod enrollment;
pub mod progress;
pub mod user;
