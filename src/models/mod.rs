pub mod jobs;
pub mod orders;
pub mod proposals;
pub mod reviews;
pub mod users;
