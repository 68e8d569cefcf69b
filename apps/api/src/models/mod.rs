pub mod college;
pub mod user;
