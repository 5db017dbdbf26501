pub mod domain;

pub use domain::{UserId, UserRecord};
