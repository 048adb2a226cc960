pub mod assessment;
pub mod user;
