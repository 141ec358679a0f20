pub mod applications;
pub mod auth;
pub mod companies;
pub mod jobs;
pub mod payment;
pub mod positions;
pub mod users;
