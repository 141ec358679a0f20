pub mod error;
pub mod files;
pub mod guard;
pub mod payment;
