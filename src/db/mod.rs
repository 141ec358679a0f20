pub mod applicationdb;
pub mod companydb;
pub mod db;
pub mod jobdb;
pub mod positiondb;
pub mod schema;
pub mod userdb;

pub use db::DBClient;
