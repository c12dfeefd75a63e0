pub mod attribute;
pub mod core_api;
pub mod model;
pub mod position;
pub mod query;
pub mod remote;
pub mod save;
pub mod skills;
