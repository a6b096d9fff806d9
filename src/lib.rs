pub mod config;
pub mod extract;
pub mod fetch;
pub mod matcher;
pub mod scan;
pub mod store;
