pub mod agent;
pub mod error;
pub mod routes;
