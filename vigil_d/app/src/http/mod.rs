pub mod host;
pub mod routes;
