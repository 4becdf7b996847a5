pub mod dispatcher;
pub mod http;
pub mod sinks;
pub mod status;
