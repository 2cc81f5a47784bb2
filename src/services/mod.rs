pub mod connect;
pub mod pinpoint;
