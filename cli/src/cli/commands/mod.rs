pub mod check_config;
pub mod endpoints;
pub mod start;
pub mod status;
