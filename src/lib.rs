// The binary is the deliverable; the library surface exists for integration tests.
pub mod ai_gateway;
pub mod cli;
pub mod config;
pub mod logging;
pub mod server;
pub mod stylist;
