//! Unit tests for the application services, run against hand-written port
//! fakes and a temp directory.

mod architecture;
mod config_store;
mod node_config_service;
mod property_tests;
mod service_control;
mod snapshot_service;
mod status_service;
