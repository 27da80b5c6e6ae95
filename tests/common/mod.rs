#![allow(dead_code)]

pub mod app;
pub mod factory;

pub use app::{failing_server, test_config, TestApp};
pub use factory::Factory;
