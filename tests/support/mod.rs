#![allow(dead_code)]

pub mod app;
pub mod in_memory;

pub use app::{TestApp, TestResponse};
