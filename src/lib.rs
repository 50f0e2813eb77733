//! tinylink - A small URL shortener service
//!
//! Maps long URLs to short alphanumeric codes, persists the mapping and
//! redirects visitors.
//!
//! # Architecture
//! - `services`: the short-code registry (generation, uniqueness, CRUD, clicks)
//! - `storage`: `Storage` trait with JSON file and SeaORM backends
//! - `api`: HTTP handlers and admin authentication
//! - `config`: TOML + environment configuration
//! - `runtime`: HTTP server startup
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
