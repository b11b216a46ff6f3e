#![doc = "The `taskflow` library crate."]
#![doc = ""]
#![doc = "Domain models, storage, authentication, task operations, routing and error"]
#![doc = "handling for the TaskFlow API. The binary (`main.rs`) wires these into an"]
#![doc = "actix-web server."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod tasks;

pub use crate::config::Config;
pub use crate::error::AppError;
