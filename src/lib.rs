#![doc = "The `taskvault` library crate."]
#![doc = ""]
#![doc = "This crate contains the business logic, domain models, authentication"]
#![doc = "mechanisms, persistence adapters, routing configuration, and error handling"]
#![doc = "for the TaskVault application. It is used by the main binary (`main.rs`)"]
#![doc = "to construct and run the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod response;
pub mod routes;
pub mod services;
pub mod validation;
