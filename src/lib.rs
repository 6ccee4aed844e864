#![recursion_limit = "256"]

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod validation;
