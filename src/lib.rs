//! staticd - Minimal concurrent static file server
//!
//! Core library for request parsing, routing, and static file serving.

pub mod config;
pub mod http;
pub mod server;
