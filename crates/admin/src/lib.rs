//! Storekeep admin library.
//!
//! Configuration and bootstrap layer for the store's admin backend:
//!
//! - [`config`] - Environment-driven settings (HTTP, sessions, bootstrap values)
//! - [`middleware`] - Port normalization, SSL assumption, request IDs, sessions, auth
//! - [`bootstrap`] - Idempotent seeding of the store record and first administrator
//! - [`routes`] - Sign-in/sign-out with redirect hooks, landing page, health checks
//! - [`db`] - Record storage (`PostgreSQL` and in-memory)
//!
//! The `storekeep-admin` binary serves [`server::build_app`]; the seeder and
//! migrations run from `sk-cli`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;
pub mod urls;
