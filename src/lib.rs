//! Blog CRUD backend with bearer-token authentication.
//!
//! Users register and log in with a username/password pair; a signed,
//! time-limited token then authorizes blog creation, updates and deletes.
//! Records live in SQLite, attached images on local disk under a
//! static-served directory.

pub mod app;
pub mod auth;
pub mod blogs;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod storage;
