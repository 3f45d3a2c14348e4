//! Schoolsite - a small school website with a password-gated admin panel
//!
//! Public pages show the teaching staff, news and school figures; the admin
//! panel edits them.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod theme;
