//! labsite - Backend for a research lab website
//!
//! Blog posts, events, publications and website sections stored in SQL,
//! merged into news and highlight feeds, plus cached social media feeds,
//! all served as a JSON API.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
