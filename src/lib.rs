// src/lib.rs

pub mod admin;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod listing;
pub mod markdown;
pub mod models;
pub mod paging;
pub mod render;
pub mod server;
pub mod session;
pub mod tags;
