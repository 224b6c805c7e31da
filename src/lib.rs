// src/lib.rs

pub mod handlers;
pub mod hardforks;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_frames;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
