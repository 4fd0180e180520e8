// src/lib.rs
// gemchat - minimal Gemini chat server, web page and terminal client

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod session;
pub mod web;

pub use error::{ChatError, Result};
