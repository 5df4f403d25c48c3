pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod session;

pub use client::{Downloader, ImageClient, ImageGenerator};
pub use config::GeneratorConfig;
pub use error::{GeneratorError, Result};
pub use models::*;
pub use session::Session;
