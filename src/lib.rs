// ABOUTME: Public library API for exporting Qiita Team posts
// ABOUTME: Re-exports core modules for external use

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod frontmatter;
pub mod images;
pub mod logging;
pub mod model;
pub mod runner;
pub mod storage;

pub use error::{Error, Result};
pub use model::{Item, Post, Tag};
