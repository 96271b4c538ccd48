//! Common utilities and shared types for alumnet.
//!
//! This crate provides foundational components used across all alumnet crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Pagination**: The fixed-size page envelope via [`Page`]
//!
//! # Example
//!
//! ```no_run
//! use alumnet_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod page;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use page::{Page, PageQuery, PAGE_SIZE};
