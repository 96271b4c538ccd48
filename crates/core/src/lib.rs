//! Core business logic for alumnet.

pub mod services;

pub use services::*;
