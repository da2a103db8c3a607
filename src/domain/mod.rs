//! Core domain types and logic.

pub mod alignment;
pub mod attachment;
pub mod bar;
pub mod error;
pub mod indicator;
pub mod indicator_config;
pub mod offset;
pub mod render;
