//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod linear_space;
pub mod memory_chart;
pub mod svg_canvas;
pub mod svg_chart;
