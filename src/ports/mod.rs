//! Port traits: the seams between the indicator core and its collaborators.

pub mod canvas_port;
pub mod chart_port;
pub mod config_port;
pub mod data_port;
