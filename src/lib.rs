//! plotline: chart indicator series and the renderers that paint them.
//!
//! Hexagonal architecture: indicator math, attachment and renderers in
//! [`domain`], port traits in [`ports`], concrete implementations in
//! [`adapters`], command-line front end in [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
