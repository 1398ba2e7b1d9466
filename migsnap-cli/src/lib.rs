//! migsnap CLI library.
//!
//! Exposes the argument model, configuration and commands so the binary stays
//! a thin dispatcher.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
