//! This crate turns the Vulkan XML registry and a directory of layer manifests
//! into plain-text lists of the extensions and instance layers that a Vulkan
//! 1.2 loader configuration should enable.
//!
//! The entry points are [`extensions::run`] and [`layers::run`]. Both report
//! progress through a [`Logger`], which the `vk-lists` binary backs with
//! `result_log.txt`.

#[cfg(feature = "serialize")]
#[macro_use]
extern crate serde_derive;

pub mod clean;
pub mod config;
mod elements;
pub mod extensions;
pub mod filter;
pub mod layers;
mod lines;
pub mod log;
mod output;
mod types;

pub use config::Config;
pub use log::{Logger, MemoryLog, ResultLog};
pub use types::*;
