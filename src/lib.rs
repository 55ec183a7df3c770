#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::missing_crate_level_docs)]
#![doc = include_str!("../README.md")]

pub mod generator;
pub mod meta;
pub mod settings;
pub mod signature;
pub mod source;
pub mod translate;
