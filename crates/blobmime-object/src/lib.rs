#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod client;
pub mod memory;
/// Client trait and storage provider factories.
pub mod providers;
/// Shared types (Error).
pub mod types;

#[doc(hidden)]
pub mod prelude;

/// Tracing target for container operations.
pub const TRACING_TARGET: &str = "blobmime_object";
