//! Decompression for compressed PNG text
//!
//! This module implements strategies for the compression methods a zTXt
//! chunk can declare.

mod handler;
mod deflate;
mod factory;
mod inflate;

pub use handler::CompressionHandler;
pub use deflate::DeflateHandler;
pub use factory::CompressionFactory;
pub use inflate::InflateBuffer;
