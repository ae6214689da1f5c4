//! Seekable reader trait and implementations
//!
//! Both container scanners take their input through this trait so that
//! files, buffered files and in-memory buffers are interchangeable.

use std::io::{Read, Seek};

/// Trait for readers that can both read and seek
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
