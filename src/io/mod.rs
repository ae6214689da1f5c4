//! I/O utilities for stream handling
//!
//! This module provides the seekable reader abstraction, byte order
//! strategies and the lookahead cursor shared by both scanners.

pub mod seekable;
pub mod byte_order;
pub mod cursor;


pub use byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use cursor::{ByteCursor, CursorMark};
pub use seekable::SeekableReader;
