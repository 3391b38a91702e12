//! GIF flavored LZW compression.
//!
//! This crate provides the compression half of the GIF image data pipeline:
//! an LZW encoder using variable code size (growing from `code_size + 1` up to 12 bits),
//! clear codes when the dictionary is full, and an end of information code,
//! a bit packer writing codes least significant bit first,
//! and the sub-block framing GIF wraps around the packed bytes.
//!
//! # Examples
//!
//! ```
//! use gifenc_lzw::{block::blockify, encoder::GifStyleEncoder};
//!
//! let data = [0, 0, 1, 3];
//!
//! let compressed = GifStyleEncoder::encode_to_vec(&data, 2).unwrap();
//! assert_eq!(compressed, [0x04, 0x32, 0x05]);
//!
//! let blocks = blockify(&compressed);
//! assert_eq!(blocks, [0x03, 0x04, 0x32, 0x05, 0x00]);
//! ```

pub mod block;
#[cfg(test)]
mod decoder;
pub mod encoder;
pub mod packer;

/// Largest code width, in bits, a GIF code stream may use.
pub const MAX_CODE_WIDTH: u8 = 12;

/// Number of entries after which the dictionary is full and must be cleared.
pub const MAX_DICTIONARY_LEN: usize = 1 << MAX_CODE_WIDTH;

/// Smallest minimum code size the GIF format accepts.
pub const MIN_CODE_SIZE: u8 = 2;

/// Largest minimum code size: palette indices are bytes.
pub const MAX_CODE_SIZE: u8 = 8;

/// Clear code for a given minimum code size.
#[inline]
pub const fn clear_code(code_size: u8) -> u16 {
    1 << code_size
}

/// End of information code for a given minimum code size.
#[inline]
pub const fn end_code(code_size: u8) -> u16 {
    (1 << code_size) + 1
}
