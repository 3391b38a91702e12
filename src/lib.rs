//! An animated GIF89a encoder.
//!
//! Pixels are palette indices: a [Frame] is a rectangle of indices into either its own
//! local [ColorTable] or the global one. Frames are compressed with GIF flavored LZW (see
//! [gifenc_lzw]) and assembled into a GIF89a stream, either all at once with [Gif] or one
//! frame at a time with [GifStream].
//!
//! # Examples
//!
//! ```
//! use gifenc::{Color, ColorTable, Frame, Gif, GifConfig};
//!
//! let palette = ColorTable::with_colors([Color::WHITE, Color::BLACK]).unwrap();
//! let mut gif = Gif::new(2, 2, Some(palette), GifConfig::new());
//! gif.add_frame(Frame::with_pixels(2, 2, vec![0, 1, 1, 0]).unwrap()).unwrap();
//!
//! assert_eq!(
//!     gif.encode_to_vec().unwrap(),
//!     [
//!         b'G', b'I', b'F', b'8', b'9', b'a', // Header
//!         0x02, 0x00, 0x02, 0x00, 0x80, 0x00, 0x00, // Logical screen descriptor
//!         0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, // Global color table
//!         0x2C, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x02, 0x00, 0x00, // Image descriptor
//!         0x02, 0x03, 0x44, 0x02, 0x05, 0x00, // Image data
//!         0x3B, // Trailer
//!     ]
//! );
//! ```
//!
//! Looping animations with a delay between frames:
//!
//! ```
//! use gifenc::{Color, ColorTable, Frame, GifConfig, GifStream};
//!
//! let palette = ColorTable::with_colors([0x000000u32, 0xFF0000, 0x00FF00, 0x0000FF]).unwrap();
//! let config = GifConfig::new().with_loops(-1).with_delay(10);
//! let mut stream = GifStream::create(Vec::new(), 16, 16, Some(palette), config).unwrap();
//!
//! for index in 0..4 {
//!     stream.add_frame(&Frame::filled(16, 16, index).unwrap()).unwrap();
//! }
//! stream.close().unwrap();
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod extension;
pub mod frame;
pub mod gif;
mod screen;
pub mod stream;

pub use color::{Color, ColorTable};
pub use config::{BoundsPolicy, GifConfig};
pub use error::{CanvasError, ColorTableError, ContainerError, EncodingError, Error};
pub use extension::{DisposalMethod, Extension, GraphicControl, Loops};
pub use frame::Frame;
pub use gif::Gif;
pub use screen::{SIGNATURE, TRAILER};
pub use stream::{GifStream, StreamState};

pub use gifenc_lzw;
