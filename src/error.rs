//! Error types.
//!
//! Every error here is the caller's doing: malformed input or a misuse of the container.
//! Encoding is deterministic, so retrying with the same input fails the same way.

use std::fmt::Display;

pub use gifenc_lzw::encoder::EncodingError;

/// A color table was asked to hold more than it can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTableError {
    /// A table holds at most 256 colors.
    TooManyColors(usize),
    /// Slot indices go from 0 to 255.
    SlotOutOfRange(usize),
}

impl Display for ColorTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorTableError::TooManyColors(count) => f.write_fmt(format_args!(
                "A color table holds at most 256 colors, {count} requested."
            )),
            ColorTableError::SlotOutOfRange(index) => f.write_fmt(format_args!(
                "Color table slot {index} out of range, should be < 256."
            )),
        }
    }
}

impl std::error::Error for ColorTableError {}

/// Frame dimensions, pixels or placement are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    /// The pixel buffer does not hold exactly width * height indices.
    PixelCount { expected: usize, actual: usize },
    /// The frame does not fit on the canvas.
    OutOfBounds {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        canvas_width: u16,
        canvas_height: u16,
    },
    /// A pixel position outside of the frame.
    PixelPosition { x: u16, y: u16 },
    /// Frames have at least one pixel.
    EmptyFrame,
    /// The frame has no local color table and the GIF no global one.
    MissingColorTable,
}

impl Display for CanvasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CanvasError::PixelCount { expected, actual } => f.write_fmt(format_args!(
                "Expected {expected} pixels, got {actual}."
            )),
            CanvasError::OutOfBounds {
                x,
                y,
                width,
                height,
                canvas_width,
                canvas_height,
            } => f.write_fmt(format_args!(
                "Frame {width}x{height} at ({x}, {y}) does not fit in a {canvas_width}x{canvas_height} canvas."
            )),
            CanvasError::PixelPosition { x, y } => {
                f.write_fmt(format_args!("Pixel ({x}, {y}) is outside of the frame."))
            }
            CanvasError::EmptyFrame => f.write_str("Frames need a width and a height of at least 1."),
            CanvasError::MissingColorTable => {
                f.write_str("Frame has no local color table and there is no global one.")
            }
        }
    }
}

impl std::error::Error for CanvasError {}

/// The streaming container was used out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerError {
    /// Frames can only be added once the header is written.
    NotOpened,
    /// The header was already written.
    AlreadyOpened,
    /// The trailer was written, the stream is complete.
    Closed,
}

impl Display for ContainerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerError::NotOpened => f.write_str("The GIF stream was not opened."),
            ContainerError::AlreadyOpened => f.write_str("The GIF stream is already opened."),
            ContainerError::Closed => f.write_str("The GIF stream is closed."),
        }
    }
}

impl std::error::Error for ContainerError {}

/// The error type of GIF encoding.
#[derive(Debug)]
pub enum Error {
    ColorTable(ColorTableError),
    Canvas(CanvasError),
    /// LZW compression failed, typically a pixel index too large for the active color table.
    Encoding(EncodingError),
    Container(ContainerError),
    /// Writing to the output failed.
    Io(std::io::Error),
    /// Encoding the frame at `index` failed.
    Frame { index: usize, source: Box<Error> },
}

impl Error {
    pub(crate) fn frame(index: usize, source: Error) -> Self {
        Error::Frame {
            index,
            source: Box::new(source),
        }
    }

    /// The error that caused this one, skipping frame context.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Frame { source, .. } => source.root_cause(),
            error => error,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ColorTable(error) => error.fmt(f),
            Error::Canvas(error) => error.fmt(f),
            Error::Encoding(error) => error.fmt(f),
            Error::Container(error) => error.fmt(f),
            Error::Io(error) => error.fmt(f),
            Error::Frame { index, source } => {
                f.write_fmt(format_args!("Could not encode frame {index}: {source}"))
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ColorTable(error) => Some(error),
            Error::Canvas(error) => Some(error),
            Error::Encoding(error) => Some(error),
            Error::Container(error) => Some(error),
            Error::Io(error) => Some(error),
            Error::Frame { source, .. } => Some(source.as_ref()),
        }
    }
}

impl From<ColorTableError> for Error {
    fn from(error: ColorTableError) -> Self {
        Error::ColorTable(error)
    }
}

impl From<CanvasError> for Error {
    fn from(error: CanvasError) -> Self {
        Error::Canvas(error)
    }
}

impl From<EncodingError> for Error {
    fn from(error: EncodingError) -> Self {
        Error::Encoding(error)
    }
}

impl From<ContainerError> for Error {
    fn from(error: ContainerError) -> Self {
        Error::Container(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error)
    }
}
