//! Streaming GIF: the header goes out on open, each frame as soon as it is added, and the
//! trailer on close. Only one frame is held in memory at a time.

use std::io::Write;

use log::debug;

use crate::{
    color::ColorTable,
    config::GifConfig,
    error::{ContainerError, Error},
    extension::{Extension, Loops},
    frame::{Canvas, Frame},
    screen::{Screen, TRAILER},
};

/// Where a [GifStream] stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Unopened,
    HeaderWritten,
    /// At least one frame was written.
    FrameWritten,
    Closed,
}

/// A GIF written to `W` frame by frame.
///
/// # Examples
///
/// ```
/// use gifenc::{Color, ColorTable, Frame, GifConfig, GifStream};
///
/// let palette = ColorTable::with_colors([Color::WHITE, Color::BLACK]).unwrap();
/// let mut stream = GifStream::new(Vec::new(), 2, 2, Some(palette), GifConfig::new());
///
/// stream.open().unwrap();
/// stream.add_frame(&Frame::with_pixels(2, 2, vec![0, 1, 1, 0]).unwrap()).unwrap();
/// let written = stream.close().unwrap();
///
/// assert_eq!(written, stream.into_inner().len());
/// ```
pub struct GifStream<W>
where
    W: Write,
{
    into: W,
    width: u16,
    height: u16,
    global_table: Option<ColorTable>,
    config: GifConfig,
    extensions: Vec<Extension>,
    state: StreamState,
    frame_count: usize,
    bytes_written: usize,
}

impl<W> GifStream<W>
where
    W: Write,
{
    /// Prepare a stream. Nothing is written until [GifStream::open].
    pub fn new(
        into: W,
        width: u16,
        height: u16,
        global_table: Option<ColorTable>,
        config: GifConfig,
    ) -> Self {
        let config = GifConfig {
            loops: config.loops.normalized(),
            ..config
        };
        Self {
            into,
            width,
            height,
            global_table,
            config,
            extensions: Vec::new(),
            state: StreamState::Unopened,
            frame_count: 0,
            bytes_written: 0,
        }
    }

    /// Same as [GifStream::new] followed by [GifStream::open].
    pub fn create(
        into: W,
        width: u16,
        height: u16,
        global_table: Option<ColorTable>,
        config: GifConfig,
    ) -> Result<Self, Error> {
        let mut stream = Self::new(into, width, height, global_table, config);
        stream.open()?;
        Ok(stream)
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    pub fn get_ref(&self) -> &W {
        &self.into
    }

    /// Give back the writer, whatever the state. A stream dropped before
    /// [GifStream::close] is not a valid GIF.
    pub fn into_inner(self) -> W {
        self.into
    }

    /// Change the loop setting, only possible before opening.
    pub fn set_loops<L: Into<Loops>>(&mut self, loops: L) -> Result<(), ContainerError> {
        self.check_unopened()?;
        self.config.loops = loops.into().normalized();
        Ok(())
    }

    /// Add an extension before opening.
    ///
    /// A looping extension replaces the current loop setting, a graphic control becomes the
    /// default for frames without one. Anything else is written with the header.
    pub fn add_extension(&mut self, extension: Extension) -> Result<(), ContainerError> {
        self.check_unopened()?;
        match extension {
            Extension::Loop(loops) => self.config.loops = loops.normalized(),
            Extension::GraphicControl(control) => self.config.set_default_control(control),
            application => self.extensions.push(application),
        }
        Ok(())
    }

    fn check_unopened(&self) -> Result<(), ContainerError> {
        match self.state {
            StreamState::Unopened => Ok(()),
            StreamState::Closed => Err(ContainerError::Closed),
            _ => Err(ContainerError::AlreadyOpened),
        }
    }

    /// Write the header, logical screen descriptor, global color table and global
    /// extensions.
    pub fn open(&mut self) -> Result<(), Error> {
        self.check_unopened()?;

        let header = Screen {
            width: self.width,
            height: self.height,
            global: self.global_table.as_ref(),
            config: &self.config,
        }
        .encode(&self.extensions)?;
        self.write(&header)?;
        self.state = StreamState::HeaderWritten;

        debug!(
            "Opened {}x{} GIF stream, {} header bytes",
            self.width,
            self.height,
            header.len()
        );
        Ok(())
    }

    /// Encode and write one frame.
    ///
    /// The frame is fully encoded before any of it is written: on error, the stream is
    /// unchanged and the next frame can still be added.
    pub fn add_frame(&mut self, frame: &Frame) -> Result<(), Error> {
        match self.state {
            StreamState::HeaderWritten | StreamState::FrameWritten => {}
            StreamState::Unopened => return Err(ContainerError::NotOpened.into()),
            StreamState::Closed => return Err(ContainerError::Closed.into()),
        }

        let canvas = Canvas {
            width: self.width,
            height: self.height,
            global: self.global_table.as_ref(),
            config: &self.config,
        };
        let bytes = frame
            .encode(&canvas)
            .map_err(|error| Error::frame(self.frame_count, error))?;
        self.write(&bytes)?;
        debug!("Frame {} written, {} bytes", self.frame_count, bytes.len());

        self.frame_count += 1;
        self.state = StreamState::FrameWritten;
        Ok(())
    }

    /// Write the trailer and flush. Returns the total number of bytes written.
    pub fn close(&mut self) -> Result<usize, Error> {
        match self.state {
            StreamState::HeaderWritten | StreamState::FrameWritten => {}
            StreamState::Unopened => return Err(ContainerError::NotOpened.into()),
            StreamState::Closed => return Err(ContainerError::Closed.into()),
        }

        self.write(&[TRAILER])?;
        self.into.flush()?;
        self.state = StreamState::Closed;

        debug!(
            "Closed GIF stream, {} frames, {} bytes",
            self.frame_count, self.bytes_written
        );
        Ok(self.bytes_written)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), std::io::Error> {
        self.into.write_all(bytes)?;
        self.bytes_written += bytes.len();
        Ok(())
    }
}
