//! Buffered GIF: collect frames, then encode them all at once.

use std::io::Write;

use log::debug;
use rayon::prelude::*;

use crate::{
    color::ColorTable,
    config::GifConfig,
    error::{CanvasError, Error},
    extension::{Extension, Loops},
    frame::{Canvas, Frame},
    screen::{Screen, TRAILER},
};

/// An animated GIF held in memory.
///
/// Frames are compressed in parallel when encoding, then written in order.
///
/// # Examples
///
/// ```
/// use gifenc::{Color, ColorTable, Frame, Gif, GifConfig};
///
/// let palette = ColorTable::with_colors([Color::WHITE, Color::BLACK]).unwrap();
/// let mut gif = Gif::new(2, 2, Some(palette), GifConfig::new());
/// gif.add_frame(Frame::with_pixels(2, 2, vec![0, 1, 1, 0]).unwrap()).unwrap();
///
/// let bytes = gif.encode_to_vec().unwrap();
///
/// assert_eq!(&bytes[..6], b"GIF89a");
/// assert_eq!(bytes.last(), Some(&0x3B));
/// ```
#[derive(Debug, Clone)]
pub struct Gif {
    width: u16,
    height: u16,
    global_table: Option<ColorTable>,
    config: GifConfig,
    extensions: Vec<Extension>,
    frames: Vec<Frame>,
}

impl Gif {
    pub fn new(
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
            width,
            height,
            global_table,
            config,
            extensions: Vec::new(),
            frames: Vec::new(),
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn global_table(&self) -> Option<&ColorTable> {
        self.global_table.as_ref()
    }

    pub fn config(&self) -> &GifConfig {
        &self.config
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Append a frame.
    ///
    /// # Errors
    ///
    /// Fails if the frame has no color table to use, or does not fit on the canvas with
    /// [crate::BoundsPolicy::Reject].
    pub fn add_frame(&mut self, frame: Frame) -> Result<(), CanvasError> {
        frame.region(self.width, self.height, self.config.bounds)?;
        frame.active_table(self.global_table.as_ref())?;
        self.frames.push(frame);
        Ok(())
    }

    pub fn remove_frame(&mut self, index: usize) -> Option<Frame> {
        if index < self.frames.len() {
            Some(self.frames.remove(index))
        } else {
            None
        }
    }

    pub fn set_loops<L: Into<Loops>>(&mut self, loops: L) {
        self.config.loops = loops.into().normalized();
        debug!("Loops set to {:?}", self.config.loops);
    }

    pub fn loops(&self) -> Loops {
        self.config.loops
    }

    /// Add an extension written before the first frame.
    ///
    /// A looping extension replaces the current loop setting, a graphic control becomes the
    /// default for frames without one.
    pub fn add_extension(&mut self, extension: Extension) {
        match extension {
            Extension::Loop(loops) => self.set_loops(loops),
            Extension::GraphicControl(control) => self.config.set_default_control(control),
            application => self.extensions.push(application),
        }
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// Encode the whole GIF into `into`, returning the number of bytes written.
    ///
    /// Every frame is compressed before anything is written, so an invalid frame leaves
    /// `into` untouched.
    ///
    /// # Errors
    ///
    /// [Error::Frame] for the invalid frame with the lowest index, or [Error::Io] if
    /// writing fails.
    pub fn encode<W: Write>(&self, mut into: W) -> Result<usize, Error> {
        debug!(
            "Encoding {}x{} GIF, {} frames",
            self.width,
            self.height,
            self.frames.len()
        );

        let canvas = Canvas {
            width: self.width,
            height: self.height,
            global: self.global_table.as_ref(),
            config: &self.config,
        };
        let compressed: Vec<Result<Vec<u8>, Error>> = self
            .frames
            .par_iter()
            .map(|frame| frame.encode(&canvas))
            .collect();
        let frames = compressed
            .into_iter()
            .enumerate()
            .map(|(index, frame)| frame.map_err(|error| Error::frame(index, error)))
            .collect::<Result<Vec<_>, _>>()?;

        let header = Screen {
            width: self.width,
            height: self.height,
            global: self.global_table.as_ref(),
            config: &self.config,
        }
        .encode(&self.extensions)?;

        into.write_all(&header)?;
        let mut written = header.len();
        for frame in &frames {
            into.write_all(frame)?;
            written += frame.len();
        }
        into.write_all(&[TRAILER])?;
        written += 1;
        into.flush()?;

        debug!("Encoded GIF, {written} bytes");
        Ok(written)
    }

    pub fn encode_to_vec(&self) -> Result<Vec<u8>, Error> {
        let mut bytes = Vec::new();
        self.encode(&mut bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::Color,
        config::BoundsPolicy,
        extension::{DisposalMethod, GraphicControl},
    };

    fn palette() -> ColorTable {
        ColorTable::with_colors([Color::WHITE, Color::BLACK]).unwrap()
    }

    #[test]
    fn no_frames_is_header_and_trailer() -> Result<(), Error> {
        let gif = Gif::new(4, 4, Some(palette()), GifConfig::new());

        let bytes = gif.encode_to_vec()?;

        assert_eq!(bytes.len(), 13 + 6 + 1);
        assert_eq!(bytes[bytes.len() - 1], 0x3B);

        Ok(())
    }

    #[test]
    fn encode_reports_written_bytes() -> Result<(), Error> {
        let mut gif = Gif::new(2, 2, Some(palette()), GifConfig::new());
        gif.add_frame(Frame::with_pixels(2, 2, vec![0, 1, 1, 0])?)?;

        let mut bytes = Vec::new();
        let written = gif.encode(&mut bytes)?;

        assert_eq!(written, bytes.len());
        assert_eq!(written, 36);

        Ok(())
    }

    #[test]
    fn frames_keep_their_order() -> Result<(), Error> {
        let mut gif = Gif::new(1, 1, Some(palette()), GifConfig::new());
        for delay in 0..20 {
            let control = GraphicControl::new().with_delay(delay);
            gif.add_frame(Frame::new(1, 1)?.with_control(control))?;
        }

        let bytes = gif.encode_to_vec()?;

        let delays: Vec<u16> = bytes
            .windows(3)
            .enumerate()
            .filter(|(_, window)| *window == [0x21, 0xF9, 0x04])
            .map(|(offset, _)| u16::from_le_bytes([bytes[offset + 4], bytes[offset + 5]]))
            .collect();
        assert_eq!(delays, (0..20).collect::<Vec<u16>>());

        Ok(())
    }

    #[test]
    fn add_frame_checks_bounds() -> Result<(), Error> {
        let mut gif = Gif::new(4, 4, Some(palette()), GifConfig::new());

        let result = gif.add_frame(Frame::new(2, 2)?.at(3, 0));

        assert!(matches!(result, Err(CanvasError::OutOfBounds { .. })));
        assert!(gif.frames().is_empty());

        Ok(())
    }

    #[test]
    fn add_frame_crops_when_asked() -> Result<(), Error> {
        let config = GifConfig::new().with_bounds(BoundsPolicy::Crop);
        let mut gif = Gif::new(4, 4, Some(palette()), config);

        gif.add_frame(Frame::new(2, 2)?.at(3, 3))?;
        let bytes = gif.encode_to_vec()?;

        // Image descriptor right after the 19 byte header.
        assert_eq!(
            bytes[19..29],
            [0x2C, 0x03, 0x00, 0x03, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]
        );

        Ok(())
    }

    #[test]
    fn add_frame_needs_a_table() -> Result<(), Error> {
        let mut gif = Gif::new(4, 4, None, GifConfig::new());

        assert_eq!(
            gif.add_frame(Frame::new(1, 1)?),
            Err(CanvasError::MissingColorTable)
        );
        gif.add_frame(Frame::new(1, 1)?.with_local_table(palette()))?;
        assert_eq!(gif.frames().len(), 1);

        Ok(())
    }

    #[test]
    fn invalid_frame_writes_nothing() -> Result<(), Error> {
        let mut gif = Gif::new(2, 2, Some(palette()), GifConfig::new());
        gif.add_frame(Frame::new(2, 2)?)?;
        gif.add_frame(Frame::filled(2, 2, 9)?)?;

        let mut bytes = Vec::new();
        let result = gif.encode(&mut bytes);

        assert!(matches!(
            result,
            Err(Error::Frame { index: 1, ref source }) if matches!(**source, Error::Encoding(_))
        ));
        assert!(bytes.is_empty());

        Ok(())
    }

    #[test]
    fn loops_are_set_and_cleared() -> Result<(), Error> {
        let mut gif = Gif::new(1, 1, Some(palette()), GifConfig::new().with_loops(-1));
        assert_eq!(gif.loops(), Loops::Infinite);
        let looping = gif.encode_to_vec()?;

        gif.set_loops(0);
        assert_eq!(gif.loops(), Loops::None);
        let once = gif.encode_to_vec()?;

        assert_eq!(looping.len(), once.len() + 19);

        Ok(())
    }

    #[test]
    fn graphic_control_extension_sets_defaults() -> Result<(), Error> {
        let mut gif = Gif::new(1, 1, Some(palette()), GifConfig::new());
        gif.add_extension(Extension::GraphicControl(
            GraphicControl::new()
                .with_delay(3)
                .with_disposal(DisposalMethod::Background),
        ));
        gif.add_extension(Extension::application(*b"TESTTEST", *b"1.0", vec![1, 2]));
        gif.add_frame(Frame::new(1, 1)?)?;

        assert_eq!(gif.config().delay, Some(3));
        assert_eq!(gif.extensions().len(), 1);

        let bytes = gif.encode_to_vec()?;
        // Application extension: 14 byte introduction, then [2, 1, 2, 0].
        assert_eq!(bytes[19..22], [0x21, 0xFF, 0x0B]);
        assert_eq!(bytes[33..37], [0x02, 0x01, 0x02, 0x00]);
        assert_eq!(bytes[37..41], [0x21, 0xF9, 0x04, 0x08]);

        Ok(())
    }

    #[test]
    fn graphic_control_extension_keeps_flags() -> Result<(), Error> {
        let control = GraphicControl::new()
            .with_user_input(true)
            .with_transparent(1)
            .with_transparency_flag(false);
        let mut gif = Gif::new(1, 1, Some(palette()), GifConfig::new());
        gif.add_extension(Extension::GraphicControl(control));
        gif.add_frame(Frame::new(1, 1)?)?;

        let bytes = gif.encode_to_vec()?;

        // Header is 19 bytes, the frame starts with its graphic control.
        assert_eq!(bytes[19..27], Extension::GraphicControl(control).to_bytes()?[..]);
        assert_eq!(bytes[22], 0b0000_0010);
        assert_eq!(bytes[25], 1);

        Ok(())
    }
}
