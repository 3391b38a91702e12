//! Frames: a rectangle of palette indices placed on the canvas, with its own optional
//! color table and graphic control.

use std::{borrow::Cow, io::Write};

use byteorder::{LittleEndian, WriteBytesExt};
use gifenc_lzw::encoder::{EncodingError, GifStyleEncoder};
use log::trace;

use crate::{
    color::ColorTable,
    config::{BoundsPolicy, GifConfig},
    error::{CanvasError, Error},
    extension::{Extension, GraphicControl},
};

pub const IMAGE_SEPARATOR: u8 = 0x2C;

/// A single image of a GIF.
///
/// # Examples
///
/// ```
/// use gifenc::Frame;
///
/// let mut frame = Frame::new(3, 2).unwrap().at(1, 1);
/// frame.set(2, 1, 4).unwrap();
///
/// assert_eq!(frame.pixels(), [0, 0, 0, 0, 0, 4]);
/// assert_eq!(frame.get(2, 1), Some(4));
/// assert_eq!(frame.get(3, 1), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    // Row major, `width * height` indices.
    pixels: Vec<u8>,
    local_table: Option<ColorTable>,
    control: Option<GraphicControl>,
}

impl Frame {
    /// A frame at the canvas origin, all pixels set to index 0.
    ///
    /// # Errors
    ///
    /// Fails with [CanvasError::EmptyFrame] if `width` or `height` is 0.
    pub fn new(width: u16, height: u16) -> Result<Self, CanvasError> {
        Self::filled(width, height, 0)
    }

    /// A frame at the canvas origin, all pixels set to `index`.
    pub fn filled(width: u16, height: u16, index: u8) -> Result<Self, CanvasError> {
        let len = area(width, height)?;
        Ok(Self::from_parts(width, height, vec![index; len]))
    }

    /// A frame at the canvas origin with row major `pixels`.
    ///
    /// # Errors
    ///
    /// Fails with [CanvasError::EmptyFrame] on a zero dimension, [CanvasError::PixelCount]
    /// if there aren't exactly `width * height` pixels.
    pub fn with_pixels(width: u16, height: u16, pixels: Vec<u8>) -> Result<Self, CanvasError> {
        let expected = area(width, height)?;
        if pixels.len() != expected {
            return Err(CanvasError::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self::from_parts(width, height, pixels))
    }

    fn from_parts(width: u16, height: u16, pixels: Vec<u8>) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
            pixels,
            local_table: None,
            control: None,
        }
    }

    /// Place the frame's top left corner at `(x, y)` on the canvas.
    pub fn at(mut self, x: u16, y: u16) -> Self {
        self.set_position(x, y);
        self
    }

    pub fn with_local_table(mut self, table: ColorTable) -> Self {
        self.local_table = Some(table);
        self
    }

    pub fn with_control(mut self, control: GraphicControl) -> Self {
        self.control = Some(control);
        self
    }

    pub fn set_position(&mut self, x: u16, y: u16) {
        self.x = x;
        self.y = y;
    }

    pub fn set_local_table(&mut self, table: Option<ColorTable>) {
        self.local_table = table;
    }

    pub fn set_control(&mut self, control: Option<GraphicControl>) {
        self.control = control;
    }

    pub fn x(&self) -> u16 {
        self.x
    }

    pub fn y(&self) -> u16 {
        self.y
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks_exact(self.width as usize)
    }

    pub fn local_table(&self) -> Option<&ColorTable> {
        self.local_table.as_ref()
    }

    pub fn control(&self) -> Option<&GraphicControl> {
        self.control.as_ref()
    }

    /// Replace every pixel, keeping the dimensions.
    pub fn replace(&mut self, pixels: Vec<u8>) -> Result<(), CanvasError> {
        let expected = self.pixels.len();
        if pixels.len() != expected {
            return Err(CanvasError::PixelCount {
                expected,
                actual: pixels.len(),
            });
        }
        self.pixels = pixels;
        Ok(())
    }

    pub fn get(&self, x: u16, y: u16) -> Option<u8> {
        self.offset(x, y).map(|offset| self.pixels[offset])
    }

    pub fn set(&mut self, x: u16, y: u16, index: u8) -> Result<(), CanvasError> {
        let offset = self
            .offset(x, y)
            .ok_or(CanvasError::PixelPosition { x, y })?;
        self.pixels[offset] = index;
        Ok(())
    }

    pub fn fill(&mut self, index: u8) {
        self.pixels.fill(index);
    }

    fn offset(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// The image data section of this frame: the LZW minimum code size followed by the
    /// compressed pixels in sub-blocks.
    ///
    /// # Errors
    ///
    /// Fails if `min_code_size` is not between 2 and 8, or a pixel is not lower than
    /// `2.pow(min_code_size)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gifenc::Frame;
    ///
    /// let frame = Frame::with_pixels(2, 2, vec![0, 1, 1, 0]).unwrap();
    ///
    /// assert_eq!(
    ///     frame.encode_image_data(2).unwrap(),
    ///     [0x02, 0x03, 0x44, 0x02, 0x05, 0x00]
    /// );
    /// ```
    pub fn encode_image_data(&self, min_code_size: u8) -> Result<Vec<u8>, EncodingError> {
        image_data(&self.pixels, min_code_size)
    }

    /// Part of the frame that lands on a `canvas_width` x `canvas_height` canvas.
    pub(crate) fn region(
        &self,
        canvas_width: u16,
        canvas_height: u16,
        policy: BoundsPolicy,
    ) -> Result<Region, CanvasError> {
        let right = self.x as u32 + self.width as u32;
        let bottom = self.y as u32 + self.height as u32;
        if right <= canvas_width as u32 && bottom <= canvas_height as u32 {
            return Ok(Region {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
            });
        }

        let out_of_bounds = CanvasError::OutOfBounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            canvas_width,
            canvas_height,
        };
        match policy {
            BoundsPolicy::Crop if self.x < canvas_width && self.y < canvas_height => Ok(Region {
                x: self.x,
                y: self.y,
                width: self.width.min(canvas_width - self.x),
                height: self.height.min(canvas_height - self.y),
            }),
            _ => Err(out_of_bounds),
        }
    }

    fn region_pixels(&self, region: &Region) -> Cow<'_, [u8]> {
        if region.width == self.width && region.height == self.height {
            return Cow::Borrowed(&self.pixels);
        }

        let width = region.width as usize;
        Cow::Owned(
            self.rows()
                .take(region.height as usize)
                .flat_map(|row| &row[..width])
                .copied()
                .collect(),
        )
    }

    /// The color table pixels index into when this frame is drawn.
    pub(crate) fn active_table<'a>(
        &'a self,
        global: Option<&'a ColorTable>,
    ) -> Result<&'a ColorTable, CanvasError> {
        self.local_table
            .as_ref()
            .or(global)
            .ok_or(CanvasError::MissingColorTable)
    }

    /// Every byte of the frame: graphic control, image descriptor, local color table and
    /// image data. Nothing is produced unless the whole frame is valid.
    pub(crate) fn encode(&self, canvas: &Canvas) -> Result<Vec<u8>, Error> {
        let region = self.region(canvas.width, canvas.height, canvas.config.bounds)?;
        let table = self.active_table(canvas.global)?;
        let pixels = self.region_pixels(&region);
        let image_data = image_data(&pixels, table.min_code_size())?;

        let mut bytes = Vec::with_capacity(8 + 10 + 3 * 256 + image_data.len());
        if let Some(control) = self.control.or_else(|| canvas.config.default_control()) {
            Extension::GraphicControl(control).encode(&mut bytes)?;
        }
        bytes.write_u8(IMAGE_SEPARATOR)?;
        bytes.write_u16::<LittleEndian>(region.x)?;
        bytes.write_u16::<LittleEndian>(region.y)?;
        bytes.write_u16::<LittleEndian>(region.width)?;
        bytes.write_u16::<LittleEndian>(region.height)?;
        match &self.local_table {
            Some(local) => {
                bytes.write_u8(local.local_flags())?;
                local.write_to(&mut bytes)?;
            }
            None => bytes.write_u8(0)?,
        }
        bytes.write_all(&image_data)?;

        trace!(
            "Frame {}x{} at ({}, {}): {} pixels, {} bytes of image data",
            region.width,
            region.height,
            region.x,
            region.y,
            pixels.len(),
            image_data.len()
        );

        Ok(bytes)
    }
}

/// Everything a frame needs to know about the GIF it goes into.
pub(crate) struct Canvas<'a> {
    pub width: u16,
    pub height: u16,
    pub global: Option<&'a ColorTable>,
    pub config: &'a GifConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

fn area(width: u16, height: u16) -> Result<usize, CanvasError> {
    if width == 0 || height == 0 {
        return Err(CanvasError::EmptyFrame);
    }
    Ok(width as usize * height as usize)
}

fn image_data(pixels: &[u8], min_code_size: u8) -> Result<Vec<u8>, EncodingError> {
    let mut data = Vec::with_capacity(pixels.len() / 2 + 8);
    data.push(min_code_size);
    GifStyleEncoder::encode_blocks(pixels, data, min_code_size)
}
