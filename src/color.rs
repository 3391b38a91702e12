//! Palettes.
//!
//! GIF pixels are indices into a color table of up to 256 RGB entries. On the wire, a table
//! always holds a power of two entries, from 2 to 256, so a table is padded with black up to
//! [ColorTable::size].

use std::io::Write;

use indexmap::IndexSet;

use crate::error::ColorTableError;

/// Most colors a single table can hold.
pub const MAX_COLORS: usize = 256;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From a `0xRRGGBB` value, the top byte is ignored.
    pub const fn from_hex(rgb: u32) -> Self {
        Color::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub const fn to_rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<u32> for Color {
    fn from(rgb: u32) -> Self {
        Color::from_hex(rgb)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::new(r, g, b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Color::new(r, g, b)
    }
}

/// An ordered list of up to 256 colors.
///
/// Slots may be empty after [ColorTable::delete]; empty slots encode as black. The table
/// length is the highest occupied slot plus one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorTable {
    // Never ends with an empty slot.
    slots: Vec<Option<Color>>,
    sorted: bool,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from colors, in order.
    ///
    /// # Errors
    ///
    /// Fails with [ColorTableError::TooManyColors] for more than 256 colors.
    ///
    /// # Examples
    ///
    /// ```
    /// use gifenc::{Color, ColorTable};
    ///
    /// let table = ColorTable::with_colors([0xFFFFFFu32, 0x000000, 0xFF0000]).unwrap();
    ///
    /// assert_eq!(table.len(), 3);
    /// assert_eq!(table.size(), 4);
    /// assert_eq!(table.get(2), Some(Color::new(0xFF, 0, 0)));
    /// ```
    pub fn with_colors<I, C>(colors: I) -> Result<Self, ColorTableError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Color>,
    {
        let mut table = Self::new();
        table.set(colors)?;
        Ok(table)
    }

    /// Mark the table as sorted by decreasing importance, a hint for decoders.
    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Replace the whole content of the table. On error, the table is left untouched.
    pub fn set<I, C>(&mut self, colors: I) -> Result<(), ColorTableError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Color>,
    {
        let slots: Vec<Option<Color>> = colors.into_iter().map(|c| Some(c.into())).collect();
        if slots.len() > MAX_COLORS {
            return Err(ColorTableError::TooManyColors(slots.len()));
        }
        self.slots = slots;
        Ok(())
    }

    /// Add colors, filling empty slots first and appending the rest.
    ///
    /// # Errors
    ///
    /// Fails with [ColorTableError::TooManyColors] if they don't all fit, in which case
    /// none is added.
    pub fn add<I, C>(&mut self, colors: I) -> Result<(), ColorTableError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Color>,
    {
        let colors: Vec<Color> = colors.into_iter().map(Into::into).collect();
        let holes = self.slots.iter().filter(|slot| slot.is_none()).count();
        let room = holes + MAX_COLORS - self.slots.len();
        if colors.len() > room {
            return Err(ColorTableError::TooManyColors(
                self.slots.len() - holes + colors.len(),
            ));
        }

        let mut colors = colors.into_iter();
        for slot in self.slots.iter_mut().filter(|slot| slot.is_none()) {
            match colors.next() {
                Some(color) => *slot = Some(color),
                None => return Ok(()),
            }
        }
        self.slots.extend(colors.map(Some));
        Ok(())
    }

    /// Put `color` at `index`, growing the table with empty slots if needed.
    pub fn set_color<C: Into<Color>>(
        &mut self,
        index: usize,
        color: C,
    ) -> Result<(), ColorTableError> {
        if index >= MAX_COLORS {
            return Err(ColorTableError::SlotOutOfRange(index));
        }
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(color.into());
        Ok(())
    }

    /// Color at `index`, `None` for an empty or missing slot.
    pub fn get(&self, index: usize) -> Option<Color> {
        self.slots.get(index).copied().flatten()
    }

    /// Empty every slot holding one of `colors`. Other slots keep their index.
    pub fn delete<I, C>(&mut self, colors: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Color>,
    {
        for color in colors {
            let color = color.into();
            for slot in self.slots.iter_mut() {
                if *slot == Some(color) {
                    *slot = None;
                }
            }
        }
        self.trim();
    }

    /// Index of the first slot holding `color`.
    pub fn find<C: Into<Color>>(&self, color: C) -> Option<u8> {
        let color = Some(color.into());
        self.slots
            .iter()
            .position(|slot| *slot == color)
            .map(|index| index as u8)
    }

    /// Occupied slots with their index.
    pub fn colors(&self) -> impl Iterator<Item = (usize, Color)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|color| (index, color)))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Bits needed to index every slot, at least 1.
    pub fn bit_size(&self) -> u8 {
        let mut bits = 1;
        while (1 << bits) < self.slots.len() {
            bits += 1;
        }
        bits
    }

    /// Number of entries written out, `2.pow(bit_size)`.
    pub fn size(&self) -> usize {
        1 << self.bit_size()
    }

    /// LZW minimum code size for pixels indexing this table.
    pub fn min_code_size(&self) -> u8 {
        self.bit_size().max(gifenc_lzw::MIN_CODE_SIZE)
    }

    /// Packed fields of a logical screen descriptor using this table as the global table.
    ///
    /// `color_resolution` is the number of bits per primary color, clamped to 1..=8.
    pub fn global_flags(&self, color_resolution: u8) -> u8 {
        let resolution = color_resolution.clamp(1, 8) - 1;
        0x80 | resolution << 4 | (self.sorted as u8) << 3 | (self.bit_size() - 1)
    }

    /// Packed fields of an image descriptor using this table as the local table.
    pub fn local_flags(&self) -> u8 {
        0x80 | (self.sorted as u8) << 5 | (self.bit_size() - 1)
    }

    /// Write `3 * size()` bytes of RGB triplets, padded with black.
    pub fn write_to<W: Write>(&self, into: &mut W) -> Result<(), std::io::Error> {
        into.write_all(&self.encode())
    }

    /// RGB triplets, padded with black to `3 * size()` bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(3 * self.size());
        for slot in &self.slots {
            bytes.extend_from_slice(&slot.unwrap_or_default().to_rgb());
        }
        bytes.resize(3 * self.size(), 0);
        bytes
    }

    /// Drop duplicate colors and empty slots, keeping first occurrences in order.
    ///
    /// Returns the new index of every former slot, so pixels can be remapped with
    /// `remap[pixel as usize]`. Former empty slots map to 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use gifenc::ColorTable;
    ///
    /// let mut table = ColorTable::with_colors([0xFF0000u32, 0x00FF00, 0xFF0000]).unwrap();
    /// let remap = table.simplify();
    ///
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(remap, [0, 1, 0]);
    /// ```
    pub fn simplify(&mut self) -> Vec<u8> {
        let mut unique = IndexSet::with_capacity(self.slots.len());
        let remap = self
            .slots
            .iter()
            .map(|slot| match slot {
                Some(color) => unique.insert_full(*color).0 as u8,
                None => 0,
            })
            .collect();
        self.slots = unique.into_iter().map(Some).collect();
        remap
    }

    fn trim(&mut self) {
        while let Some(None) = self.slots.last() {
            self.slots.pop();
        }
    }
}
