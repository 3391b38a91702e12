//! Packing of LZW codes into bytes.
//!
//! GIF writes codes least significant bit first, each code using as many bits as the
//! decoder's dictionary needs at the moment it reads it. [WidthSchedule] tracks that width
//! from the codes alone, so the packer never has to ask the encoder about its dictionary.

use std::io::Write;

use bitstream_io::{BitWrite, BitWriter, LittleEndian};

use crate::{clear_code, MAX_CODE_WIDTH};

/// Width, in bits, of every code of a GIF code stream.
///
/// Widths start at `code_size + 1` and grow by one each time the next dictionary entry
/// no longer fits, up to 12 bits. A clear code brings the width back to `code_size + 1`
/// for the code following it.
#[derive(Debug, Clone)]
pub struct WidthSchedule {
    code_size: u8,
    clear_code: u16,
    width: u8,
    next_code: u16,
}

impl WidthSchedule {
    pub fn new(code_size: u8) -> Self {
        let clear_code = clear_code(code_size);
        Self {
            code_size,
            clear_code,
            width: code_size + 1,
            next_code: clear_code + 2,
        }
    }

    /// Width of the next code.
    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Account for `code` having been written with [WidthSchedule::width] bits.
    #[inline]
    pub fn advance(&mut self, code: u16) {
        if code == self.clear_code {
            self.width = self.code_size + 1;
            self.next_code = self.clear_code + 2;
            return;
        }

        if self.next_code >= 1 << self.width && self.width < MAX_CODE_WIDTH {
            self.width += 1;
        }
        self.next_code = self.next_code.saturating_add(1);
    }
}

/// Writes codes into a [Write], least significant bit first.
pub struct BitPacker<W>
where
    W: Write,
{
    writer: BitWriter<W, LittleEndian>,
    schedule: WidthSchedule,
}

impl<W> BitPacker<W>
where
    W: Write,
{
    pub fn new(into: W, code_size: u8) -> Self {
        Self {
            writer: BitWriter::endian(into, LittleEndian),
            schedule: WidthSchedule::new(code_size),
        }
    }

    /// Width the next pushed code will be written with.
    pub fn width(&self) -> u8 {
        self.schedule.width()
    }

    #[inline]
    pub fn push(&mut self, code: u16) -> Result<(), std::io::Error> {
        self.writer.write(self.schedule.width() as u32, code)?;
        self.schedule.advance(code);
        Ok(())
    }

    /// Pad the last byte with zeros and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W, std::io::Error> {
        self.writer.byte_align()?;
        let mut into = self.writer.into_writer();
        into.flush()?;
        Ok(into)
    }
}
