//! Everything before the first frame: signature, logical screen descriptor, global color
//! table and global extensions.

use byteorder::{LittleEndian, WriteBytesExt};

use crate::{color::ColorTable, config::GifConfig, extension::Extension};

pub const SIGNATURE: &[u8; 6] = b"GIF89a";
pub const TRAILER: u8 = 0x3B;

pub(crate) struct Screen<'a> {
    pub width: u16,
    pub height: u16,
    pub global: Option<&'a ColorTable>,
    pub config: &'a GifConfig,
}

impl Screen<'_> {
    /// Packed fields of the logical screen descriptor.
    pub fn flags(&self) -> u8 {
        match self.global {
            Some(global) => {
                let resolution = self
                    .config
                    .color_resolution
                    .unwrap_or_else(|| global.bit_size());
                global.global_flags(resolution)
            }
            None => (self.config.color_resolution.unwrap_or(1).clamp(1, 8) - 1) << 4,
        }
    }

    /// Header bytes, followed by the looping extension if any, then `extensions`.
    pub fn encode(&self, extensions: &[Extension]) -> Result<Vec<u8>, std::io::Error> {
        let table_len = self.global.map(|table| 3 * table.size()).unwrap_or(0);
        let mut bytes = Vec::with_capacity(13 + table_len + 19);

        bytes.extend_from_slice(SIGNATURE);
        bytes.write_u16::<LittleEndian>(self.width)?;
        bytes.write_u16::<LittleEndian>(self.height)?;
        bytes.write_u8(self.flags())?;
        bytes.write_u8(self.config.background)?;
        // Pixel aspect ratio, unspecified.
        bytes.write_u8(0)?;
        if let Some(global) = self.global {
            global.write_to(&mut bytes)?;
        }

        Extension::Loop(self.config.loops).encode(&mut bytes)?;
        for extension in extensions {
            extension.encode(&mut bytes)?;
        }

        Ok(bytes)
    }
}
