//! Walks the block structure of an encoded GIF so tests can look at one piece at a time.

#![allow(dead_code)]

use anyhow::{bail, ensure, Context, Result};

#[derive(Debug)]
pub struct Image {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub flags: u8,
    pub local_table: Option<Vec<u8>>,
    pub min_code_size: u8,
    /// Packed codes, sub-block framing removed.
    pub data: Vec<u8>,
}

impl Image {
    pub fn pixels(&self) -> Result<Vec<u8>> {
        let pixels = weezl::decode::Decoder::new(weezl::BitOrder::Lsb, self.min_code_size)
            .decode(&self.data)?;
        Ok(pixels)
    }
}

#[derive(Debug)]
pub enum Block {
    Extension { label: u8, sub_blocks: Vec<Vec<u8>> },
    Image(Image),
}

#[derive(Debug)]
pub struct Parsed {
    pub width: u16,
    pub height: u16,
    pub flags: u8,
    pub background: u8,
    pub global_table: Option<Vec<u8>>,
    pub blocks: Vec<Block>,
}

impl Parsed {
    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Image(image) => Some(image),
            _ => None,
        })
    }

    pub fn extensions(&self, wanted: u8) -> impl Iterator<Item = &Vec<Vec<u8>>> {
        self.blocks.iter().filter_map(move |block| match block {
            Block::Extension { label, sub_blocks } if *label == wanted => Some(sub_blocks),
            _ => None,
        })
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = self
            .data
            .get(self.position..self.position + len)
            .with_context(|| format!("truncated at {}", self.position))?;
        self.position += len;
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn table(&mut self, flags: u8) -> Result<Option<Vec<u8>>> {
        if flags & 0x80 == 0 {
            return Ok(None);
        }
        let len = 3 * (1 << ((flags & 0b111) + 1));
        Ok(Some(self.take(len)?.to_vec()))
    }

    fn sub_blocks(&mut self) -> Result<Vec<Vec<u8>>> {
        let mut blocks = vec![];
        loop {
            let len = self.u8()? as usize;
            if len == 0 {
                return Ok(blocks);
            }
            blocks.push(self.take(len)?.to_vec());
        }
    }
}

pub fn parse(data: &[u8]) -> Result<Parsed> {
    let mut cursor = Cursor { data, position: 0 };

    ensure!(cursor.take(6)? == b"GIF89a", "not a GIF89a");
    let width = cursor.u16()?;
    let height = cursor.u16()?;
    let flags = cursor.u8()?;
    let background = cursor.u8()?;
    ensure!(cursor.u8()? == 0, "unexpected aspect ratio");
    let global_table = cursor.table(flags)?;

    let mut blocks = vec![];
    loop {
        match cursor.u8()? {
            0x21 => {
                let label = cursor.u8()?;
                let sub_blocks = cursor.sub_blocks()?;
                blocks.push(Block::Extension { label, sub_blocks });
            }
            0x2C => {
                let x = cursor.u16()?;
                let y = cursor.u16()?;
                let width = cursor.u16()?;
                let height = cursor.u16()?;
                let flags = cursor.u8()?;
                let local_table = cursor.table(flags)?;
                let min_code_size = cursor.u8()?;
                let data = cursor.sub_blocks()?.concat();
                blocks.push(Block::Image(Image {
                    x,
                    y,
                    width,
                    height,
                    flags,
                    local_table,
                    min_code_size,
                    data,
                }));
            }
            0x3B => break,
            other => bail!("unexpected block {other:#04X} at {}", cursor.position - 1),
        }
    }
    ensure!(cursor.position == data.len(), "data after trailer");

    Ok(Parsed {
        width,
        height,
        flags,
        background,
        global_table,
        blocks,
    })
}
