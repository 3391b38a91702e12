//! GIF sub-blocks: a length byte followed by at most 255 bytes of payload, repeated,
//! and closed by a zero length block.

use std::io::{ErrorKind, Write};

/// Largest payload of one sub-block.
pub const MAX_BLOCK_LEN: usize = 0xFF;

/// A [Write] adapter framing everything written through it in sub-blocks.
///
/// Full blocks are emitted as soon as 255 bytes are buffered; [BlockWriter::finish] emits
/// the remainder and the terminator.
pub struct BlockWriter<W>
where
    W: Write,
{
    write: W,
    buffer: [u8; MAX_BLOCK_LEN],
    len: usize,
}

impl<W> BlockWriter<W>
where
    W: Write,
{
    pub fn new(write: W) -> Self {
        Self {
            write,
            buffer: [0; MAX_BLOCK_LEN],
            len: 0,
        }
    }

    fn emit_block(&mut self) -> Result<(), std::io::Error> {
        if self.len > 0 {
            self.write.write_all(&[self.len as u8])?;
            self.write.write_all(&self.buffer[..self.len])?;
            self.len = 0;
        }
        Ok(())
    }

    /// Write the pending block and the block terminator, then hand back the writer.
    pub fn finish(mut self) -> Result<W, std::io::Error> {
        self.emit_block()?;
        self.write.write_all(&[0])?;
        self.write.flush()?;
        Ok(self.write)
    }
}

impl<W> Write for BlockWriter<W>
where
    W: Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let count = buf.len().min(MAX_BLOCK_LEN - self.len);
        self.buffer[self.len..self.len + count].copy_from_slice(&buf[..count]);
        self.len += count;
        if self.len == MAX_BLOCK_LEN {
            self.emit_block()?;
        }
        Ok(count)
    }

    /// Flushes the underlying writer. A partial block stays buffered: blocks are only cut
    /// when full or on [BlockWriter::finish].
    fn flush(&mut self) -> std::io::Result<()> {
        self.write.flush()
    }
}

/// Frame `data` in sub-blocks, terminator included.
///
/// Empty data is a lone terminator.
///
/// # Examples
///
/// ```
/// use gifenc_lzw::block::blockify;
///
/// assert_eq!(blockify(&[]), [0x00]);
/// assert_eq!(blockify(&[0x01, 0x00, 0x00]), [0x03, 0x01, 0x00, 0x00, 0x00]);
/// ```
pub fn blockify(data: &[u8]) -> Vec<u8> {
    let block_count = (data.len() + MAX_BLOCK_LEN - 1) / MAX_BLOCK_LEN;
    let mut blocks = Vec::with_capacity(data.len() + block_count + 1);
    for chunk in data.chunks(MAX_BLOCK_LEN) {
        blocks.push(chunk.len() as u8);
        blocks.extend_from_slice(chunk);
    }
    blocks.push(0);
    blocks
}

/// Concatenate the payloads of the sub-blocks at the start of `data`, up to the terminator.
///
/// # Errors
///
/// Fails with [ErrorKind::UnexpectedEof] if the data ends before the terminator.
pub fn deblockify(data: &[u8]) -> Result<Vec<u8>, std::io::Error> {
    let mut payload = Vec::with_capacity(data.len());
    let mut rest = data;
    loop {
        let (&len, tail) = rest
            .split_first()
            .ok_or_else(|| std::io::Error::new(ErrorKind::UnexpectedEof, "missing terminator"))?;
        if len == 0 {
            return Ok(payload);
        }
        let len = len as usize;
        if tail.len() < len {
            return Err(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                "truncated sub-block",
            ));
        }
        payload.extend_from_slice(&tail[..len]);
        rest = &tail[len..];
    }
}
