//! Reference decoder, used to check the encoder's output round trips.

use std::fmt::Display;

use bitstream_io::{BitRead, BitReader, LittleEndian};

use crate::{clear_code, end_code, MAX_CODE_WIDTH, MAX_DICTIONARY_LEN};

#[derive(Debug)]
pub enum DecodingError {
    Io(std::io::Error),
    Lzw(&'static str),
}

impl Display for DecodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodingError::Io(error) => error.fmt(f),
            DecodingError::Lzw(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for DecodingError {}

impl From<std::io::Error> for DecodingError {
    fn from(error: std::io::Error) -> Self {
        DecodingError::Io(error)
    }
}

struct Word {
    prefix: Option<u16>,
    k: u8,
    first: u8,
}

struct Table {
    code_size: u8,
    words: Vec<Word>,
    stack: Vec<u8>,
}

impl Table {
    fn new(code_size: u8) -> Self {
        Self {
            code_size,
            words: Vec::with_capacity(MAX_DICTIONARY_LEN),
            stack: Vec::with_capacity(MAX_DICTIONARY_LEN),
        }
    }

    fn clear(&mut self) {
        self.words.clear();
        self.words.extend((0..1u16 << self.code_size).map(|k| Word {
            prefix: None,
            k: k as u8,
            first: k as u8,
        }));
        // Clear and end of information.
        self.words.push(Word {
            prefix: None,
            k: 0,
            first: 0,
        });
        self.words.push(Word {
            prefix: None,
            k: 0,
            first: 0,
        });
    }

    fn len(&self) -> usize {
        self.words.len()
    }

    fn contains(&self, code: u16) -> bool {
        (code as usize) < self.words.len()
    }

    fn first(&self, code: u16) -> u8 {
        self.words[code as usize].first
    }

    fn write_word(&mut self, code: u16, into: &mut Vec<u8>) {
        self.stack.clear();
        let mut code = Some(code);
        while let Some(current) = code {
            let word = &self.words[current as usize];
            self.stack.push(word.k);
            code = word.prefix;
        }
        into.extend(self.stack.iter().rev());
    }

    fn add(&mut self, prefix: u16, k: u8) {
        if self.words.len() < MAX_DICTIONARY_LEN {
            let first = self.first(prefix);
            self.words.push(Word {
                prefix: Some(prefix),
                k,
                first,
            });
        }
    }
}

pub struct Decoder {
    code_size: u8,
}

impl Decoder {
    pub fn new(code_size: u8) -> Self {
        Self { code_size }
    }

    /// Decode packed codes, not framed in sub-blocks.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>, DecodingError> {
        let mut bit_reader = BitReader::endian(data, LittleEndian);
        let clear_code = clear_code(self.code_size);
        let end_of_information = end_code(self.code_size);

        let mut read_size = self.code_size + 1;
        let mut table = Table::new(self.code_size);
        let mut previous: Option<u16> = None;
        let mut into = vec![];

        if bit_reader.read::<u16>(read_size as u32)? != clear_code {
            return Err(DecodingError::Lzw("Missing clear code at stream start"));
        }
        table.clear();

        loop {
            let code = bit_reader.read::<u16>(read_size as u32)?;

            if code == clear_code {
                table.clear();
                read_size = self.code_size + 1;
                previous = None;
                continue;
            }
            if code == end_of_information {
                return Ok(into);
            }

            match previous {
                None => {
                    if !table.contains(code) {
                        return Err(DecodingError::Lzw("Unknown code after clear"));
                    }
                    table.write_word(code, &mut into);
                }
                Some(prefix) => {
                    let k = if table.contains(code) {
                        table.first(code)
                    } else if code as usize == table.len() {
                        table.first(prefix)
                    } else {
                        return Err(DecodingError::Lzw("Code beyond dictionary"));
                    };
                    table.add(prefix, k);
                    table.write_word(code, &mut into);

                    if table.len() == 1 << read_size && read_size < MAX_CODE_WIDTH {
                        read_size += 1;
                    }
                }
            }
            previous = Some(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_4color_data() -> Result<(), DecodingError> {
        let data = [
            0x8C, 0x2D, 0x99, 0x87, 0x2A, 0x1C, 0xDC, 0x33, 0xA0, 0x2, 0x55, 0x0,
        ];

        let decoded = Decoder::new(2).decode(&data)?;

        assert_eq!(
            decoded,
            [
                1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1, 2, 2, 2,
                2, 2, 1, 1, 1, 0, 0, 0, 0, 2, 2, 2,
            ]
        );

        Ok(())
    }

    #[test]
    fn decode_empty() -> Result<(), DecodingError> {
        assert!(Decoder::new(2).decode(&[0x2C])?.is_empty());

        Ok(())
    }

    #[test]
    fn missing_clear_code() {
        let result = Decoder::new(2).decode(&[0x05]);

        assert!(matches!(result, Err(DecodingError::Lzw(_))));
    }
}
