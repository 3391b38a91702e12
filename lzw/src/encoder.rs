//! Contains the GIF variable code size LZW encoder.

use std::{fmt::Display, io::Write};

use log::trace;

use crate::{
    block::BlockWriter, clear_code, end_code, packer::BitPacker, MAX_CODE_SIZE,
    MAX_DICTIONARY_LEN, MIN_CODE_SIZE,
};

/// The error type for encoding operations.
///
/// Encapsulate [std::io::Error] and expose LZW code size or unexpected data issues.
#[derive(Debug)]
pub enum EncodingError {
    /// An I/O error happened when writing data.
    Io(std::io::Error),
    /// Code size out of bounds. It should be between 2 and 8 included.
    CodeSize(u8),
    /// A symbol outside of the alphabet was found.
    ///
    /// For a code size of 4 for example,
    /// we expect the data to be between 0 and 2.pow(4) = 16.
    /// If in the data, we would then try to encode 42, it would not be correct and we return this
    /// unexpected code error.
    UnexpectedCode { code: u8, code_size: u8 },
}

impl Display for EncodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodingError::Io(error) => std::fmt::Display::fmt(&error, f),
            EncodingError::CodeSize(code_size) => f.write_fmt(format_args!(
                "Code size must be between 2 and 8, was {code_size}.",
            )),
            EncodingError::UnexpectedCode { code, code_size } => f.write_fmt(format_args!(
                "Unexpected code {code}. For code size {code_size}, data should be < {}.",
                (1 << code_size)
            )),
        }
    }
}

impl std::error::Error for EncodingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodingError::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EncodingError {
    fn from(error: std::io::Error) -> Self {
        EncodingError::Io(error)
    }
}

/// Most nodes have zero or one child, a few have many. Only the latter pay for a full
/// child array.
#[derive(Debug, Clone)]
enum Children {
    None,
    One(u8, u16),
    Many(Vec<u16>),
}

#[derive(Debug, Clone)]
struct Node {
    generation: u32,
    children: Children,
}

/// Arena allocated trie mapping (prefix code, next symbol) to a code.
///
/// Nodes are addressed by their code. A node whose generation differs from the trie's
/// is stale and reads as childless, so a reset is a generation bump: nothing is freed,
/// and child arrays of stale nodes are recycled when the node gets children again.
pub(crate) struct Trie {
    nodes: Vec<Node>,
    generation: u32,
    alphabet_len: usize,
}

impl Trie {
    fn new(code_size: u8) -> Self {
        let nodes = vec![
            Node {
                generation: 0,
                children: Children::None,
            };
            MAX_DICTIONARY_LEN
        ];
        Self {
            nodes,
            generation: 1,
            alphabet_len: 1 << code_size,
        }
    }

    #[inline(always)]
    fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped around: old generations could alias the new one.
            for node in self.nodes.iter_mut() {
                node.generation = 0;
            }
            self.generation = 1;
        }
    }

    #[inline(always)]
    fn find_word(&self, prefix: u16, k: u8) -> Option<u16> {
        let node = &self.nodes[prefix as usize];
        if node.generation != self.generation {
            return None;
        }
        match &node.children {
            Children::None => None,
            &Children::One(child_k, child) => {
                if child_k == k {
                    Some(child)
                } else {
                    None
                }
            }
            Children::Many(children) => match children[k as usize] {
                0 => None,
                child => Some(child),
            },
        }
    }

    #[inline(always)]
    fn add(&mut self, prefix: u16, k: u8, code: u16) {
        let alphabet_len = self.alphabet_len;
        let generation = self.generation;
        let node = &mut self.nodes[prefix as usize];

        if node.generation != generation {
            node.generation = generation;
            match &mut node.children {
                Children::Many(children) => {
                    children.iter_mut().for_each(|child| *child = 0);
                    children[k as usize] = code;
                }
                _ => node.children = Children::One(k, code),
            }
            return;
        }

        match &mut node.children {
            Children::None => node.children = Children::One(k, code),
            &mut Children::One(other_k, other_code) => {
                let mut children = vec![0; alphabet_len];
                children[other_k as usize] = other_code;
                children[k as usize] = code;
                node.children = Children::Many(children);
            }
            Children::Many(children) => children[k as usize] = code,
        }
    }
}

/// The ordered codes produced by one LZW pass, with the minimum code size they were
/// produced for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeStream {
    codes: Vec<u16>,
    code_size: u8,
}

impl CodeStream {
    pub fn codes(&self) -> &[u16] {
        &self.codes
    }

    pub fn code_size(&self) -> u8 {
        self.code_size
    }

    pub fn clear_code(&self) -> u16 {
        clear_code(self.code_size)
    }

    pub fn end_code(&self) -> u16 {
        end_code(self.code_size)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Number of clear codes in the stream, the leading one included.
    pub fn clear_count(&self) -> usize {
        let clear_code = self.clear_code();
        self.codes.iter().filter(|&&code| code == clear_code).count()
    }

    pub fn into_codes(self) -> Vec<u16> {
        self.codes
    }

    /// Write the codes, packed least significant bit first, into `into`.
    pub fn pack<W: Write>(&self, into: W) -> Result<W, std::io::Error> {
        let mut packer = BitPacker::new(into, self.code_size);
        for &code in &self.codes {
            packer.push(code)?;
        }
        packer.finish()
    }
}

/// LZW encoder for GIF image data.
///
/// The encoder owns its dictionary, which is reset at the start of every call to
/// [LzwEncoder::encode], so one encoder can compress several buffers with the same code size
/// without reallocating.
pub struct LzwEncoder {
    code_size: u8,
    trie: Trie,
}

impl LzwEncoder {
    /// Create an encoder for symbols in `0..2.pow(code_size)`.
    ///
    /// # Errors
    ///
    /// Fails with [EncodingError::CodeSize] if `code_size` is not between 2 and 8 included.
    pub fn new(code_size: u8) -> Result<Self, EncodingError> {
        if !(MIN_CODE_SIZE..=MAX_CODE_SIZE).contains(&code_size) {
            return Err(EncodingError::CodeSize(code_size));
        }

        Ok(Self {
            code_size,
            trie: Trie::new(code_size),
        })
    }

    pub fn code_size(&self) -> u8 {
        self.code_size
    }

    /// Compress `data` into a code stream.
    ///
    /// The stream starts with a clear code and ends with the end of information code.
    /// When the dictionary holds 4096 entries, a clear code is emitted and the dictionary
    /// starts over.
    ///
    /// # Errors
    ///
    /// Fails with [EncodingError::UnexpectedCode] on the first symbol not lower than
    /// `2.pow(code_size)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gifenc_lzw::encoder::LzwEncoder;
    ///
    /// let mut encoder = LzwEncoder::new(2).unwrap();
    /// let stream = encoder.encode(&[0, 1, 1, 0]).unwrap();
    ///
    /// assert_eq!(stream.codes(), [4, 0, 1, 1, 0, 5]);
    /// ```
    pub fn encode(&mut self, data: &[u8]) -> Result<CodeStream, EncodingError> {
        let code_size = self.code_size;
        let clear_code = clear_code(code_size);
        let end_of_information = end_code(code_size);
        let max_code = ((1u32 << code_size) - 1) as u8;
        let first_free_code = end_of_information + 1;

        let check = |k: u8| {
            if k > max_code {
                Err(EncodingError::UnexpectedCode { code: k, code_size })
            } else {
                Ok(k)
            }
        };

        self.trie.reset();
        let mut codes = Vec::with_capacity(data.len() / 2 + 2);
        codes.push(clear_code);

        let (&first, rest) = match data.split_first() {
            Some(split) => split,
            None => {
                // Well, it's an empty stream! Leaving early.
                codes.push(end_of_information);
                return Ok(CodeStream { codes, code_size });
            }
        };

        let mut current_prefix = check(first)? as u16;
        let mut next_code = first_free_code;
        let mut resets = 0usize;

        for &k in rest {
            let k = check(k)?;

            if let Some(word) = self.trie.find_word(current_prefix, k) {
                current_prefix = word;
                continue;
            }

            codes.push(current_prefix);
            if (next_code as usize) < MAX_DICTIONARY_LEN {
                self.trie.add(current_prefix, k, next_code);
                next_code += 1;
            } else {
                codes.push(clear_code);
                self.trie.reset();
                next_code = first_free_code;
                resets += 1;
            }
            current_prefix = k as u16;
        }

        codes.push(current_prefix);
        codes.push(end_of_information);

        trace!(
            "lzw: {} symbols into {} codes, code size {}, {} dictionary resets",
            data.len(),
            codes.len(),
            code_size,
            resets
        );

        Ok(CodeStream { codes, code_size })
    }
}

/// LZW encoder tuned for GIF.
///
/// Its code size is between 2 and 8 included, and the data will be
/// written using little endian packing in the output [std::io::Write].
pub struct GifStyleEncoder;

impl GifStyleEncoder {
    /// Compress data with LZW, using GIF style variable encoding.
    ///
    /// # Arguments
    ///
    /// * `data` - The palette indices to be compressed.
    /// * `into` - The output where packed codes should be written.
    /// * `code_size` - Between 2 and 8, the minimum code size to use.
    ///   Every index in `data` must be lower than `2.pow(code_size)`.
    ///   The initial write size will be equal to code size + 1.
    ///
    /// # Errors
    ///
    /// This function can fail on an [std::io::Error], unexpected codes or code sizes.
    pub fn encode<W: Write>(data: &[u8], into: W, code_size: u8) -> Result<W, EncodingError> {
        let stream = LzwEncoder::new(code_size)?.encode(data)?;
        Ok(stream.pack(into)?)
    }

    /// Compress data with LZW, using GIF style variable encoding.
    /// Convenient wrapper that creates a [Vec<u8>] under the hood.
    ///
    /// # Examples
    ///
    /// ```
    /// use gifenc_lzw::encoder::{EncodingError, GifStyleEncoder};
    ///
    /// fn main() -> Result<(), EncodingError> {
    ///     let data = [0, 0, 1, 3];
    ///     let output = GifStyleEncoder::encode_to_vec(&data, 2)?;
    ///
    ///     assert_eq!(output, [0x04, 0x32, 0x05]);
    ///     Ok(())
    /// }
    /// ```
    pub fn encode_to_vec(data: &[u8], code_size: u8) -> Result<Vec<u8>, EncodingError> {
        GifStyleEncoder::encode(data, Vec::new(), code_size)
    }

    /// Compress data and frame the packed codes in GIF sub-blocks, terminator included.
    ///
    /// This is the image data section of a GIF frame, minus its leading code size byte.
    pub fn encode_blocks<W: Write>(
        data: &[u8],
        into: W,
        code_size: u8,
    ) -> Result<W, EncodingError> {
        let stream = LzwEncoder::new(code_size)?.encode(data)?;
        let blocks = stream.pack(BlockWriter::new(into))?;
        Ok(blocks.finish()?)
    }

    /// Same as [GifStyleEncoder::encode_blocks], collecting into a [Vec<u8>].
    pub fn encode_blocks_to_vec(data: &[u8], code_size: u8) -> Result<Vec<u8>, EncodingError> {
        GifStyleEncoder::encode_blocks(data, Vec::new(), code_size)
    }
}
