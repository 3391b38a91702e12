//! GIF89a extension blocks: graphic control, looping and generic application extensions.

use std::io::Write;

use gifenc_lzw::block::blockify;

pub const EXTENSION_INTRODUCER: u8 = 0x21;
pub const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;
pub const APPLICATION_LABEL: u8 = 0xFF;

/// What a decoder does with a frame once its delay is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DisposalMethod {
    /// No disposal specified.
    #[default]
    None = 0,
    /// Leave the frame in place.
    Keep = 1,
    /// Restore the frame's area to the background color.
    Background = 2,
    /// Restore the frame's area to what it was before the frame.
    Previous = 3,
}

/// Only the low 3 bits count, values 4 to 7 are undefined and read as [DisposalMethod::None].
impl From<u8> for DisposalMethod {
    fn from(value: u8) -> Self {
        match value & 0b111 {
            1 => DisposalMethod::Keep,
            2 => DisposalMethod::Background,
            3 => DisposalMethod::Previous,
            _ => DisposalMethod::None,
        }
    }
}

/// Delay, disposal and transparency of the frame that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphicControl {
    pub disposal: DisposalMethod,
    /// In hundredths of a second.
    pub delay: u16,
    /// Palette index treated as transparent.
    pub transparent: Option<u8>,
    pub user_input: bool,
    /// Overrides the transparency flag, which otherwise follows `transparent`.
    pub transparency_flag: Option<bool>,
}

impl GraphicControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: u16) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_disposal(mut self, disposal: DisposalMethod) -> Self {
        self.disposal = disposal;
        self
    }

    pub fn with_transparent(mut self, index: u8) -> Self {
        self.transparent = Some(index);
        self
    }

    pub fn with_user_input(mut self, user_input: bool) -> Self {
        self.user_input = user_input;
        self
    }

    pub fn with_transparency_flag(mut self, flag: bool) -> Self {
        self.transparency_flag = Some(flag);
        self
    }

    pub fn has_transparency(&self) -> bool {
        self.transparency_flag
            .unwrap_or_else(|| self.transparent.is_some())
    }

    /// `reserved(3) | disposal(3) | user input(1) | transparency(1)`
    pub fn packed(&self) -> u8 {
        (self.disposal as u8 & 0b111) << 2
            | (self.user_input as u8) << 1
            | self.has_transparency() as u8
    }
}

/// How many times the animation plays after the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Loops {
    /// Play once, no looping extension is written.
    #[default]
    None,
    /// Repeat this many times. A count of 0 is treated as [Loops::None].
    Finite(u16),
    /// Repeat forever.
    Infinite,
}

impl Loops {
    /// Count written in the looping extension, 0 meaning forever, or `None` if there is no
    /// extension to write.
    pub fn count(&self) -> Option<u16> {
        match *self {
            Loops::None | Loops::Finite(0) => None,
            Loops::Finite(count) => Some(count),
            Loops::Infinite => Some(0),
        }
    }

    pub fn normalized(self) -> Self {
        match self {
            Loops::Finite(0) => Loops::None,
            loops => loops,
        }
    }
}

/// `-1` loops forever, `0` plays once, anything else repeats that many times, saturating at
/// 65535. Other negative values play once.
impl From<i32> for Loops {
    fn from(value: i32) -> Self {
        match value {
            -1 => Loops::Infinite,
            count if count > 0 => Loops::Finite(count.min(u16::MAX as i32) as u16),
            _ => Loops::None,
        }
    }
}

/// An extension block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extension {
    GraphicControl(GraphicControl),
    /// The NETSCAPE2.0 looping extension.
    Loop(Loops),
    Application {
        identifier: [u8; 8],
        auth_code: [u8; 3],
        data: Vec<u8>,
    },
}

impl Extension {
    pub fn application(identifier: [u8; 8], auth_code: [u8; 3], data: Vec<u8>) -> Self {
        Extension::Application {
            identifier,
            auth_code,
            data,
        }
    }

    /// Write the block. A [Loops::None] looping extension writes nothing.
    pub fn encode<W: Write>(&self, into: &mut W) -> Result<(), std::io::Error> {
        match self {
            Extension::GraphicControl(control) => {
                let [delay_lo, delay_hi] = control.delay.to_le_bytes();
                into.write_all(&[EXTENSION_INTRODUCER, GRAPHIC_CONTROL_LABEL])?;
                into.write_all(&blockify(&[
                    control.packed(),
                    delay_lo,
                    delay_hi,
                    control.transparent.unwrap_or(0),
                ]))
            }
            Extension::Loop(loops) => match loops.count() {
                Some(count) => {
                    let [count_lo, count_hi] = count.to_le_bytes();
                    write_application(into, b"NETSCAPE", b"2.0", &[0x01, count_lo, count_hi])
                }
                None => Ok(()),
            },
            Extension::Application {
                identifier,
                auth_code,
                data,
            } => write_application(into, identifier, auth_code, data),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, std::io::Error> {
        let mut bytes = Vec::new();
        self.encode(&mut bytes)?;
        Ok(bytes)
    }
}

fn write_application<W: Write>(
    into: &mut W,
    identifier: &[u8; 8],
    auth_code: &[u8; 3],
    data: &[u8],
) -> Result<(), std::io::Error> {
    into.write_all(&[EXTENSION_INTRODUCER, APPLICATION_LABEL, 0x0B])?;
    into.write_all(identifier)?;
    into.write_all(auth_code)?;
    into.write_all(&blockify(data))
}
