use std::borrow::Cow;
use std::convert::TryFrom;
use std::fmt;

use nom::bytes::streaming::take;
use nom::combinator::{complete, map_parser};
use nom::error::ParseError;
use nom::multi::many0;
use nom::IResult;
use rusticata_macros::{align32, newtype_enum};

use crate::endianness::{PcapBE, PcapEndianness, PcapLE};

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct OptionCode(pub u16);

newtype_enum! {
impl debug OptionCode {
    EndOfOpt = 0,
    Comment = 1,
    ShbHardware = 2,
    ShbOs = 3,
    ShbUserAppl = 4,
    IfTsresol = 9,
    IfTsoffset = 14,
    Custom1 = 0x0BAC,
    Custom2 = 0x0BAD,
    Custom3 = 0x4BAC,
    Custom4 = 0x4BAD,
}
}

impl OptionCode {
    /// Schema property: true if a block may carry this option more than
    /// once. Derived from the option semantics, not from the wire.
    pub fn multiple_allowed(self) -> bool {
        matches!(
            self,
            OptionCode::Comment
                | OptionCode::Custom1
                | OptionCode::Custom2
                | OptionCode::Custom3
                | OptionCode::Custom4
        )
    }

    /// Return the name of this option type, or `"?"` if unknown
    pub fn name(self) -> &'static str {
        match self {
            OptionCode::EndOfOpt => "end_of_opt",
            OptionCode::Comment => "comment",
            OptionCode::ShbHardware => "shb_hardware",
            OptionCode::ShbOs => "shb_os",
            OptionCode::ShbUserAppl => "shb_userappl",
            OptionCode::IfTsresol => "if_tsresol",
            OptionCode::IfTsoffset => "if_tsoffset",
            OptionCode::Custom1 => "custom_utf8",
            OptionCode::Custom2 => "custom_binary",
            OptionCode::Custom3 => "custom_utf8_nocopy",
            OptionCode::Custom4 => "custom_binary_nocopy",
            _ => "?",
        }
    }
}

/// The error type which is returned when calling functions on [PcapNGOption]
#[derive(Debug, PartialEq)]
pub enum PcapNGOptionError {
    InvalidLength,
    Utf8Error,
}

impl fmt::Display for PcapNGOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PcapNGOptionError::InvalidLength => write!(f, "Invalid length"),
            PcapNGOptionError::Utf8Error => write!(f, "Invalid UTF-8 string"),
        }
    }
}

impl std::error::Error for PcapNGOptionError {}

/// A single block option: a type, a declared length, and the raw value
/// (padded to 32 bits on the wire).
#[derive(Debug)]
pub struct PcapNGOption<'a> {
    pub code: OptionCode,
    pub len: u16,
    pub value: Cow<'a, [u8]>,
}

impl<'a> PcapNGOption<'a> {
    /// Return a reference to the option value, as raw bytes (not related to the `len` field)
    #[inline]
    pub fn value(&self) -> &[u8] {
        self.value.as_ref()
    }

    /// Return a reference to the option value, using the `len` field to limit it, or None if length is invalid
    pub fn as_bytes(&self) -> Result<&[u8], PcapNGOptionError> {
        let len = usize::from(self.len);
        if len <= self.value.len() {
            Ok(&self.value[..len])
        } else {
            Err(PcapNGOptionError::InvalidLength)
        }
    }

    /// Return the option value interpreted as string
    ///
    /// Returns an error if the length of the option is invalid, or if the value is not valid UTF-8.
    pub fn as_str(&self) -> Result<&str, PcapNGOptionError> {
        self.as_bytes()
            .and_then(|b| std::str::from_utf8(b).or(Err(PcapNGOptionError::Utf8Error)))
    }

    /// Return the option value interpreted as i32, or an error
    ///
    /// Option data length and declared must be exactly 4 bytes
    pub fn as_i32_le(&self) -> Result<i32, PcapNGOptionError> {
        if self.len != 4 {
            return Err(PcapNGOptionError::InvalidLength);
        }
        <[u8; 4]>::try_from(self.value())
            .map(i32::from_le_bytes)
            .or(Err(PcapNGOptionError::InvalidLength))
    }

    /// Return the option value interpreted as u32, or an error
    ///
    /// Option data length and declared must be exactly 4 bytes
    pub fn as_u32_le(&self) -> Result<u32, PcapNGOptionError> {
        if self.len != 4 {
            return Err(PcapNGOptionError::InvalidLength);
        }
        <[u8; 4]>::try_from(self.value())
            .map(u32::from_le_bytes)
            .or(Err(PcapNGOptionError::InvalidLength))
    }

    /// Return the option value interpreted as i64, or an error
    ///
    /// Option data length and declared must be exactly 8 bytes
    pub fn as_i64_le(&self) -> Result<i64, PcapNGOptionError> {
        if self.len != 8 {
            return Err(PcapNGOptionError::InvalidLength);
        }
        <[u8; 8]>::try_from(self.value())
            .map(i64::from_le_bytes)
            .or(Err(PcapNGOptionError::InvalidLength))
    }

    /// Return the option value interpreted as u64, or an error
    ///
    /// Option data length and declared must be exactly 8 bytes
    pub fn as_u64_le(&self) -> Result<u64, PcapNGOptionError> {
        if self.len != 8 {
            return Err(PcapNGOptionError::InvalidLength);
        }
        <[u8; 8]>::try_from(self.value())
            .map(u64::from_le_bytes)
            .or(Err(PcapNGOptionError::InvalidLength))
    }
}

/// Parse a pcap-ng Option (little-endian)
#[inline]
pub fn parse_option_le<'i, E: ParseError<&'i [u8]>>(
    i: &'i [u8],
) -> IResult<&'i [u8], PcapNGOption, E> {
    parse_option::<PcapLE, E>(i)
}

/// Parse a pcap-ng Option (big-endian)
#[inline]
pub fn parse_option_be<'i, E: ParseError<&'i [u8]>>(
    i: &'i [u8],
) -> IResult<&'i [u8], PcapNGOption, E> {
    parse_option::<PcapBE, E>(i)
}

pub(crate) fn parse_option<'i, En: PcapEndianness, E: ParseError<&'i [u8]>>(
    i: &'i [u8],
) -> IResult<&'i [u8], PcapNGOption, E> {
    let (i, code) = En::parse_u16(i)?;
    let (i, len) = En::parse_u16(i)?;
    let (i, value) = take(align32!(len as u32))(i)?;
    let option = PcapNGOption {
        code: OptionCode(code),
        len,
        value: Cow::Borrowed(value),
    };
    Ok((i, option))
}

/// Parse the option list occupying the tail of a block body.
///
/// `len` is the declared total block length and `opt_offset` the offset of
/// the options inside the block; options run to the end of the body. The
/// `end_of_opt` sentinel terminates the list, but its absence at the end of
/// the body is tolerated. A declared option length pointing past the body is
/// an error.
pub(crate) fn opt_parse_options<'i, En: PcapEndianness, E: ParseError<&'i [u8]>>(
    i: &'i [u8],
    len: usize,
    opt_offset: usize,
) -> IResult<&'i [u8], Vec<PcapNGOption>, E> {
    if len > opt_offset {
        map_parser(
            take(len - opt_offset),
            many0(complete(parse_option::<En, E>)),
        )(i)
    } else {
        Ok((i, Vec::new()))
    }
}

pub(crate) fn options_get_as_string<'a>(
    options: &'a [PcapNGOption],
    code: OptionCode,
) -> Option<Result<&'a str, PcapNGOptionError>> {
    options.iter().find_map(|opt| {
        if opt.code == code {
            Some(opt.as_str())
        } else {
            None
        }
    })
}

pub(crate) fn options_get_as_u64_le(
    options: &[PcapNGOption],
    code: OptionCode,
) -> Option<Result<u64, PcapNGOptionError>> {
    options.iter().find_map(|opt| {
        if opt.code == code {
            Some(opt.as_u64_le())
        } else {
            None
        }
    })
}
