use crate::nbt::{CompoundTag, Tag};
use crate::nbt::{
    TAG_BYTE_ARRAY_ID, TAG_BYTE_ID, TAG_COMPOUND_ID, TAG_DOUBLE_ID, TAG_END_ID, TAG_FLOAT_ID,
    TAG_INT_ARRAY_ID, TAG_INT_ID, TAG_LIST_ID, TAG_LONG_ARRAY_ID, TAG_LONG_ID, TAG_SHORT_ID,
    TAG_STRING_ID,
};
use byteorder::{BigEndian, ReadBytesExt};
use std::string::FromUtf8Error;
use std::{error::Error, fmt::Display, io, io::Read};

/// Deepest nesting of lists and compounds the decoder accepts.
const MAXIMUM_TAG_DEPTH: usize = 512;

/// Possible errors while decoding binary data to a tag.
#[derive(Debug)]
pub enum TagDecodeError {
    /// Type id does not belong to the format.
    UnknownTagId { id: u8 },
    /// Declared array or list length is negative.
    NegativeLength { length: i32 },
    /// Non-empty list declares End as its element kind.
    ///
    /// End elements occupy no bytes, so such a list could declare any
    /// element count without backing input.
    EndElementList { length: usize },
    /// Tags nest deeper than the decoder accepts.
    DepthLimitExceeded,
    /// Declared data extends past the end of the input.
    UnexpectedEnd,
    /// A name or string payload is not valid UTF-8.
    MalformedUtf8 { utf8_error: FromUtf8Error },
    /// Chunk payload root must be a compound tag.
    RootTagNotCompound { id: u8 },
    /// I/O error while reading from the underlying source.
    IOError { io_error: io::Error },
}

impl From<io::Error> for TagDecodeError {
    fn from(io_error: io::Error) -> Self {
        if io_error.kind() == io::ErrorKind::UnexpectedEof {
            return TagDecodeError::UnexpectedEnd;
        }

        TagDecodeError::IOError { io_error }
    }
}

impl From<FromUtf8Error> for TagDecodeError {
    fn from(utf8_error: FromUtf8Error) -> Self {
        TagDecodeError::MalformedUtf8 { utf8_error }
    }
}

impl Error for TagDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use TagDecodeError::*;
        match self {
            MalformedUtf8 { utf8_error } => Some(utf8_error),
            IOError { io_error } => Some(io_error),
            _ => None,
        }
    }
}

impl Display for TagDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TagDecodeError::*;
        match self {
            UnknownTagId { id } => write!(f, "Unknown tag id: {}", id),
            NegativeLength { length } => write!(f, "Negative tag length: {}", length),
            EndElementList { length } => {
                write!(f, "List of {} elements declares End as the element kind", length)
            }
            DepthLimitExceeded => {
                write!(f, "Tags nest deeper than {} levels", MAXIMUM_TAG_DEPTH)
            }
            UnexpectedEnd => write!(f, "Data ends before the declared tag length"),
            MalformedUtf8 { .. } => write!(f, "Malformed UTF-8 string"),
            RootTagNotCompound { id } => {
                write!(f, "Root tag must be a compound but has id {}", id)
            }
            IOError { .. } => write!(f, "IO Error"),
        }
    }
}

/// Reads a named root tag expected to be a compound, keeping the root
/// name on the returned tag.
pub fn read_compound_tag<R: Read>(reader: &mut R) -> Result<CompoundTag, TagDecodeError> {
    let (name, tag) = read_tag(reader)?;

    match tag {
        Tag::Compound(mut compound_tag) => {
            compound_tag.name = Some(name);
            Ok(compound_tag)
        }
        other => Err(TagDecodeError::RootTagNotCompound { id: other.id() }),
    }
}

/// Reads one named tag: type id, name, payload. An `End` id carries
/// neither name nor payload.
pub fn read_tag<R: Read>(reader: &mut R) -> Result<(String, Tag), TagDecodeError> {
    let id = reader.read_u8()?;

    if id == TAG_END_ID {
        return Ok((String::new(), Tag::End));
    }

    let name = read_string(reader)?;
    let tag = read_payload(reader, id, 0)?;

    Ok((name, tag))
}

fn read_payload<R: Read>(reader: &mut R, id: u8, depth: usize) -> Result<Tag, TagDecodeError> {
    if depth > MAXIMUM_TAG_DEPTH {
        return Err(TagDecodeError::DepthLimitExceeded);
    }

    match id {
        TAG_END_ID => Ok(Tag::End),
        TAG_BYTE_ID => Ok(Tag::Byte(reader.read_i8()?)),
        TAG_SHORT_ID => Ok(Tag::Short(reader.read_i16::<BigEndian>()?)),
        TAG_INT_ID => Ok(Tag::Int(reader.read_i32::<BigEndian>()?)),
        TAG_LONG_ID => Ok(Tag::Long(reader.read_i64::<BigEndian>()?)),
        TAG_FLOAT_ID => Ok(Tag::Float(reader.read_f32::<BigEndian>()?)),
        TAG_DOUBLE_ID => Ok(Tag::Double(reader.read_f64::<BigEndian>()?)),
        TAG_BYTE_ARRAY_ID => {
            let length = read_length(reader)?;
            let values = read_exact_bytes(reader, length)?;

            Ok(Tag::ByteArray(values.into_iter().map(|value| value as i8).collect()))
        }
        TAG_STRING_ID => Ok(Tag::String(read_string(reader)?)),
        TAG_LIST_ID => {
            let element_id = reader.read_u8()?;
            let length = read_length(reader)?;

            // End may only describe an empty list.
            if element_id == TAG_END_ID && length > 0 {
                return Err(TagDecodeError::EndElementList { length });
            }

            let mut elements = Vec::new();

            for _ in 0..length {
                elements.push(read_payload(reader, element_id, depth + 1)?);
            }

            Ok(Tag::List(elements))
        }
        TAG_COMPOUND_ID => {
            let mut compound_tag = CompoundTag::new();

            loop {
                let entry_id = reader.read_u8()?;

                if entry_id == TAG_END_ID {
                    break;
                }

                let name = read_string(reader)?;
                let tag = read_payload(reader, entry_id, depth + 1)?;

                compound_tag.insert(name, tag);
            }

            Ok(Tag::Compound(compound_tag))
        }
        TAG_INT_ARRAY_ID => {
            let length = read_length(reader)?;
            let mut values = Vec::new();

            for _ in 0..length {
                values.push(reader.read_i32::<BigEndian>()?);
            }

            Ok(Tag::IntArray(values))
        }
        TAG_LONG_ARRAY_ID => {
            let length = read_length(reader)?;
            let mut values = Vec::new();

            for _ in 0..length {
                values.push(reader.read_i64::<BigEndian>()?);
            }

            Ok(Tag::LongArray(values))
        }
        _ => Err(TagDecodeError::UnknownTagId { id }),
    }
}

fn read_length<R: Read>(reader: &mut R) -> Result<usize, TagDecodeError> {
    let length = reader.read_i32::<BigEndian>()?;

    if length < 0 {
        return Err(TagDecodeError::NegativeLength { length });
    }

    Ok(length as usize)
}

fn read_string<R: Read>(reader: &mut R) -> Result<String, TagDecodeError> {
    let length = reader.read_u16::<BigEndian>()? as usize;
    let buffer = read_exact_bytes(reader, length)?;

    Ok(String::from_utf8(buffer)?)
}

/// Reads exactly `length` bytes without trusting the declared length
/// for the allocation size.
fn read_exact_bytes<R: Read>(reader: &mut R, length: usize) -> Result<Vec<u8>, TagDecodeError> {
    let mut buffer = Vec::new();
    reader.take(length as u64).read_to_end(&mut buffer)?;

    if buffer.len() != length {
        return Err(TagDecodeError::UnexpectedEnd);
    }

    Ok(buffer)
}
