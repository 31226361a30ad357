use crate::nbt::{CompoundTag, Tag, TAG_COMPOUND_ID, TAG_END_ID};
use byteorder::{BigEndian, WriteBytesExt};
use std::{error::Error, fmt::Display, io, io::Write};

/// Possible errors while encoding a tag to binary data.
#[derive(Debug)]
pub enum TagEncodeError {
    /// List elements disagree on their variant kind, or a non-empty list
    /// holds End elements.
    ///
    /// This is a programming error in the tree under encoding, not an
    /// input condition.
    InvalidList { expected_id: u8, actual_id: u8 },
    /// String byte length does not fit the 2 byte length field.
    StringTooLong { length: usize },
    /// Array or list length does not fit the 4 byte length field.
    SequenceTooLong { length: usize },
    /// I/O error while writing to the underlying sink.
    IOError { io_error: io::Error },
}

impl From<io::Error> for TagEncodeError {
    fn from(io_error: io::Error) -> Self {
        TagEncodeError::IOError { io_error }
    }
}

impl Error for TagEncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TagEncodeError::IOError { io_error } => Some(io_error),
            _ => None,
        }
    }
}

impl Display for TagEncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TagEncodeError::*;
        match self {
            InvalidList {
                expected_id,
                actual_id,
            } => write!(
                f,
                "List declares element id {} but holds an element with id {}",
                expected_id, actual_id
            ),
            StringTooLong { length } => {
                write!(f, "String of {} bytes does not fit the length field", length)
            }
            SequenceTooLong { length } => {
                write!(f, "Sequence of {} elements does not fit the length field", length)
            }
            IOError { .. } => write!(f, "IO Error"),
        }
    }
}

/// Writes a root compound tag, using its own name or the empty name.
pub fn write_compound_tag<W: Write>(
    writer: &mut W,
    compound_tag: &CompoundTag,
) -> Result<(), TagEncodeError> {
    writer.write_u8(TAG_COMPOUND_ID)?;
    write_string(writer, compound_tag.name.as_deref().unwrap_or(""))?;
    write_compound_payload(writer, compound_tag)
}

/// Writes one named tag: type id, name, payload. An `End` tag carries
/// neither name nor payload.
pub fn write_tag<W: Write>(writer: &mut W, name: &str, tag: &Tag) -> Result<(), TagEncodeError> {
    writer.write_u8(tag.id())?;

    if let Tag::End = tag {
        return Ok(());
    }

    write_string(writer, name)?;
    write_payload(writer, tag)
}

fn write_payload<W: Write>(writer: &mut W, tag: &Tag) -> Result<(), TagEncodeError> {
    match tag {
        Tag::End => Ok(()),
        Tag::Byte(value) => Ok(writer.write_i8(*value)?),
        Tag::Short(value) => Ok(writer.write_i16::<BigEndian>(*value)?),
        Tag::Int(value) => Ok(writer.write_i32::<BigEndian>(*value)?),
        Tag::Long(value) => Ok(writer.write_i64::<BigEndian>(*value)?),
        Tag::Float(value) => Ok(writer.write_f32::<BigEndian>(*value)?),
        Tag::Double(value) => Ok(writer.write_f64::<BigEndian>(*value)?),
        Tag::ByteArray(values) => {
            write_length(writer, values.len())?;

            for value in values {
                writer.write_i8(*value)?;
            }

            Ok(())
        }
        Tag::String(value) => write_string(writer, value),
        Tag::List(elements) => {
            let element_id = elements.first().map(Tag::id).unwrap_or(TAG_END_ID);

            // End may only describe an empty list.
            if element_id == TAG_END_ID && !elements.is_empty() {
                return Err(TagEncodeError::InvalidList {
                    expected_id: element_id,
                    actual_id: element_id,
                });
            }

            for element in elements {
                if element.id() != element_id {
                    return Err(TagEncodeError::InvalidList {
                        expected_id: element_id,
                        actual_id: element.id(),
                    });
                }
            }

            writer.write_u8(element_id)?;
            write_length(writer, elements.len())?;

            for element in elements {
                write_payload(writer, element)?;
            }

            Ok(())
        }
        Tag::Compound(compound_tag) => write_compound_payload(writer, compound_tag),
        Tag::IntArray(values) => {
            write_length(writer, values.len())?;

            for value in values {
                writer.write_i32::<BigEndian>(*value)?;
            }

            Ok(())
        }
        Tag::LongArray(values) => {
            write_length(writer, values.len())?;

            for value in values {
                writer.write_i64::<BigEndian>(*value)?;
            }

            Ok(())
        }
    }
}

fn write_compound_payload<W: Write>(
    writer: &mut W,
    compound_tag: &CompoundTag,
) -> Result<(), TagEncodeError> {
    for (name, tag) in compound_tag.iter() {
        write_tag(writer, name, tag)?;
    }

    Ok(writer.write_u8(TAG_END_ID)?)
}

fn write_string<W: Write>(writer: &mut W, value: &str) -> Result<(), TagEncodeError> {
    if value.len() > u16::MAX as usize {
        return Err(TagEncodeError::StringTooLong {
            length: value.len(),
        });
    }

    writer.write_u16::<BigEndian>(value.len() as u16)?;
    Ok(writer.write_all(value.as_bytes())?)
}

fn write_length<W: Write>(writer: &mut W, length: usize) -> Result<(), TagEncodeError> {
    if length > i32::MAX as usize {
        return Err(TagEncodeError::SequenceTooLong { length });
    }

    Ok(writer.write_i32::<BigEndian>(length as i32)?)
}
