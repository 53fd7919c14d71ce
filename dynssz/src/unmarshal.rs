use crate::{DynSsz, Error, SizeHint, SszType, BYTES_PER_LENGTH_OFFSET};

/// Decodes a value, through the fixed codec when the type may use it.
pub(crate) fn unmarshal_value<T: SszType>(
    ctx: &DynSsz,
    hints: &[SizeHint],
    bytes: &[u8],
) -> Result<(T, usize), Error> {
    match ctx.fixed_codec::<T>()? {
        Some(codec) => {
            let value = codec.decode(bytes).map_err(|e| Error::FixedCodec {
                type_name: T::type_name(),
                reason: format!("{:?}", e),
            })?;
            Ok((value, bytes.len()))
        }
        None => T::ssz_unmarshal(ctx, hints, bytes),
    }
}

/// Decodes a value that must consume all of `bytes`.
fn unmarshal_exact<T, F>(
    ctx: &DynSsz,
    hints: &[SizeHint],
    bytes: &[u8],
    context: F,
) -> Result<T, Error>
where
    T: SszType,
    F: FnOnce() -> String,
{
    let (value, consumed) = unmarshal_value::<T>(ctx, hints, bytes)?;
    if consumed != bytes.len() {
        return Err(Error::LengthMismatch {
            context: context(),
            expected: bytes.len(),
            actual: consumed,
        });
    }
    Ok(value)
}

/// Reads the 4-byte little-endian offset at `position`.
pub(crate) fn read_offset(bytes: &[u8], position: usize, context: &str) -> Result<usize, Error> {
    let end = position + BYTES_PER_LENGTH_OFFSET;
    let raw = bytes.get(position..end).ok_or_else(|| Error::LengthMismatch {
        context: context.to_string(),
        expected: end,
        actual: bytes.len(),
    })?;
    Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize)
}

/// Checks an offset read from the fixed portion of a container or list.
///
/// `previous_offset` is the offset read before this one, `num_fixed_bytes` the length of the
/// fixed portion if this is the first offset.
pub fn sanitize_offset(
    offset: usize,
    previous_offset: Option<usize>,
    num_bytes: usize,
    num_fixed_bytes: Option<usize>,
    context: &str,
) -> Result<usize, Error> {
    if num_fixed_bytes.map_or(false, |fixed_bytes| offset < fixed_bytes) {
        Err(Error::OffsetIntoFixedPortion {
            context: context.to_string(),
            offset,
        })
    } else if previous_offset.is_none()
        && num_fixed_bytes.map_or(false, |fixed_bytes| offset != fixed_bytes)
    {
        Err(Error::OffsetSkipsVariableBytes {
            context: context.to_string(),
            offset,
        })
    } else if offset > num_bytes {
        Err(Error::OffsetOutOfBounds {
            context: context.to_string(),
            offset,
        })
    } else if previous_offset.map_or(false, |prev| prev > offset) {
        Err(Error::OffsetsAreDecreasing {
            context: context.to_string(),
            offset,
        })
    } else {
        Ok(offset)
    }
}

/// Decodes the elements of a vector or list.
///
/// `count` is the element count of a vector; lists pass `None` and the count is derived from
/// the element size or from the first offset.
pub(crate) fn unmarshal_sequence<T: SszType>(
    ctx: &DynSsz,
    count: Option<usize>,
    hints: &[SizeHint],
    bytes: &[u8],
    context: &str,
) -> Result<Vec<T>, Error> {
    if let Some(items) = T::vec_from_bytes(bytes) {
        return match count {
            Some(count) if count != items.len() => Err(Error::LengthMismatch {
                context: context.to_string(),
                expected: count,
                actual: bytes.len(),
            }),
            _ => Ok(items),
        };
    }

    let size = match T::ssz_static_size(ctx, hints)?.size() {
        Some(0) => {
            return Err(Error::UnsupportedType {
                type_name: T::type_name(),
                reason: "sequence elements must not be zero-sized",
            })
        }
        Some(size) => size,
        None => return unmarshal_variable_items(ctx, count, hints, bytes, context),
    };

    let count = match count {
        Some(count) => {
            let expected = count.saturating_mul(size);
            if expected != bytes.len() {
                return Err(Error::LengthMismatch {
                    context: context.to_string(),
                    expected,
                    actual: bytes.len(),
                });
            }
            count
        }
        None if bytes.len() % size == 0 => bytes.len() / size,
        None => {
            return Err(Error::IndeterminateLength {
                context: context.to_string(),
                len: bytes.len(),
            })
        }
    };

    let mut items = Vec::with_capacity(count);
    for (i, chunk) in bytes.chunks_exact(size).enumerate() {
        items.push(unmarshal_exact(ctx, hints, chunk, || {
            format!("{}[{}]", context, i)
        })?);
    }
    Ok(items)
}

fn unmarshal_variable_items<T: SszType>(
    ctx: &DynSsz,
    count: Option<usize>,
    hints: &[SizeHint],
    bytes: &[u8],
    context: &str,
) -> Result<Vec<T>, Error> {
    if bytes.is_empty() {
        return match count {
            None | Some(0) => Ok(Vec::new()),
            Some(count) => Err(Error::LengthMismatch {
                context: context.to_string(),
                expected: count.saturating_mul(BYTES_PER_LENGTH_OFFSET),
                actual: 0,
            }),
        };
    }

    let first = read_offset(bytes, 0, context)?;
    if first == 0 || first % BYTES_PER_LENGTH_OFFSET != 0 {
        return Err(Error::IndeterminateLength {
            context: context.to_string(),
            len: bytes.len(),
        });
    }
    let first = sanitize_offset(first, None, bytes.len(), Some(first), context)?;
    let num_items = first / BYTES_PER_LENGTH_OFFSET;
    if let Some(count) = count {
        if count != num_items {
            return Err(Error::LengthMismatch {
                context: context.to_string(),
                expected: count.saturating_mul(BYTES_PER_LENGTH_OFFSET),
                actual: first,
            });
        }
    }

    let mut offsets = Vec::with_capacity(num_items);
    offsets.push(first);
    for i in 1..num_items {
        let offset = read_offset(bytes, i * BYTES_PER_LENGTH_OFFSET, context)?;
        offsets.push(sanitize_offset(
            offset,
            offsets.last().copied(),
            bytes.len(),
            None,
            context,
        )?);
    }

    let mut items = Vec::with_capacity(num_items);
    for (i, start) in offsets.iter().enumerate() {
        let end = offsets.get(i + 1).copied().unwrap_or(bytes.len());
        let item_bytes = bytes.get(*start..end).ok_or_else(|| Error::OffsetOutOfBounds {
            context: context.to_string(),
            offset: *start,
        })?;
        items.push(unmarshal_exact(ctx, hints, item_bytes, || {
            format!("{}[{}]", context, i)
        })?);
    }
    Ok(items)
}

struct FieldBytes<'a, 'h> {
    name: &'static str,
    bytes: &'a [u8],
    hints: &'h [SizeHint],
}

#[derive(Clone, Copy)]
struct FieldOffset {
    position: usize,
    offset: usize,
}

/// Splits an encoded container into the byte ranges of its fields.
///
/// Fields are registered in declaration order. Fixed-size fields take their bytes from the
/// fixed portion; variable-size fields read and sanitize their offset.
pub struct ContainerDecoderBuilder<'a, 'h> {
    ctx: &'a DynSsz,
    type_name: &'static str,
    bytes: &'a [u8],
    fields: Vec<FieldBytes<'a, 'h>>,
    offsets: Vec<FieldOffset>,
    cursor: usize,
}

impl<'a, 'h> ContainerDecoderBuilder<'a, 'h> {
    pub fn new(ctx: &'a DynSsz, type_name: &'static str, bytes: &'a [u8]) -> Self {
        Self {
            ctx,
            type_name,
            bytes,
            fields: Vec::new(),
            offsets: Vec::new(),
            cursor: 0,
        }
    }

    fn context(&self, name: &str) -> String {
        format!("{}.{}", self.type_name, name)
    }

    pub fn register<T: SszType>(
        &mut self,
        name: &'static str,
        hints: &'h [SizeHint],
    ) -> Result<(), Error> {
        let size = T::ssz_static_size(self.ctx, hints)
            .map_err(|e| e.in_field(self.type_name, name))?;
        match size.inline_size() {
            Some(size) => {
                let start = self.cursor;
                let end = start.saturating_add(size);
                let bytes = self
                    .bytes
                    .get(start..end)
                    .ok_or_else(|| Error::LengthMismatch {
                        context: self.context(name),
                        expected: end,
                        actual: self.bytes.len(),
                    })?;
                self.fields.push(FieldBytes { name, bytes, hints });
                self.cursor = end;
            }
            None => {
                let context = self.context(name);
                let offset = read_offset(self.bytes, self.cursor, &context)?;
                let offset = sanitize_offset(
                    offset,
                    self.offsets.last().map(|o| o.offset),
                    self.bytes.len(),
                    None,
                    &context,
                )?;
                self.offsets.push(FieldOffset {
                    position: self.fields.len(),
                    offset,
                });
                self.fields.push(FieldBytes {
                    name,
                    bytes: &[],
                    hints,
                });
                self.cursor += BYTES_PER_LENGTH_OFFSET;
            }
        }
        Ok(())
    }

    /// Assigns the variable part to the variable-size fields and checks that nothing is left
    /// unaccounted for.
    pub fn build(mut self) -> Result<ContainerDecoder<'a, 'h>, Error> {
        match self.offsets.first() {
            Some(first) => {
                let name = self.fields[first.position].name;
                sanitize_offset(
                    first.offset,
                    None,
                    self.bytes.len(),
                    Some(self.cursor),
                    &self.context(name),
                )?;
                for (i, offset) in self.offsets.iter().enumerate() {
                    let end = self
                        .offsets
                        .get(i + 1)
                        .map_or(self.bytes.len(), |next| next.offset);
                    // sanitized offsets never decrease and never exceed the input
                    self.fields[offset.position].bytes = &self.bytes[offset.offset..end];
                }
            }
            None if self.cursor != self.bytes.len() => {
                return Err(Error::LengthMismatch {
                    context: self.type_name.to_string(),
                    expected: self.cursor,
                    actual: self.bytes.len(),
                })
            }
            None => {}
        }
        log::trace!(
            "{}: {} fields, {} variable",
            self.type_name,
            self.fields.len(),
            self.offsets.len()
        );
        Ok(ContainerDecoder {
            ctx: self.ctx,
            type_name: self.type_name,
            fields: self.fields.into_iter(),
        })
    }
}

/// Decodes the fields split by a [`ContainerDecoderBuilder`], in registration order.
pub struct ContainerDecoder<'a, 'h> {
    ctx: &'a DynSsz,
    type_name: &'static str,
    fields: std::vec::IntoIter<FieldBytes<'a, 'h>>,
}

impl<'a, 'h> ContainerDecoder<'a, 'h> {
    pub fn decode_next<T: SszType>(&mut self) -> Result<T, Error> {
        let field = self.fields.next().ok_or(Error::UnsupportedType {
            type_name: self.type_name,
            reason: "more fields decoded than registered",
        })?;
        let (value, consumed) = unmarshal_value::<T>(self.ctx, field.hints, field.bytes)
            .map_err(|e| e.in_field(self.type_name, field.name))?;
        if consumed != field.bytes.len() {
            return Err(Error::LengthMismatch {
                context: format!("{}.{}", self.type_name, field.name),
                expected: field.bytes.len(),
                actual: consumed,
            });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_offset_must_end_fixed_portion() {
        assert!(matches!(
            sanitize_offset(4, None, 20, Some(8), "C.f"),
            Err(Error::OffsetIntoFixedPortion { offset: 4, .. })
        ));
        assert!(matches!(
            sanitize_offset(12, None, 20, Some(8), "C.f"),
            Err(Error::OffsetSkipsVariableBytes { offset: 12, .. })
        ));
        assert_eq!(sanitize_offset(8, None, 20, Some(8), "C.f").unwrap(), 8);
    }

    #[test]
    fn later_offsets() {
        assert!(matches!(
            sanitize_offset(21, Some(8), 20, None, "C.f"),
            Err(Error::OffsetOutOfBounds { offset: 21, .. })
        ));
        assert!(matches!(
            sanitize_offset(7, Some(8), 20, None, "C.f"),
            Err(Error::OffsetsAreDecreasing { offset: 7, .. })
        ));
        assert_eq!(sanitize_offset(8, Some(8), 20, None, "C.f").unwrap(), 8);
        assert_eq!(sanitize_offset(20, Some(8), 20, None, "C.f").unwrap(), 20);
    }

    #[test]
    fn short_offset() {
        assert_eq!(read_offset(&[1, 0, 0, 0], 0, "C.f").unwrap(), 1);
        assert!(matches!(
            read_offset(&[1, 0, 0], 0, "C.f"),
            Err(Error::LengthMismatch { expected: 4, actual: 3, .. })
        ));
    }
}
