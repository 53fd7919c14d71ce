use crate::{DynSsz, Error, SizeHint, SszType, BYTES_PER_LENGTH_OFFSET};

/// Encodes a value, through the fixed codec when the type may use it.
pub(crate) fn marshal_value<T: SszType>(
    ctx: &DynSsz,
    value: &T,
    hints: &[SizeHint],
    buf: &mut Vec<u8>,
) -> Result<(), Error> {
    match ctx.fixed_codec::<T>()? {
        Some(codec) => {
            codec.append(value, buf);
            Ok(())
        }
        None => value.ssz_marshal(ctx, hints, buf),
    }
}

/// Overwrites the placeholder at `position` with `offset`.
fn write_offset<F>(buf: &mut [u8], position: usize, offset: usize, context: F) -> Result<(), Error>
where
    F: FnOnce() -> String,
{
    let encoded = u32::try_from(offset)
        .map_err(|_| Error::OffsetOverflow {
            context: context(),
            offset,
        })?
        .to_le_bytes();
    let len = buf.len();
    buf.get_mut(position..position + BYTES_PER_LENGTH_OFFSET)
        .ok_or(Error::InternalConsistency {
            expected: position + BYTES_PER_LENGTH_OFFSET,
            actual: len,
        })?
        .copy_from_slice(&encoded);
    Ok(())
}

/// Encodes the elements of a vector or list.
///
/// Fixed-size elements are concatenated. Variable-size elements are preceded by a table of
/// offsets relative to the start of the sequence.
pub(crate) fn marshal_sequence<T: SszType>(
    ctx: &DynSsz,
    items: &[T],
    hints: &[SizeHint],
    buf: &mut Vec<u8>,
) -> Result<(), Error> {
    if let Some(bytes) = T::as_byte_slice(items) {
        buf.extend_from_slice(bytes);
        return Ok(());
    }
    if T::ssz_static_size(ctx, hints)?.is_fixed() {
        for item in items {
            marshal_value(ctx, item, hints, buf)?;
        }
        return Ok(());
    }

    let start = buf.len();
    buf.resize(start + items.len() * BYTES_PER_LENGTH_OFFSET, 0);
    for (i, item) in items.iter().enumerate() {
        let offset = buf.len() - start;
        write_offset(buf, start + i * BYTES_PER_LENGTH_OFFSET, offset, || {
            format!("{}[{}]", T::type_name(), i)
        })?;
        marshal_value(ctx, item, hints, buf)?;
    }
    Ok(())
}

trait MarshalField {
    fn marshal_field(&self, ctx: &DynSsz, hints: &[SizeHint], buf: &mut Vec<u8>)
        -> Result<(), Error>;
}

impl<T: SszType> MarshalField for T {
    fn marshal_field(
        &self,
        ctx: &DynSsz,
        hints: &[SizeHint],
        buf: &mut Vec<u8>,
    ) -> Result<(), Error> {
        marshal_value(ctx, self, hints, buf)
    }
}

struct PendingField<'v> {
    name: &'static str,
    placeholder: usize,
    value: &'v dyn MarshalField,
    hints: &'v [SizeHint],
}

/// Writes the fields of a container in declaration order.
///
/// Fixed-size fields are written inline. Variable-size and zero-sized fields get a 4-byte
/// offset placeholder and are appended by [`finalize`](ContainerEncoder::finalize), which
/// fills in the offsets relative to the start of the container.
pub struct ContainerEncoder<'a, 'v> {
    ctx: &'a DynSsz,
    type_name: &'static str,
    buf: &'a mut Vec<u8>,
    start: usize,
    pending: Vec<PendingField<'v>>,
}

impl<'a, 'v> ContainerEncoder<'a, 'v> {
    pub fn new(ctx: &'a DynSsz, type_name: &'static str, buf: &'a mut Vec<u8>) -> Self {
        let start = buf.len();
        Self {
            ctx,
            type_name,
            buf,
            start,
            pending: Vec::new(),
        }
    }

    pub fn append<T: SszType>(
        &mut self,
        name: &'static str,
        value: &'v T,
        hints: &'v [SizeHint],
    ) -> Result<(), Error> {
        let size = T::ssz_static_size(self.ctx, hints)
            .map_err(|e| e.in_field(self.type_name, name))?;
        if size.inline_size().is_some() {
            log::trace!("{}.{}: inline at {}", self.type_name, name, self.buf.len() - self.start);
            return marshal_value(self.ctx, value, hints, self.buf)
                .map_err(|e| e.in_field(self.type_name, name));
        }
        self.pending.push(PendingField {
            name,
            placeholder: self.buf.len(),
            value,
            hints,
        });
        self.buf.resize(self.buf.len() + BYTES_PER_LENGTH_OFFSET, 0);
        Ok(())
    }

    pub fn finalize(self) -> Result<(), Error> {
        let Self {
            ctx,
            type_name,
            buf,
            start,
            pending,
        } = self;
        for field in pending {
            let offset = buf.len() - start;
            log::trace!("{}.{}: offset {}", type_name, field.name, offset);
            write_offset(buf, field.placeholder, offset, || {
                format!("{}.{}", type_name, field.name)
            })?;
            field
                .value
                .marshal_field(ctx, field.hints, buf)
                .map_err(|e| e.in_field(type_name, field.name))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_little_endian() {
        let mut buf = vec![0u8; 8];
        write_offset(&mut buf, 2, 0x0102_0304, String::new).unwrap();
        assert_eq!(buf, [0, 0, 4, 3, 2, 1, 0, 0]);
    }

    #[test]
    fn offset_past_u32() {
        let mut buf = vec![0u8; 4];
        let err = write_offset(&mut buf, 0, u32::MAX as usize + 1, || "List[0]".to_string())
            .unwrap_err();
        assert!(matches!(err, Error::OffsetOverflow { context, .. } if context == "List[0]"));
    }
}
