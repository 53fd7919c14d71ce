use crate::{DynSsz, Error, SizeHint, SszType};

/// Number of bytes used to encode an offset into the variable part of a container or list.
pub const BYTES_PER_LENGTH_OFFSET: usize = 4;

/// The static size of a type under a set of size hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSize {
    size: Option<usize>,
    has_spec_value: bool,
}

impl TypeSize {
    pub const fn fixed(size: usize) -> Self {
        Self {
            size: Some(size),
            has_spec_value: false,
        }
    }

    pub const fn dynamic() -> Self {
        Self {
            size: None,
            has_spec_value: false,
        }
    }

    pub fn with_spec_value(mut self, has_spec_value: bool) -> Self {
        self.has_spec_value |= has_spec_value;
        self
    }

    /// The encoded size, or `None` if it depends on the value.
    pub fn size(&self) -> Option<usize> {
        self.size
    }

    pub fn is_fixed(&self) -> bool {
        self.size.is_some()
    }

    /// The size a container field occupies inline. Zero-sized fields are placed behind an
    /// offset like variable-size ones.
    pub fn inline_size(&self) -> Option<usize> {
        self.size.filter(|&size| size > 0)
    }

    /// Whether any part of the layout was resolved from a spec value.
    pub fn has_spec_value(&self) -> bool {
        self.has_spec_value
    }

    /// Appends a container field: sizes add up, one dynamic or zero-sized field makes the
    /// container dynamic.
    pub fn concat(self, field: TypeSize) -> Self {
        let size = match (self.size, field.inline_size()) {
            (Some(a), Some(b)) => a.checked_add(b),
            _ => None,
        };
        Self {
            size,
            has_spec_value: self.has_spec_value || field.has_spec_value,
        }
    }

    /// `count` repetitions of an element of this size.
    pub fn repeat(self, count: usize, type_name: &'static str) -> Result<Self, Error> {
        let size = match self.size {
            Some(size) => Some(size.checked_mul(count).ok_or(Error::UnsupportedType {
                type_name,
                reason: "encoded size overflows usize",
            })?),
            None => None,
        };
        Ok(Self {
            size,
            has_spec_value: self.has_spec_value,
        })
    }
}

/// Size of a value, through the fixed codec when the type may use it.
pub(crate) fn value_size<T: SszType>(
    ctx: &DynSsz,
    value: &T,
    hints: &[SizeHint],
) -> Result<usize, Error> {
    match ctx.fixed_codec::<T>()? {
        Some(codec) => Ok(codec.size(value)),
        None => value.ssz_value_size(ctx, hints),
    }
}

/// The bytes a container field contributes: its inline size, or an offset plus its
/// variable-size encoding.
pub fn field_value_size<T: SszType>(
    ctx: &DynSsz,
    value: &T,
    hints: &[SizeHint],
) -> Result<usize, Error> {
    match T::ssz_static_size(ctx, hints)?.inline_size() {
        Some(size) => Ok(size),
        None => Ok(BYTES_PER_LENGTH_OFFSET + value_size(ctx, value, hints)?),
    }
}

pub(crate) fn sequence_value_size<T: SszType>(
    ctx: &DynSsz,
    items: &[T],
    hints: &[SizeHint],
) -> Result<usize, Error> {
    if let Some(bytes) = T::as_byte_slice(items) {
        return Ok(bytes.len());
    }
    if let Some(size) = T::ssz_static_size(ctx, hints)?.size() {
        return size
            .checked_mul(items.len())
            .ok_or(Error::UnsupportedType {
                type_name: T::type_name(),
                reason: "encoded size overflows usize",
            });
    }
    items.iter().try_fold(0usize, |total, item| {
        Ok(total + BYTES_PER_LENGTH_OFFSET + value_size(ctx, item, hints)?)
    })
}
