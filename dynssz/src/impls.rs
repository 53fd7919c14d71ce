use crate::marshal::{marshal_sequence, marshal_value};
use crate::size::{sequence_value_size, value_size};
use crate::ssz_type::element_hints;
use crate::unmarshal::{unmarshal_sequence, unmarshal_value};
use crate::{DynSsz, Error, SizeHint, SszType, TypeSize};

macro_rules! impl_ssz_type_for_uint {
    ($type: ident, $bytes: expr) => {
        impl_ssz_type_for_uint!($type, $bytes, {});
    };
    ($type: ident, $bytes: expr, { $($extra: tt)* }) => {
        impl SszType for $type {
            fn type_name() -> &'static str {
                stringify!($type)
            }

            fn ssz_static_size(_ctx: &DynSsz, _hints: &[SizeHint]) -> Result<TypeSize, Error> {
                Ok(TypeSize::fixed($bytes))
            }

            fn ssz_value_size(&self, _ctx: &DynSsz, _hints: &[SizeHint]) -> Result<usize, Error> {
                Ok($bytes)
            }

            fn ssz_marshal(
                &self,
                _ctx: &DynSsz,
                _hints: &[SizeHint],
                buf: &mut Vec<u8>,
            ) -> Result<(), Error> {
                buf.extend_from_slice(&self.to_le_bytes());
                Ok(())
            }

            fn ssz_unmarshal(
                _ctx: &DynSsz,
                _hints: &[SizeHint],
                bytes: &[u8],
            ) -> Result<(Self, usize), Error> {
                let raw = bytes.get(..$bytes).ok_or_else(|| Error::LengthMismatch {
                    context: stringify!($type).to_string(),
                    expected: $bytes,
                    actual: bytes.len(),
                })?;
                let mut array = [0u8; $bytes];
                array.copy_from_slice(raw);
                Ok((<$type>::from_le_bytes(array), $bytes))
            }

            $($extra)*
        }
    };
}

impl_ssz_type_for_uint!(u8, 1, {
    fn as_byte_slice(items: &[Self]) -> Option<&[u8]> {
        Some(items)
    }

    fn vec_from_bytes(bytes: &[u8]) -> Option<Vec<Self>> {
        Some(bytes.to_vec())
    }
});
impl_ssz_type_for_uint!(u16, 2);
impl_ssz_type_for_uint!(u32, 4);
impl_ssz_type_for_uint!(u64, 8);

impl SszType for bool {
    fn type_name() -> &'static str {
        "bool"
    }

    fn ssz_static_size(_ctx: &DynSsz, _hints: &[SizeHint]) -> Result<TypeSize, Error> {
        Ok(TypeSize::fixed(1))
    }

    fn ssz_value_size(&self, _ctx: &DynSsz, _hints: &[SizeHint]) -> Result<usize, Error> {
        Ok(1)
    }

    fn ssz_marshal(
        &self,
        _ctx: &DynSsz,
        _hints: &[SizeHint],
        buf: &mut Vec<u8>,
    ) -> Result<(), Error> {
        buf.push(u8::from(*self));
        Ok(())
    }

    fn ssz_unmarshal(
        _ctx: &DynSsz,
        _hints: &[SizeHint],
        bytes: &[u8],
    ) -> Result<(Self, usize), Error> {
        match bytes.first() {
            Some(0) => Ok((false, 1)),
            Some(1) => Ok((true, 1)),
            Some(other) => Err(Error::InvalidBool(*other)),
            None => Err(Error::LengthMismatch {
                context: "bool".to_string(),
                expected: 1,
                actual: 0,
            }),
        }
    }
}

fn hinted_len(hint: &SizeHint, type_name: &'static str) -> Result<Option<usize>, Error> {
    hint.literal_size()
        .map(|len| {
            usize::try_from(len).map_err(|_| Error::UnsupportedType {
                type_name,
                reason: "length annotation does not fit into usize",
            })
        })
        .transpose()
}

/// A vector of `N` elements. Consumes one size hint, which never changes `N`.
impl<T: SszType, const N: usize> SszType for [T; N] {
    fn ssz_static_size(ctx: &DynSsz, hints: &[SizeHint]) -> Result<TypeSize, Error> {
        let element = T::ssz_static_size(ctx, element_hints(hints))?;
        element.repeat(N, Self::type_name())
    }

    fn ssz_value_size(&self, ctx: &DynSsz, hints: &[SizeHint]) -> Result<usize, Error> {
        sequence_value_size(ctx, &self[..], element_hints(hints))
    }

    fn ssz_marshal(
        &self,
        ctx: &DynSsz,
        hints: &[SizeHint],
        buf: &mut Vec<u8>,
    ) -> Result<(), Error> {
        marshal_sequence(ctx, &self[..], element_hints(hints), buf)
    }

    fn ssz_unmarshal(
        ctx: &DynSsz,
        hints: &[SizeHint],
        bytes: &[u8],
    ) -> Result<(Self, usize), Error> {
        let items =
            unmarshal_sequence::<T>(ctx, Some(N), element_hints(hints), bytes, Self::type_name())?;
        let array = <[T; N]>::try_from(items).map_err(|items: Vec<T>| Error::LengthMismatch {
            context: Self::type_name().to_string(),
            expected: N,
            actual: items.len(),
        })?;
        Ok((array, bytes.len()))
    }
}

/// A vector when its size hint carries a length, a list otherwise.
impl<T: SszType> SszType for Vec<T> {
    fn ssz_static_size(ctx: &DynSsz, hints: &[SizeHint]) -> Result<TypeSize, Error> {
        let element = T::ssz_static_size(ctx, element_hints(hints))?;
        match hints.first() {
            Some(hint) => match hinted_len(hint, Self::type_name())? {
                Some(len) => Ok(element
                    .repeat(len, Self::type_name())?
                    .with_spec_value(hint.from_spec())),
                None => Ok(TypeSize::dynamic().with_spec_value(element.has_spec_value())),
            },
            None => Ok(TypeSize::dynamic().with_spec_value(element.has_spec_value())),
        }
    }

    fn ssz_value_size(&self, ctx: &DynSsz, hints: &[SizeHint]) -> Result<usize, Error> {
        sequence_value_size(ctx, self, element_hints(hints))
    }

    fn ssz_marshal(
        &self,
        ctx: &DynSsz,
        hints: &[SizeHint],
        buf: &mut Vec<u8>,
    ) -> Result<(), Error> {
        if let Some(hint) = hints.first() {
            if let Some(expected) = hinted_len(hint, Self::type_name())? {
                if self.len() != expected {
                    return Err(Error::VectorLength {
                        context: Self::type_name().to_string(),
                        expected,
                        actual: self.len(),
                    });
                }
            }
        }
        marshal_sequence(ctx, self, element_hints(hints), buf)
    }

    fn ssz_unmarshal(
        ctx: &DynSsz,
        hints: &[SizeHint],
        bytes: &[u8],
    ) -> Result<(Self, usize), Error> {
        let count = match hints.first() {
            Some(hint) => hinted_len(hint, Self::type_name())?,
            None => None,
        };
        let items =
            unmarshal_sequence::<T>(ctx, count, element_hints(hints), bytes, Self::type_name())?;
        Ok((items, bytes.len()))
    }
}

/// Encodes exactly like `T`; decoding allocates the value on the heap.
impl<T: SszType> SszType for Box<T> {
    fn type_name() -> &'static str {
        T::type_name()
    }

    fn ssz_static_size(ctx: &DynSsz, hints: &[SizeHint]) -> Result<TypeSize, Error> {
        T::ssz_static_size(ctx, hints)
    }

    fn ssz_value_size(&self, ctx: &DynSsz, hints: &[SizeHint]) -> Result<usize, Error> {
        value_size(ctx, &**self, hints)
    }

    fn ssz_marshal(
        &self,
        ctx: &DynSsz,
        hints: &[SizeHint],
        buf: &mut Vec<u8>,
    ) -> Result<(), Error> {
        marshal_value(ctx, &**self, hints, buf)
    }

    fn ssz_unmarshal(
        ctx: &DynSsz,
        hints: &[SizeHint],
        bytes: &[u8],
    ) -> Result<(Self, usize), Error> {
        let (value, consumed) = unmarshal_value::<T>(ctx, hints, bytes)?;
        Ok((Box::new(value), consumed))
    }
}
