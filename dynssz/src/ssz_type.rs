use crate::{DynSsz, Error, FieldTags, SizeHint, TypeSize};

/// A type the dynamic codec can size, encode and decode.
///
/// Implemented for `bool`, unsigned integers, fixed arrays, `Vec` and `Box`, and derived for
/// structs with `#[derive(SszType)]`. Every method receives the size hints of the position the
/// value occupies; the first hint applies to the outermost dimension of the type.
pub trait SszType: Sized + 'static {
    /// The name used in error messages and logs.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The encoded size, if it does not depend on the value.
    fn ssz_static_size(ctx: &DynSsz, hints: &[SizeHint]) -> Result<TypeSize, Error>;

    /// The exact number of bytes [`ssz_marshal`](SszType::ssz_marshal) appends for this value.
    fn ssz_value_size(&self, ctx: &DynSsz, hints: &[SizeHint]) -> Result<usize, Error>;

    fn ssz_marshal(&self, ctx: &DynSsz, hints: &[SizeHint], buf: &mut Vec<u8>)
        -> Result<(), Error>;

    /// Decodes a value from the front of `bytes` and reports how many bytes it consumed.
    ///
    /// Variable-size types consume the whole slice.
    fn ssz_unmarshal(ctx: &DynSsz, hints: &[SizeHint], bytes: &[u8]) -> Result<(Self, usize), Error>;

    /// Size annotations of container fields, in declaration order.
    fn field_tags() -> &'static [FieldTags] {
        &[]
    }

    /// A precompiled codec with the standard SSZ layout, used whenever the layout of the type
    /// does not depend on any spec value.
    fn fixed_codec() -> Option<FixedCodec<Self>> {
        None
    }

    #[doc(hidden)]
    fn as_byte_slice(_items: &[Self]) -> Option<&[u8]> {
        None
    }

    #[doc(hidden)]
    fn vec_from_bytes(_bytes: &[u8]) -> Option<Vec<Self>> {
        None
    }
}

/// Entry points of a fixed-layout codec for `T`, together with the layout it writes.
pub struct FixedCodec<T> {
    fixed_len: Option<usize>,
    size: fn(&T) -> usize,
    append: fn(&T, &mut Vec<u8>),
    decode: fn(&[u8]) -> Result<T, ssz::DecodeError>,
}

impl<T> Clone for FixedCodec<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FixedCodec<T> {}

impl<T> std::fmt::Debug for FixedCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedCodec")
            .field("fixed_len", &self.fixed_len)
            .finish_non_exhaustive()
    }
}

impl<T> FixedCodec<T> {
    /// `fixed_len` is the encoded size of every value, or `None` for variable-size encodings.
    pub fn new(
        fixed_len: Option<usize>,
        size: fn(&T) -> usize,
        append: fn(&T, &mut Vec<u8>),
        decode: fn(&[u8]) -> Result<T, ssz::DecodeError>,
    ) -> Self {
        Self {
            fixed_len,
            size,
            append,
            decode,
        }
    }

    pub fn fixed_len(&self) -> Option<usize> {
        self.fixed_len
    }

    pub fn size(&self, value: &T) -> usize {
        (self.size)(value)
    }

    pub fn append(&self, value: &T, buf: &mut Vec<u8>) {
        (self.append)(value, buf)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<T, ssz::DecodeError> {
        (self.decode)(bytes)
    }
}

impl<T: ssz::Encode + ssz::Decode> FixedCodec<T> {
    /// The `ssz` crate's `Encode`/`Decode` implementation of `T`.
    pub fn ssz() -> Self {
        let fixed_len = <T as ssz::Encode>::is_ssz_fixed_len()
            .then(<T as ssz::Encode>::ssz_fixed_len);
        Self::new(
            fixed_len,
            <T as ssz::Encode>::ssz_bytes_len,
            <T as ssz::Encode>::ssz_append,
            <T as ssz::Decode>::from_ssz_bytes,
        )
    }
}

/// Hints for the elements of a sequence whose own length is described by `hints[0]`.
pub(crate) fn element_hints(hints: &[SizeHint]) -> &[SizeHint] {
    hints.get(1..).unwrap_or(&[])
}
