use crate::cache::{TypeCache, TypeCapability};
use crate::marshal::marshal_value;
use crate::size::value_size;
use crate::unmarshal::unmarshal_value;
use crate::{parse_size_hints, Error, FixedCodec, SizeHint, SpecValues, SszType, TypeSize};
use serde::Deserialize;
use std::any::TypeId;
use std::sync::Arc;

/// Codec settings that are independent of the chain configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Route types whose layout does not depend on spec values through their fixed codec.
    pub use_fixed_codec: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            use_fixed_codec: true,
        }
    }
}

impl CodecConfig {
    pub fn from_yaml_str(document: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(document)?)
    }
}

/// An SSZ codec bound to one set of spec values.
///
/// Sizes annotated with spec expressions are resolved against the spec values, so the same
/// type encodes differently under e.g. the mainnet and the minimal preset. Per-type work is
/// cached; a context can be shared between threads.
#[derive(Debug)]
pub struct DynSsz {
    spec: SpecValues,
    config: CodecConfig,
    cache: TypeCache,
}

impl DynSsz {
    pub fn new(spec: SpecValues) -> Self {
        Self::with_config(spec, CodecConfig::default())
    }

    pub fn with_config(spec: SpecValues, config: CodecConfig) -> Self {
        log::debug!(
            "Creating codec context with {} spec values, fixed codec {}",
            spec.len(),
            if config.use_fixed_codec { "enabled" } else { "disabled" }
        );
        Self {
            spec,
            config,
            cache: TypeCache::default(),
        }
    }

    pub fn spec_values(&self) -> &SpecValues {
        &self.spec
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn marshal<T: SszType>(&self, value: &T) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        self.marshal_into(value, &mut buf)?;
        Ok(buf)
    }

    /// Appends the encoding of `value` to `buf`.
    pub fn marshal_into<T: SszType>(&self, value: &T, buf: &mut Vec<u8>) -> Result<(), Error> {
        let expected = self.size(value)?;
        buf.reserve(expected);
        let start = buf.len();
        marshal_value(self, value, &[], buf)?;
        let actual = buf.len() - start;
        if actual != expected {
            return Err(Error::InternalConsistency { expected, actual });
        }
        Ok(())
    }

    /// The number of bytes [`marshal`](DynSsz::marshal) produces for `value`.
    pub fn size<T: SszType>(&self, value: &T) -> Result<usize, Error> {
        value_size(self, value, &[])
    }

    /// Decodes a `T` that spans all of `bytes`.
    pub fn unmarshal<T: SszType>(&self, bytes: &[u8]) -> Result<T, Error> {
        let (value, consumed) = unmarshal_value::<T>(self, &[], bytes)?;
        if consumed != bytes.len() {
            return Err(Error::LengthMismatch {
                context: T::type_name().to_string(),
                expected: bytes.len(),
                actual: consumed,
            });
        }
        Ok(value)
    }

    /// The static size of `T` under these spec values.
    pub fn static_size<T: SszType>(&self) -> Result<TypeSize, Error> {
        T::ssz_static_size(self, &[])
    }

    /// The cached capability of `T`. Types are classified the first time one of their values
    /// passes through the codec, and only if they have a fixed codec.
    pub fn capability<T: SszType>(&self) -> TypeCapability {
        self.cache.capability(TypeId::of::<T>())
    }

    /// Size hints of the fields of `T`, parsed from its annotations once per context.
    pub fn field_hints<T: SszType>(&self) -> Result<Arc<[Vec<SizeHint>]>, Error> {
        self.cache.field_hints_or_parse(TypeId::of::<T>(), || {
            T::field_tags()
                .iter()
                .map(|tags| parse_size_hints(&self.spec, T::type_name(), tags))
                .collect()
        })
    }

    /// The static size of container `T`, computed once per context.
    #[doc(hidden)]
    pub fn container_static_size<T, F>(&self, compute: F) -> Result<TypeSize, Error>
    where
        T: SszType,
        F: FnOnce() -> Result<TypeSize, Error>,
    {
        self.cache.static_size_or_compute(TypeId::of::<T>(), compute)
    }

    /// The fixed codec of `T`, if it has one, its layout does not depend on spec values and
    /// it matches the layout of the annotations.
    pub(crate) fn fixed_codec<T: SszType>(&self) -> Result<Option<FixedCodec<T>>, Error> {
        if !self.config.use_fixed_codec {
            return Ok(None);
        }
        let codec = match T::fixed_codec() {
            Some(codec) => codec,
            None => return Ok(None),
        };
        let capability = self
            .cache
            .capability_or_classify(TypeId::of::<T>(), || {
                let size = T::ssz_static_size(self, &[])?;
                let capability = if size.has_spec_value() {
                    TypeCapability::SpecDependent
                } else if size.size() != codec.fixed_len() {
                    log::warn!(
                        "Fixed codec of {} writes {:?} bytes, annotations describe {:?}; using the generic path",
                        T::type_name(),
                        codec.fixed_len(),
                        size.size()
                    );
                    TypeCapability::CodecMismatch
                } else {
                    TypeCapability::FixedLayout
                };
                log::debug!("Classified {} as {:?}", T::type_name(), capability);
                Ok(capability)
            })?;
        Ok((capability == TypeCapability::FixedLayout).then_some(codec))
    }
}
