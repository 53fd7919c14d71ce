//! SSZ encoding for container types whose field lengths depend on the chain configuration.
//!
//! Field sizes are annotated with a nominal value (`ssz_size`) and, optionally, an expression
//! over named spec values (`dynssz_size`). A [`DynSsz`] context resolves the expressions
//! against its [`SpecValues`]: types whose layout matches the nominal sizes keep using their
//! precompiled fixed-layout codec, all others are encoded generically.
//!
//! ```
//! use dynssz::{DynSsz, SpecValues, SszType, TypeCapability};
//!
//! #[derive(Debug, PartialEq, SszType)]
//! struct SyncAggregate {
//!     #[dynssz(ssz_size = "64", dynssz_size = "SYNC_COMMITTEE_SIZE/8")]
//!     bits: Vec<u8>,
//!     #[dynssz(ssz_size = "96")]
//!     signature: Vec<u8>,
//! }
//!
//! let minimal = DynSsz::new(SpecValues::minimal());
//! let aggregate = SyncAggregate {
//!     bits: vec![0xff; 4],
//!     signature: vec![0; 96],
//! };
//! let bytes = minimal.marshal(&aggregate).unwrap();
//! assert_eq!(bytes.len(), 100);
//! assert_eq!(minimal.unmarshal::<SyncAggregate>(&bytes).unwrap(), aggregate);
//!
//! let mainnet = DynSsz::new(SpecValues::mainnet());
//! assert_eq!(mainnet.static_size::<SyncAggregate>().unwrap().size(), Some(160));
//! assert_eq!(mainnet.capability::<SyncAggregate>(), TypeCapability::Unknown);
//! ```

extern crate self as dynssz;

mod cache;
mod codec;
mod error;
mod impls;
mod marshal;
mod size;
mod size_hint;
mod spec_values;
mod ssz_type;
mod unmarshal;

pub use cache::TypeCapability;
pub use codec::{CodecConfig, DynSsz};
pub use dynssz_derive::SszType;
pub use dynssz_spec::{MainnetPreset, MinimalPreset, Preset};
pub use error::Error;
pub use marshal::ContainerEncoder;
pub use size::{field_value_size, TypeSize, BYTES_PER_LENGTH_OFFSET};
pub use size_hint::{parse_size_hints, FieldTags, SizeHint};
pub use spec_values::{SpecValue, SpecValues};
pub use ssz_type::{FixedCodec, SszType};
pub use unmarshal::{sanitize_offset, ContainerDecoder, ContainerDecoderBuilder};

/// The fixed-layout codec crate, re-exported for `FixedCodec::new` implementations.
pub use ssz;
