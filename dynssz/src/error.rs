use thiserror::Error;

/// Returned when sizing, encoding or decoding a value fails.
///
/// `context` fields name the container and field (`BeaconBlock.body`) or the type being
/// processed when the failure happened.
#[derive(Debug, Error)]
pub enum Error {
    /// The type cannot be represented in SSZ, e.g. a sequence of zero-sized elements.
    #[error("unsupported type {type_name}: {reason}")]
    UnsupportedType {
        type_name: &'static str,
        reason: &'static str,
    },
    /// A size annotation token is neither a decimal, `?` nor a spec expression.
    #[error("invalid size annotation on {field}: {token:?} ({reason})")]
    TagParse {
        field: String,
        token: String,
        reason: &'static str,
    },
    /// A named spec value exists but does not hold an unsigned integer.
    #[error("spec value {name} is not an unsigned integer: {value:?}")]
    SpecValueType { name: String, value: String },
    /// A spec expression referenced only known values but could not be evaluated.
    #[error("spec expression {expression:?} cannot be evaluated: {reason}")]
    InvalidSpecExpression {
        expression: String,
        reason: &'static str,
    },
    /// Fewer or more bytes were consumed than were available for an item.
    #[error("length mismatch in {context}: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },
    /// The element count of a dynamic sequence cannot be derived from its bytes.
    #[error("cannot determine length of dynamic sequence {context} from {len} bytes")]
    IndeterminateLength { context: String, len: usize },
    /// The value sizer and the marshaler disagree. Always a bug in the codec.
    #[error("internal consistency error: sized {expected} bytes but marshalled {actual}")]
    InternalConsistency { expected: usize, actual: usize },
    /// A sequence with a literal length annotation holds a different number of elements.
    #[error("vector {context} must hold {expected} elements, got {actual}")]
    VectorLength {
        context: String,
        expected: usize,
        actual: usize,
    },
    /// An offset points back into the fixed-size portion of a container or list.
    #[error("offset {offset} in {context} points into the fixed portion")]
    OffsetIntoFixedPortion { context: String, offset: usize },
    /// The first offset does not point right behind the fixed-size portion.
    #[error("first offset {offset} in {context} skips variable bytes")]
    OffsetSkipsVariableBytes { context: String, offset: usize },
    /// An offset is smaller than the one before it.
    #[error("offset {offset} in {context} is smaller than the previous offset")]
    OffsetsAreDecreasing { context: String, offset: usize },
    /// An offset points past the end of the available bytes.
    #[error("offset {offset} in {context} is out of bounds")]
    OffsetOutOfBounds { context: String, offset: usize },
    /// The encoded data grew past what a 4-byte offset can address.
    #[error("offset {offset} in {context} does not fit into 4 bytes")]
    OffsetOverflow { context: String, offset: usize },
    #[error("invalid boolean byte {0:#04x}")]
    InvalidBool(u8),
    /// The fixed-layout codec of a type rejected its input.
    #[error("fixed codec of {type_name} failed: {reason}")]
    FixedCodec {
        type_name: &'static str,
        reason: String,
    },
    /// A chain configuration document could not be parsed.
    #[error("invalid chain configuration: {0}")]
    Config(#[from] serde_yaml::Error),
    /// Wraps an error raised while processing a container field.
    #[error("{field}: {source}")]
    InField {
        field: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn in_field(self, type_name: &str, field: &str) -> Self {
        Error::InField {
            field: format!("{}.{}", type_name, field),
            source: Box::new(self),
        }
    }

    /// The error underneath any number of field wrappers.
    pub fn innermost(&self) -> &Error {
        match self {
            Error::InField { source, .. } => source.innermost(),
            other => other,
        }
    }

    /// The field path from the outermost container down, e.g. `["Block.body", "Body.bits"]`.
    pub fn field_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        while let Error::InField { field, source } = current {
            path.push(field.as_str());
            current = source;
        }
        path
    }
}
