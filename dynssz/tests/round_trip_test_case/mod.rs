use dynssz::{CodecConfig, DynSsz, SpecValues, SszType};
use std::fmt::Debug;

/// Encodes a value through one context, checks the sizer agrees, and decodes it back.
pub struct RoundTripTestCase<T> {
    value: T,
    ctx: DynSsz,
    expected: Option<Vec<u8>>,
}

impl<T: SszType + PartialEq + Debug> RoundTripTestCase<T> {
    pub fn new(value: T, spec: SpecValues) -> Self {
        Self {
            value,
            ctx: DynSsz::new(spec),
            expected: None,
        }
    }

    pub fn generic_only(mut self) -> Self {
        self.ctx = DynSsz::with_config(
            self.ctx.spec_values().clone(),
            CodecConfig {
                use_fixed_codec: false,
            },
        );
        self
    }

    pub fn expect_bytes(mut self, expected: &[u8]) -> Self {
        self.expected = Some(expected.to_vec());
        self
    }

    pub fn ctx(&self) -> &DynSsz {
        &self.ctx
    }

    /// Runs the round trip and returns the encoding.
    pub fn execute(&self) -> Vec<u8> {
        let bytes = self.ctx.marshal(&self.value).unwrap();
        if let Some(expected) = &self.expected {
            assert_eq!(&bytes, expected);
        }
        assert_eq!(self.ctx.size(&self.value).unwrap(), bytes.len());

        let decoded = self.ctx.unmarshal::<T>(&bytes).unwrap();
        assert_eq!(decoded, self.value);

        let mut appended = vec![0xee; 3];
        self.ctx.marshal_into(&self.value, &mut appended).unwrap();
        assert_eq!(&appended[..3], &[0xee; 3]);
        assert_eq!(&appended[3..], bytes.as_slice());
        bytes
    }
}
