use dynssz::{CodecConfig, DynSsz, Error, SpecValues};
use fixtures::*;
use hex_literal::hex;
use round_trip_test_case::RoundTripTestCase;
use std::sync::Once;

mod fixtures;
mod round_trip_test_case;

static INIT: Once = Once::new();

/// Setup function that is only run once, even if called multiple times.
fn setup() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

fn generic_ctx() -> DynSsz {
    DynSsz::with_config(
        SpecValues::mainnet(),
        CodecConfig {
            use_fixed_codec: false,
        },
    )
}

fn interleaved() -> Interleaved {
    Interleaved {
        a: 0x0102_0304,
        b: vec![0xaa, 0xbb],
        c: 5,
        d: vec![1, 2],
    }
}

const INTERLEAVED_BYTES: [u8; 26] =
    hex!("04030201 14000000 0500000000000000 16000000 aabb 01000200");

fn historical_summary() -> HistoricalSummary {
    HistoricalSummary {
        roots: (0..4).map(|i| vec![i as u8; 32]).collect(),
        extra_data: vec![vec![1, 2, 3], vec![], vec![4]],
        validators: (0..3).map(validator).collect(),
        justified: Box::new(checkpoint(9)),
    }
}

#[test]
fn variable_fields_follow_fixed_part() {
    setup();
    RoundTripTestCase::new(interleaved(), SpecValues::mainnet())
        .expect_bytes(&INTERLEAVED_BYTES)
        .execute();
}

#[test]
fn empty_variable_fields() {
    setup();
    let value = Interleaved {
        a: 0,
        b: vec![],
        c: 0,
        d: vec![],
    };
    let bytes = RoundTripTestCase::new(value, SpecValues::mainnet()).execute();
    assert_eq!(
        bytes,
        hex!("00000000 14000000 0000000000000000 14000000").to_vec()
    );
}

#[test]
fn nested_sequences_and_boxes() {
    setup();
    let case = RoundTripTestCase::new(historical_summary(), SpecValues::mainnet());
    let bytes = case.execute();
    // roots(4 * 32) | offset(extra_data) | offset(validators) | justified(40)
    assert_eq!(
        case.ctx().static_size::<HistoricalSummary>().unwrap().size(),
        None
    );
    assert_eq!(&bytes[128..132], &176u32.to_le_bytes());
    // extra_data: three offsets and four payload bytes
    assert_eq!(&bytes[132..136], &(176u32 + 12 + 4).to_le_bytes());
    assert_eq!(bytes.len(), 176 + 16 + 3 * 57);

    RoundTripTestCase::new(historical_summary(), SpecValues::mainnet())
        .generic_only()
        .expect_bytes(&bytes)
        .execute();
}

#[test]
fn short_scalar() {
    setup();
    let err = DynSsz::new(SpecValues::new())
        .unmarshal::<u64>(&[1, 2, 3])
        .unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { expected: 8, actual: 3, .. }));
}

#[test]
fn short_container() {
    setup();
    let bytes = vec![0u8; 39];
    let err = generic_ctx().unmarshal::<Checkpoint>(&bytes).unwrap_err();
    assert!(
        matches!(&err, Error::LengthMismatch { context, expected: 40, actual: 39 } if context == "Checkpoint.root")
    );

    let err = DynSsz::new(SpecValues::mainnet())
        .unmarshal::<Checkpoint>(&bytes)
        .unwrap_err();
    assert!(matches!(err, Error::FixedCodec { type_name: "Checkpoint", .. }));
}

#[test]
fn trailing_bytes_after_fixed_container() {
    setup();
    let err = generic_ctx()
        .unmarshal::<Checkpoint>(&[0u8; 41])
        .unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { expected: 40, actual: 41, .. }));
}

#[test]
fn corrupted_offsets() {
    setup();
    let ctx = DynSsz::new(SpecValues::mainnet());
    let with_offsets = |b: u32, d: u32| {
        let mut bytes = INTERLEAVED_BYTES.to_vec();
        bytes[4..8].copy_from_slice(&b.to_le_bytes());
        bytes[16..20].copy_from_slice(&d.to_le_bytes());
        bytes
    };

    assert!(matches!(
        ctx.unmarshal::<Interleaved>(&with_offsets(16, 22)),
        Err(Error::OffsetIntoFixedPortion { offset: 16, .. })
    ));
    assert!(matches!(
        ctx.unmarshal::<Interleaved>(&with_offsets(21, 22)),
        Err(Error::OffsetSkipsVariableBytes { offset: 21, .. })
    ));
    assert!(matches!(
        ctx.unmarshal::<Interleaved>(&with_offsets(20, 19)),
        Err(Error::OffsetsAreDecreasing { offset: 19, .. })
    ));
    assert!(matches!(
        ctx.unmarshal::<Interleaved>(&with_offsets(20, 40)),
        Err(Error::OffsetOutOfBounds { offset: 40, .. })
    ));
}

#[test]
fn uneven_list_names_the_field() {
    setup();
    let mut bytes = INTERLEAVED_BYTES.to_vec();
    bytes.push(0xff);
    let err = DynSsz::new(SpecValues::mainnet())
        .unmarshal::<Interleaved>(&bytes)
        .unwrap_err();
    assert_eq!(err.field_path(), vec!["Interleaved.d"]);
    assert!(matches!(err.innermost(), Error::IndeterminateLength { len: 5, .. }));
}

#[test]
fn invalid_bool_in_container() {
    setup();
    let ctx = generic_ctx();
    let mut bytes = ctx.marshal(&validator(2)).unwrap();
    bytes[40] = 2;
    let err = ctx.unmarshal::<Validator>(&bytes).unwrap_err();
    assert_eq!(err.field_path(), vec!["Validator.slashed"]);
    assert!(matches!(err.innermost(), Error::InvalidBool(2)));
}

#[test]
fn wrong_vector_length_on_encode() {
    setup();
    let ctx = DynSsz::new(SpecValues::mainnet());
    let mut value = historical_summary();
    value.roots.pop();
    let err = ctx.marshal(&value).unwrap_err();
    assert_eq!(err.field_path(), vec!["HistoricalSummary.roots"]);
    assert!(matches!(
        err.innermost(),
        Error::VectorLength { expected: 4, actual: 3, .. }
    ));

    let mut value = historical_summary();
    value.roots[1].push(0);
    assert!(matches!(
        ctx.marshal(&value).unwrap_err().innermost(),
        Error::VectorLength { expected: 32, actual: 33, .. }
    ));
}

#[test]
fn malformed_size_annotation() {
    setup();
    let err = DynSsz::new(SpecValues::mainnet())
        .static_size::<MalformedTag>()
        .unwrap_err();
    assert!(
        matches!(&err, Error::TagParse { field, token, .. } if field == "MalformedTag.roots" && token == "x")
    );
}

#[test]
fn mismatched_annotation_lengths() {
    setup();
    assert!(matches!(
        DynSsz::new(SpecValues::mainnet()).static_size::<MismatchedTags>(),
        Err(Error::TagParse { .. })
    ));
}

#[test]
fn unknown_spec_value_keeps_nominal_size() {
    setup();
    let value = UnknownSpecValue {
        bits: vec![0x0f; 8],
    };
    let case = RoundTripTestCase::new(value, SpecValues::mainnet());
    let size = case.ctx().static_size::<UnknownSpecValue>().unwrap();
    assert_eq!(size.size(), Some(8));
    assert!(!size.has_spec_value());
    assert_eq!(case.execute(), vec![0x0f; 8]);
}

#[test]
fn non_integer_spec_value() {
    setup();
    let spec = SpecValues::from_yaml_str("GENESIS_FORK_VERSION: '0x00000000'\n").unwrap();
    let err = DynSsz::new(spec)
        .static_size::<NonIntegerSpecValue>()
        .unwrap_err();
    assert!(matches!(err, Error::SpecValueType { name, .. } if name == "GENESIS_FORK_VERSION"));
}
