#![allow(dead_code)]

use dynssz::{FixedCodec, SszType};
use ssz_derive::{Decode, Encode};
use std::cell::Cell;

#[derive(Debug, Clone, PartialEq, Eq, SszType, Encode, Decode)]
#[dynssz(fixed_codec)]
pub struct Checkpoint {
    pub epoch: u64,
    pub root: [u8; 32],
}

#[derive(Debug, Clone, PartialEq, Eq, SszType, Encode, Decode)]
#[dynssz(fixed_codec)]
pub struct Validator {
    pub pubkey_hash: [u8; 32],
    pub effective_balance: u64,
    pub slashed: bool,
    pub activation_epoch: u64,
    pub exit_epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, SszType, Encode, Decode)]
#[dynssz(fixed_codec)]
pub struct AttestationSummary {
    pub slot: u64,
    pub committee_index: u16,
    pub source: Checkpoint,
    pub target: Checkpoint,
    pub attesting_indices: Vec<u64>,
    pub aggregated: bool,
}

/// Fixed and variable fields interleaved: `a | offset(b) | c | offset(d) | b | d`.
#[derive(Debug, Clone, PartialEq, Eq, SszType)]
pub struct Interleaved {
    pub a: u32,
    pub b: Vec<u8>,
    pub c: u64,
    pub d: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, SszType)]
pub struct HistoricalSummary {
    #[dynssz(ssz_size = "4,32")]
    pub roots: Vec<Vec<u8>>,
    #[dynssz(ssz_size = "?,?")]
    pub extra_data: Vec<Vec<u8>>,
    pub validators: Vec<Validator>,
    pub justified: Box<Checkpoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, SszType)]
pub struct MalformedTag {
    #[dynssz(ssz_size = "4,x")]
    pub roots: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, SszType)]
pub struct MismatchedTags {
    #[dynssz(ssz_size = "8192", dynssz_size = "SLOTS_PER_HISTORICAL_ROOT,32")]
    pub roots: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, SszType)]
pub struct UnknownSpecValue {
    #[dynssz(ssz_size = "8", dynssz_size = "banana")]
    pub bits: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, SszType)]
pub struct NonIntegerSpecValue {
    #[dynssz(ssz_size = "4", dynssz_size = "GENESIS_FORK_VERSION")]
    pub version: Vec<u8>,
}

/// Sizes follow the active preset: 64 bits bytes on mainnet, 4 on minimal.
#[derive(Debug, Clone, PartialEq, Eq, SszType)]
#[dynssz(fixed_codec = "sync_aggregate_codec")]
pub struct SyncAggregate {
    #[dynssz(ssz_size = "64", dynssz_size = "SYNC_COMMITTEE_SIZE/8")]
    pub sync_committee_bits: Vec<u8>,
    #[dynssz(ssz_size = "96")]
    pub sync_committee_signature: Vec<u8>,
}

impl SyncAggregate {
    pub fn new(bits_len: usize) -> Self {
        Self {
            sync_committee_bits: (0..bits_len).map(|i| i as u8).collect(),
            sync_committee_signature: vec![0xc0; 96],
        }
    }
}

thread_local! {
    static SYNC_AGGREGATE_CODEC_CALLS: Cell<usize> = Cell::new(0);
}

/// How often the nominal-layout codec of [`SyncAggregate`] ran on this thread.
pub fn sync_aggregate_codec_calls() -> usize {
    SYNC_AGGREGATE_CODEC_CALLS.with(Cell::get)
}

fn count_codec_call() {
    SYNC_AGGREGATE_CODEC_CALLS.with(|calls| calls.set(calls.get() + 1));
}

const NOMINAL_BITS: usize = 64;
const SIGNATURE: usize = 96;

fn sync_aggregate_size(_value: &SyncAggregate) -> usize {
    count_codec_call();
    NOMINAL_BITS + SIGNATURE
}

fn sync_aggregate_append(value: &SyncAggregate, buf: &mut Vec<u8>) {
    count_codec_call();
    buf.extend_from_slice(&value.sync_committee_bits);
    buf.extend_from_slice(&value.sync_committee_signature);
}

fn sync_aggregate_decode(bytes: &[u8]) -> Result<SyncAggregate, ssz::DecodeError> {
    count_codec_call();
    if bytes.len() != NOMINAL_BITS + SIGNATURE {
        return Err(ssz::DecodeError::InvalidByteLength {
            len: bytes.len(),
            expected: NOMINAL_BITS + SIGNATURE,
        });
    }
    Ok(SyncAggregate {
        sync_committee_bits: bytes[..NOMINAL_BITS].to_vec(),
        sync_committee_signature: bytes[NOMINAL_BITS..].to_vec(),
    })
}

pub fn sync_aggregate_codec() -> FixedCodec<SyncAggregate> {
    FixedCodec::new(
        Some(NOMINAL_BITS + SIGNATURE),
        sync_aggregate_size,
        sync_aggregate_append,
        sync_aggregate_decode,
    )
}

#[derive(Debug, Clone, PartialEq, Eq, SszType)]
pub struct LightClientUpdate {
    pub attested_slot: u64,
    pub sync_aggregate: SyncAggregate,
    #[dynssz(ssz_size = "32", dynssz_size = "SLOTS_PER_EPOCH")]
    pub epoch_roots: Vec<[u8; 32]>,
    #[dynssz(ssz_size = "?,64", dynssz_size = "?,SYNC_COMMITTEE_SIZE/8")]
    pub participation: Vec<Vec<u8>>,
    pub finalized: Checkpoint,
}

/// `ssz_derive` writes the byte vectors as lists, which does not match the annotations.
#[derive(Debug, Clone, PartialEq, Eq, SszType, Encode, Decode)]
#[dynssz(fixed_codec)]
pub struct ListEncodedAggregate {
    #[dynssz(ssz_size = "64")]
    pub bits: Vec<u8>,
    #[dynssz(ssz_size = "96")]
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, SszType)]
pub struct AggregateEnvelope {
    pub slot: u64,
    pub aggregate: ListEncodedAggregate,
}

#[derive(Debug, Clone, PartialEq, Eq, SszType)]
pub struct BlobCarrier {
    pub a: u32,
    #[dynssz(ssz_size = "8", dynssz_size = "MAX_BLOBS")]
    pub blobs: Vec<u8>,
    pub b: u32,
}

pub fn checkpoint(epoch: u64) -> Checkpoint {
    Checkpoint {
        epoch,
        root: [epoch as u8; 32],
    }
}

pub fn validator(index: u64) -> Validator {
    Validator {
        pubkey_hash: [index as u8; 32],
        effective_balance: 32_000_000_000,
        slashed: index % 2 == 1,
        activation_epoch: index,
        exit_epoch: u64::MAX,
    }
}

pub fn attestation_summary(slot: u64, indices: usize) -> AttestationSummary {
    AttestationSummary {
        slot,
        committee_index: 3,
        source: checkpoint(slot / 32),
        target: checkpoint(slot / 32 + 1),
        attesting_indices: (0..indices as u64).map(|i| i * 7).collect(),
        aggregated: indices > 1,
    }
}
