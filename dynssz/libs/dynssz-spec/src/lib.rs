#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt::Debug;
use typenum::{
    Unsigned, U1048576, U1073741824, U1099511627776, U10, U128, U16, U16777216, U2, U2048, U256,
    U32, U4, U4096, U512, U64, U65536, U8, U8192, U90,
};

/// A consensus preset: the compile-time constants that bound SSZ list and vector lengths.
///
/// The codec reads these through their upper-case config names (see [`Preset::values`]), so
/// a type annotated with `dynssz_size = "SYNC_COMMITTEE_SIZE"` picks up whichever preset the
/// codec was built with.
pub trait Preset: 'static + Default + Debug {
    const NAME: &'static str;

    // phase0
    type SlotsPerEpoch: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type MaxCommitteesPerSlot: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type TargetCommitteeSize: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type MaxValidatorsPerCommittee: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type ShuffleRoundCount: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type EpochsPerHistoricalVector: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type EpochsPerSlashingsVector: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type SlotsPerHistoricalRoot: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type HistoricalRootsLimit: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type ValidatorRegistryLimit: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type EpochsPerEth1VotingPeriod: Unsigned + Clone + Sync + Send + Debug + PartialEq;

    // block body operation limits
    type MaxProposerSlashings: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type MaxAttesterSlashings: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type MaxAttestations: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type MaxDeposits: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type MaxVoluntaryExits: Unsigned + Clone + Sync + Send + Debug + PartialEq;

    // altair
    type SyncCommitteeSize: Unsigned + Clone + Sync + Send + Debug + PartialEq;

    // bellatrix
    type BytesPerLogsBloom: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type MaxExtraDataBytes: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type MaxBytesPerTransaction: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type MaxTransactionsPerPayload: Unsigned + Clone + Sync + Send + Debug + PartialEq;

    // capella
    type MaxWithdrawalsPerPayload: Unsigned + Clone + Sync + Send + Debug + PartialEq;
    type MaxBlsToExecutionChanges: Unsigned + Clone + Sync + Send + Debug + PartialEq;

    // deneb
    type MaxBlobCommitmentsPerBlock: Unsigned + Clone + Sync + Send + Debug + PartialEq;

    fn slots_per_epoch() -> u64 {
        Self::SlotsPerEpoch::to_u64()
    }

    fn sync_committee_size() -> u64 {
        Self::SyncCommitteeSize::to_u64()
    }

    fn max_validators_per_committee() -> u64 {
        Self::MaxValidatorsPerCommittee::to_u64()
    }

    /// All constants of the preset keyed by their chain-config name.
    fn values() -> Vec<(&'static str, u64)> {
        alloc::vec![
            ("SLOTS_PER_EPOCH", Self::SlotsPerEpoch::to_u64()),
            ("MAX_COMMITTEES_PER_SLOT", Self::MaxCommitteesPerSlot::to_u64()),
            ("TARGET_COMMITTEE_SIZE", Self::TargetCommitteeSize::to_u64()),
            ("MAX_VALIDATORS_PER_COMMITTEE", Self::MaxValidatorsPerCommittee::to_u64()),
            ("SHUFFLE_ROUND_COUNT", Self::ShuffleRoundCount::to_u64()),
            ("EPOCHS_PER_HISTORICAL_VECTOR", Self::EpochsPerHistoricalVector::to_u64()),
            ("EPOCHS_PER_SLASHINGS_VECTOR", Self::EpochsPerSlashingsVector::to_u64()),
            ("SLOTS_PER_HISTORICAL_ROOT", Self::SlotsPerHistoricalRoot::to_u64()),
            ("HISTORICAL_ROOTS_LIMIT", Self::HistoricalRootsLimit::to_u64()),
            ("VALIDATOR_REGISTRY_LIMIT", Self::ValidatorRegistryLimit::to_u64()),
            ("EPOCHS_PER_ETH1_VOTING_PERIOD", Self::EpochsPerEth1VotingPeriod::to_u64()),
            ("MAX_PROPOSER_SLASHINGS", Self::MaxProposerSlashings::to_u64()),
            ("MAX_ATTESTER_SLASHINGS", Self::MaxAttesterSlashings::to_u64()),
            ("MAX_ATTESTATIONS", Self::MaxAttestations::to_u64()),
            ("MAX_DEPOSITS", Self::MaxDeposits::to_u64()),
            ("MAX_VOLUNTARY_EXITS", Self::MaxVoluntaryExits::to_u64()),
            ("SYNC_COMMITTEE_SIZE", Self::SyncCommitteeSize::to_u64()),
            ("BYTES_PER_LOGS_BLOOM", Self::BytesPerLogsBloom::to_u64()),
            ("MAX_EXTRA_DATA_BYTES", Self::MaxExtraDataBytes::to_u64()),
            ("MAX_BYTES_PER_TRANSACTION", Self::MaxBytesPerTransaction::to_u64()),
            ("MAX_TRANSACTIONS_PER_PAYLOAD", Self::MaxTransactionsPerPayload::to_u64()),
            ("MAX_WITHDRAWALS_PER_PAYLOAD", Self::MaxWithdrawalsPerPayload::to_u64()),
            ("MAX_BLS_TO_EXECUTION_CHANGES", Self::MaxBlsToExecutionChanges::to_u64()),
            ("MAX_BLOB_COMMITMENTS_PER_BLOCK", Self::MaxBlobCommitmentsPerBlock::to_u64()),
        ]
    }
}

/// Ethereum Foundation mainnet preset.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct MainnetPreset;

impl Preset for MainnetPreset {
    const NAME: &'static str = "mainnet";

    type SlotsPerEpoch = U32;
    type MaxCommitteesPerSlot = U64;
    type TargetCommitteeSize = U128;
    type MaxValidatorsPerCommittee = U2048;
    type ShuffleRoundCount = U90;
    type EpochsPerHistoricalVector = U65536;
    type EpochsPerSlashingsVector = U8192;
    type SlotsPerHistoricalRoot = U8192;
    type HistoricalRootsLimit = U16777216;
    type ValidatorRegistryLimit = U1099511627776;
    type EpochsPerEth1VotingPeriod = U64;

    type MaxProposerSlashings = U16;
    type MaxAttesterSlashings = U2;
    type MaxAttestations = U128;
    type MaxDeposits = U16;
    type MaxVoluntaryExits = U16;

    type SyncCommitteeSize = U512;

    type BytesPerLogsBloom = U256;
    type MaxExtraDataBytes = U32;
    type MaxBytesPerTransaction = U1073741824;
    type MaxTransactionsPerPayload = U1048576;

    type MaxWithdrawalsPerPayload = U16;
    type MaxBlsToExecutionChanges = U16;

    type MaxBlobCommitmentsPerBlock = U4096;
}

/// Ethereum Foundation minimal preset, as defined in the consensus-specs repo.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct MinimalPreset;

impl Preset for MinimalPreset {
    const NAME: &'static str = "minimal";

    type SlotsPerEpoch = U8;
    type MaxCommitteesPerSlot = U4;
    type TargetCommitteeSize = U4;
    type MaxValidatorsPerCommittee = U2048;
    type ShuffleRoundCount = U10;
    type EpochsPerHistoricalVector = U64;
    type EpochsPerSlashingsVector = U64;
    type SlotsPerHistoricalRoot = U64;
    type HistoricalRootsLimit = U16777216;
    type ValidatorRegistryLimit = U1099511627776;
    type EpochsPerEth1VotingPeriod = U4;

    type MaxProposerSlashings = U16;
    type MaxAttesterSlashings = U2;
    type MaxAttestations = U128;
    type MaxDeposits = U16;
    type MaxVoluntaryExits = U16;

    type SyncCommitteeSize = U32;

    type BytesPerLogsBloom = U256;
    type MaxExtraDataBytes = U32;
    type MaxBytesPerTransaction = U1073741824;
    type MaxTransactionsPerPayload = U1048576;

    type MaxWithdrawalsPerPayload = U4;
    type MaxBlsToExecutionChanges = U16;

    // deneb value; chain configs for later forks override it
    type MaxBlobCommitmentsPerBlock = U16;
}
