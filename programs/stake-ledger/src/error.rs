use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    #[msg("Stake is still inside its lock window")]
    WithdrawalLocked,

    #[msg("Withdrawal exceeds staked principal")]
    InsufficientPrincipal,

    #[msg("Token transfer was rejected")]
    TransferFailed,

    #[msg("Arithmetic overflow occurred")]
    ArithmeticOverflow,

    #[msg("Signer is not permitted to perform this action")]
    Unauthorized,

    #[msg("Fee deposit with zero total weight")]
    NoStakers,

    #[msg("Invalid parameter provided")]
    InvalidParam,

    #[msg("Missing remaining account")]
    MissingRemainingAccount,

    #[msg("Remaining accounts do not match the registered reward pools")]
    RewardPoolMismatch,

    #[msg("Reward pool is not in the ledger's registry")]
    UnregisteredRewardPool,

    #[msg("Pool position does not belong to this pool and owner")]
    InvalidPoolPosition,

    #[msg("Operation not supported by this reward pool kind")]
    InvalidPoolKind,

    #[msg("Reward pool listed more than once")]
    DuplicateRewardPool,

    #[msg("Too many reward pools")]
    TooManyRewardPools,

    #[msg("Reward pools can only be replaced while nothing is staked")]
    PoolsLocked,

    #[msg("Withdrawal fee rate exceeds the fee denominator")]
    InvalidFeeRate,

    #[msg("Rewards duration must be greater than zero")]
    InvalidDuration,

    #[msg("Invalid timestamp conversion")]
    InvalidTimestamp,

    #[msg("Invalid mint account")]
    InvalidMint,
}
