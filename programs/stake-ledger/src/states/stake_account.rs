use anchor_lang::prelude::*;

/// PDA seed string used to derive each owner's stake account.
pub const STAKE_ACCOUNT_SEED: &str = "stake_account";

/// Principal and lock state of a single staker.
///
/// Derived from `STAKE_ACCOUNT_SEED + owner`, created on the first stake and
/// never closed; a zero principal simply leaves it inert.
#[account]
#[derive(Default, Debug)]
pub struct StakeAccount {
    /// PDA bump for this account.
    pub bump: u8,

    /// Owner to whom this record belongs.
    pub owner: Pubkey,

    /// Staked amount in minimal units of the staked mint.
    pub principal: u64,

    /// Unix time of the most recent stake; the lock runs from here.
    pub last_stake_time: i64,
}

impl StakeAccount {
    pub const LEN: usize = 8 + 1 + 32 + 8 + 8;

    /// Non-transferable weight used to apportion rewards. Always equal to
    /// the principal.
    pub fn weight(&self) -> u64 {
        self.principal
    }
}
