//! Loading the ledger's reward-pool registry out of `remaining_accounts`.

use crate::error::ErrorCode;
use crate::states::{PoolPosition, RewardPool, StakeLedger};
use anchor_lang::prelude::*;

/// Deserializes a program-owned account of type `T`.
pub fn load_program_account<T: AccountDeserialize>(info: &AccountInfo) -> Result<T> {
    require_keys_eq!(*info.owner, crate::ID, ErrorCode::RewardPoolMismatch);
    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut &data[..])
}

/// Serializes `account` back into `info`.
pub fn store_program_account<T: AccountSerialize>(info: &AccountInfo, account: &T) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    let mut writer = data.as_mut();
    account.try_serialize(&mut writer)
}

/// Checks that `remaining_accounts` holds exactly the pools listed in
/// `reward_pools`, in order, and that each deserializes as a `RewardPool`.
pub fn verify_reward_pool_accounts(
    remaining_accounts: &[AccountInfo],
    reward_pools: &[Pubkey],
) -> Result<()> {
    require!(
        remaining_accounts.len() == reward_pools.len(),
        ErrorCode::RewardPoolMismatch
    );
    for (info, expected) in remaining_accounts.iter().zip(reward_pools) {
        require_keys_eq!(info.key(), *expected, ErrorCode::RewardPoolMismatch);
        load_program_account::<RewardPool>(info)?;
    }
    Ok(())
}

/// Checkpoints `owner` in every registered pool, before any principal change.
///
/// `remaining_accounts` must be `[pool_0, position_0, pool_1, position_1, ..]`
/// in registry order, all writable. `weight` is the owner's weight prior to
/// the pending mutation.
pub fn checkpoint_registered_pools(
    remaining_accounts: &[AccountInfo],
    ledger: &StakeLedger,
    owner: &Pubkey,
    weight: u64,
    now: i64,
) -> Result<()> {
    require!(
        remaining_accounts.len() == ledger.reward_pools.len() * 2,
        ErrorCode::RewardPoolMismatch
    );

    let mut loaded = Vec::with_capacity(ledger.reward_pools.len());
    for (pair, expected) in remaining_accounts.chunks_exact(2).zip(&ledger.reward_pools) {
        let (pool_info, position_info) = (&pair[0], &pair[1]);
        require_keys_eq!(pool_info.key(), *expected, ErrorCode::RewardPoolMismatch);
        require!(
            pool_info.is_writable && position_info.is_writable,
            ErrorCode::RewardPoolMismatch
        );

        let pool = load_program_account::<RewardPool>(pool_info)?;
        require_keys_eq!(*position_info.owner, crate::ID, ErrorCode::InvalidPoolPosition);
        let position = {
            let data = position_info.try_borrow_data()?;
            PoolPosition::try_deserialize(&mut &data[..])?
        };
        require_keys_eq!(position.pool, *expected, ErrorCode::InvalidPoolPosition);
        require_keys_eq!(position.owner, *owner, ErrorCode::InvalidPoolPosition);

        loaded.push((pool_info, position_info, pool, position));
    }

    ledger.checkpoint_pools(
        loaded
            .iter_mut()
            .map(|(_, _, pool, position)| (pool, position)),
        weight,
        now,
    )?;

    for (pool_info, position_info, pool, position) in &loaded {
        store_program_account(pool_info, pool)?;
        store_program_account(position_info, position)?;
    }
    Ok(())
}
