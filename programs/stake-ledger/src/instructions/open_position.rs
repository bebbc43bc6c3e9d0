use crate::error::ErrorCode;
use crate::states::*;
use anchor_lang::prelude::*;
use std::ops::DerefMut;

/// Accounts context for `open_position`.
///
/// Creates the owner's stake account (if missing) and their position in one
/// registered reward pool. Positions for every registered pool must exist
/// before the owner's first `stake`, because each one is checkpointed there.
#[derive(Accounts)]
pub struct OpenPosition<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        init_if_needed,
        seeds = [STAKE_ACCOUNT_SEED.as_bytes(), owner.key().as_ref()],
        bump,
        payer = owner,
        space = StakeAccount::LEN
    )]
    pub stake_account: Account<'info, StakeAccount>,

    #[account(
        seeds = [STAKE_LEDGER_SEED.as_bytes()],
        bump = stake_ledger.bump,
    )]
    pub stake_ledger: Account<'info, StakeLedger>,

    #[account(
        constraint = stake_ledger.is_registered(&reward_pool.key()) @ ErrorCode::UnregisteredRewardPool,
    )]
    pub reward_pool: Account<'info, RewardPool>,

    #[account(
        init,
        seeds = [
            POOL_POSITION_SEED.as_bytes(),
            reward_pool.key().as_ref(),
            owner.key().as_ref(),
        ],
        bump,
        payer = owner,
        space = PoolPosition::LEN
    )]
    pub pool_position: Account<'info, PoolPosition>,

    pub system_program: Program<'info, System>,
}

/// A position opened while the owner already has weight starts at the
/// pool's current index, so it earns nothing retroactively.
pub fn open_position(ctx: Context<OpenPosition>) -> Result<()> {
    let stake_account = ctx.accounts.stake_account.deref_mut();
    if stake_account.owner == Pubkey::default() {
        stake_account.bump = ctx.bumps.stake_account;
        stake_account.owner = ctx.accounts.owner.key();
    }

    let pool_position = ctx.accounts.pool_position.deref_mut();
    pool_position.bump = ctx.bumps.pool_position;
    pool_position.pool = ctx.accounts.reward_pool.key();
    pool_position.owner = ctx.accounts.owner.key();
    pool_position.reward_per_weight_paid = ctx.accounts.reward_pool.reward_per_weight_stored;
    Ok(())
}
