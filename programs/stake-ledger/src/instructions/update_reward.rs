use crate::error::ErrorCode;
use crate::states::*;
use anchor_lang::prelude::*;

/// Accounts for a permissionless checkpoint of one owner in one pool.
#[derive(Accounts)]
pub struct UpdateReward<'info> {
    #[account(
        seeds = [STAKE_LEDGER_SEED.as_bytes()],
        bump = stake_ledger.bump,
    )]
    pub stake_ledger: Account<'info, StakeLedger>,

    #[account(
        seeds = [STAKE_ACCOUNT_SEED.as_bytes(), stake_account.owner.as_ref()],
        bump = stake_account.bump,
    )]
    pub stake_account: Account<'info, StakeAccount>,

    #[account(
        mut,
        constraint = stake_ledger.is_registered(&reward_pool.key()) @ ErrorCode::UnregisteredRewardPool,
    )]
    pub reward_pool: Account<'info, RewardPool>,

    #[account(
        mut,
        seeds = [
            POOL_POSITION_SEED.as_bytes(),
            reward_pool.key().as_ref(),
            stake_account.owner.as_ref(),
        ],
        bump = pool_position.bump,
    )]
    pub pool_position: Account<'info, PoolPosition>,
}

/// Settles the owner's accrual up to now without paying anything out.
pub fn update_reward(ctx: Context<UpdateReward>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let weight = ctx.accounts.stake_account.weight();
    let total_staked = ctx.accounts.stake_ledger.total_staked;

    ctx.accounts.reward_pool.checkpoint(
        &mut ctx.accounts.pool_position,
        weight,
        total_staked,
        now,
    )
}
