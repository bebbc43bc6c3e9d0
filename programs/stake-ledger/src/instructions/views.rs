use crate::error::ErrorCode;
use crate::states::*;
use anchor_lang::prelude::*;

/// Read-only access to an owner's weight.
#[derive(Accounts)]
pub struct WeightOf<'info> {
    #[account(
        seeds = [STAKE_ACCOUNT_SEED.as_bytes(), stake_account.owner.as_ref()],
        bump = stake_account.bump,
    )]
    pub stake_account: Account<'info, StakeAccount>,
}

pub fn weight_of(ctx: Context<WeightOf>) -> Result<u64> {
    Ok(ctx.accounts.stake_account.weight())
}

/// Read-only access to an owner's position in one pool.
#[derive(Accounts)]
pub struct RewardView<'info> {
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
        constraint = stake_ledger.is_registered(&reward_pool.key()) @ ErrorCode::UnregisteredRewardPool,
    )]
    pub reward_pool: Account<'info, RewardPool>,

    #[account(
        seeds = [
            POOL_POSITION_SEED.as_bytes(),
            reward_pool.key().as_ref(),
            stake_account.owner.as_ref(),
        ],
        bump = pool_position.bump,
    )]
    pub pool_position: Account<'info, PoolPosition>,
}

fn claimable_now(accounts: &RewardView) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    accounts.reward_pool.claimable(
        &accounts.pool_position,
        accounts.stake_account.weight(),
        accounts.stake_ledger.total_staked,
        now,
    )
}

/// Fee pool view: what `claim` would pay right now.
pub fn get_claimable_reward(ctx: Context<RewardView>) -> Result<u64> {
    require!(
        matches!(ctx.accounts.reward_pool.kind, PoolKind::Fee(_)),
        ErrorCode::InvalidPoolKind
    );
    claimable_now(ctx.accounts)
}

/// Emission pool view: accrual including emission since the last update.
pub fn earned(ctx: Context<RewardView>) -> Result<u64> {
    require!(
        matches!(ctx.accounts.reward_pool.kind, PoolKind::Emission(_)),
        ErrorCode::InvalidPoolKind
    );
    claimable_now(ctx.accounts)
}
