use crate::error::ErrorCode;
use crate::states::{FeeSourceSet, RewardPool, StakeLedger, STAKE_LEDGER_SEED};
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct SetFeeSource<'info> {
    #[account(
        constraint = owner.key() == stake_ledger.admin @ ErrorCode::Unauthorized
    )]
    pub owner: Signer<'info>,

    #[account(
        seeds = [STAKE_LEDGER_SEED.as_bytes()],
        bump = stake_ledger.bump,
    )]
    pub stake_ledger: Account<'info, StakeLedger>,

    /// Fee pool whose authorized depositor is replaced.
    #[account(mut)]
    pub reward_pool: Account<'info, RewardPool>,
}

/// Points a fee pool at a new depositor; the previous one loses access
/// immediately.
pub fn set_fee_source(ctx: Context<SetFeeSource>, fee_source: Pubkey) -> Result<()> {
    ctx.accounts.reward_pool.set_fee_source(fee_source)?;

    emit!(FeeSourceSet {
        reward_pool: ctx.accounts.reward_pool.key(),
        fee_source,
    });
    Ok(())
}
