use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::transfer_from_user_to_pool_vault;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts required for the admin to fund a new emission window.
#[derive(Accounts)]
pub struct QueueNewRewards<'info> {
    #[account(
        constraint = owner.key() == stake_ledger.admin @ ErrorCode::Unauthorized
    )]
    pub owner: Signer<'info>,

    #[account(
        seeds = [STAKE_LEDGER_SEED.as_bytes()],
        bump = stake_ledger.bump,
    )]
    pub stake_ledger: Account<'info, StakeLedger>,

    #[account(
        mut,
        has_one = reward_mint @ ErrorCode::InvalidMint,
        has_one = reward_vault,
        constraint = stake_ledger.is_registered(&reward_pool.key()) @ ErrorCode::UnregisteredRewardPool,
    )]
    pub reward_pool: Account<'info, RewardPool>,

    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Admin's funding account.
    #[account(
        mut,
        token::mint = reward_mint,
        token::authority = owner,
        token::token_program = token_program,
    )]
    pub owner_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Queues `amount` to stream over the pool's `rewards_duration`.
///
/// Emission up to now is folded into the index at the old rate first; any
/// budget still unspent in a running window is carried into the new rate.
pub fn queue_new_rewards(ctx: Context<QueueNewRewards>, amount: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let total_staked = ctx.accounts.stake_ledger.total_staked;

    let reward_pool = &mut ctx.accounts.reward_pool;
    reward_pool.queue_new_rewards(amount, total_staked, now)?;
    let PoolKind::Emission(emission) = reward_pool.kind else {
        return err!(ErrorCode::InvalidPoolKind);
    };

    transfer_from_user_to_pool_vault(
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.owner_token.to_account_info(),
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.reward_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.reward_mint.decimals,
    )?;
    msg!(
        "Queued {} at {}/s until {}",
        amount,
        emission.reward_rate,
        emission.period_finish
    );

    emit!(RewardsQueued {
        reward_pool: ctx.accounts.reward_pool.key(),
        amount,
        reward_rate: emission.reward_rate,
        period_finish: emission.period_finish,
    });
    Ok(())
}
