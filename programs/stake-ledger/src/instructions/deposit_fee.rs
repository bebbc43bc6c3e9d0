use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::transfer_from_user_to_pool_vault;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts required for the fee source to push revenue into a fee pool.
#[derive(Accounts)]
pub struct DepositFee<'info> {
    /// Configured fee source; checked against the pool in the handler.
    pub fee_source: Signer<'info>,

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

    #[account(
        mut,
        token::mint = reward_mint,
        token::authority = fee_source,
        token::token_program = token_program,
    )]
    pub source_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Distributes `amount` across the weight staked right now.
///
/// # Errors
/// - `Unauthorized`: signer is not the pool's fee source.
/// - `InvalidAmount`: zero amount.
/// - `NoStakers`: nothing staked; the deposit would be unattributable.
/// - `InvalidPoolKind`: the pool is an emission pool.
pub fn deposit_fee(ctx: Context<DepositFee>, amount: u64) -> Result<()> {
    let total_staked = ctx.accounts.stake_ledger.total_staked;
    let source = ctx.accounts.fee_source.key();

    ctx.accounts
        .reward_pool
        .deposit_fee(&source, amount, total_staked)?;

    transfer_from_user_to_pool_vault(
        ctx.accounts.fee_source.to_account_info(),
        ctx.accounts.source_token.to_account_info(),
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.reward_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.reward_mint.decimals,
    )?;

    emit!(FeeDeposited {
        reward_pool: ctx.accounts.reward_pool.key(),
        amount,
        total_staked,
        reward_per_weight_stored: ctx.accounts.reward_pool.reward_per_weight_stored,
    });
    Ok(())
}
