use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::transfer_from_pool_vault_to_user;
use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts required to claim from one reward pool.
///
/// Funds movement: `accrued_unclaimed` moves from the pool vault to the
/// owner's ATA of the reward mint (created on demand).
#[derive(Accounts)]
pub struct Claim<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [STAKE_LEDGER_SEED.as_bytes()],
        bump = stake_ledger.bump,
    )]
    pub stake_ledger: Account<'info, StakeLedger>,

    #[account(
        seeds = [STAKE_ACCOUNT_SEED.as_bytes(), owner.key().as_ref()],
        bump = stake_account.bump,
    )]
    pub stake_account: Account<'info, StakeAccount>,

    #[account(
        mut,
        has_one = reward_mint @ ErrorCode::InvalidMint,
        has_one = reward_vault,
    )]
    pub reward_pool: Account<'info, RewardPool>,

    #[account(
        mut,
        seeds = [
            POOL_POSITION_SEED.as_bytes(),
            reward_pool.key().as_ref(),
            owner.key().as_ref(),
        ],
        bump = pool_position.bump,
    )]
    pub pool_position: Account<'info, PoolPosition>,

    /// CHECK: PDA derivation enforced via seeds; signs vault transfers.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = owner,
        associated_token::mint = reward_mint,
        associated_token::authority = owner,
        associated_token::token_program = token_program,
    )]
    pub owner_reward_token: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub associated_token_program: Program<'info, AssociatedToken>,

    pub system_program: Program<'info, System>,
}

/// Checkpoints the owner and pays out everything accrued in this pool.
///
/// A pool that has left the registry pays only what was settled while it
/// was registered. A zero payout still succeeds and emits `RewardPaid` with
/// `amount = 0`.
pub fn claim(ctx: Context<Claim>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let weight = ctx.accounts.stake_account.weight();
    let reward_pool_key = ctx.accounts.reward_pool.key();

    let reward = ctx.accounts.stake_ledger.settle_claim(
        &reward_pool_key,
        &mut ctx.accounts.reward_pool,
        &mut ctx.accounts.pool_position,
        weight,
        now,
    )?;

    transfer_from_pool_vault_to_user(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.owner_reward_token.to_account_info(),
        ctx.accounts.reward_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        reward,
        ctx.accounts.reward_mint.decimals,
        &[&[crate::AUTH_SEED.as_bytes(), &[ctx.bumps.authority]]],
    )?;

    emit!(RewardPaid {
        owner: ctx.accounts.owner.key(),
        reward_pool: ctx.accounts.reward_pool.key(),
        amount: reward,
    });
    Ok(())
}
