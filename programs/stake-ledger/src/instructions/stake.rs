use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{checkpoint_registered_pools, transfer_from_user_to_pool_vault};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use std::ops::DerefMut;

/// Accounts required for staking.
///
/// `remaining_accounts` must carry `[reward_pool, pool_position]` for every
/// registered pool, in registry order, all writable.
#[derive(Accounts)]
pub struct Stake<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKE_LEDGER_SEED.as_bytes()],
        bump = stake_ledger.bump,
    )]
    pub stake_ledger: Account<'info, StakeLedger>,

    /// Created on the first stake.
    #[account(
        init_if_needed,
        seeds = [STAKE_ACCOUNT_SEED.as_bytes(), owner.key().as_ref()],
        bump,
        payer = owner,
        space = StakeAccount::LEN
    )]
    pub stake_account: Account<'info, StakeAccount>,

    #[account(address = stake_ledger.stake_mint @ ErrorCode::InvalidMint)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Owner's source token account.
    #[account(
        mut,
        token::mint = stake_mint,
        token::authority = owner,
        token::token_program = token_program,
    )]
    pub owner_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = stake_ledger.stake_vault)]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Stakes `amount` of the staked mint.
///
/// Steps:
/// 1) Checkpoint every registered pool at the owner's pre-stake weight.
/// 2) Transfer `amount` from the owner into the stake vault.
/// 3) Credit principal and the ledger total.
/// 4) Restart the lock window for the owner's whole principal.
pub fn stake<'info>(ctx: Context<'_, '_, 'info, 'info, Stake<'info>>, amount: u64) -> Result<()> {
    require!(amount > 0, ErrorCode::InvalidAmount);
    let now = Clock::get()?.unix_timestamp;
    let owner = ctx.accounts.owner.key();

    let stake_account = ctx.accounts.stake_account.deref_mut();
    if stake_account.owner == Pubkey::default() {
        stake_account.bump = ctx.bumps.stake_account;
        stake_account.owner = owner;
    }

    // --- 1) Settle rewards against the pre-stake weight ---
    checkpoint_registered_pools(
        ctx.remaining_accounts,
        &ctx.accounts.stake_ledger,
        &owner,
        stake_account.weight(),
        now,
    )?;

    // --- 2) Pull tokens into the vault ---
    transfer_from_user_to_pool_vault(
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.owner_token.to_account_info(),
        ctx.accounts.stake_vault.to_account_info(),
        ctx.accounts.stake_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.stake_mint.decimals,
    )?;

    // --- 3) + 4) Principal, total and lock ---
    let stake_ledger = ctx.accounts.stake_ledger.deref_mut();
    stake_ledger.record_stake(stake_account, amount, now)?;
    let unlock_time = stake_ledger.unlock_time(stake_account)?;

    emit!(Staked {
        owner,
        amount,
        principal: stake_account.principal,
        total_staked: stake_ledger.total_staked,
        unlock_time,
    });
    Ok(())
}
