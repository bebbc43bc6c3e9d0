use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{checkpoint_registered_pools, transfer_from_pool_vault_to_user};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use std::ops::DerefMut;

/// Accounts required for withdrawing principal.
///
/// `remaining_accounts` follow the same `[reward_pool, pool_position]` layout
/// as `stake`.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKE_LEDGER_SEED.as_bytes()],
        bump = stake_ledger.bump,
    )]
    pub stake_ledger: Account<'info, StakeLedger>,

    #[account(
        mut,
        seeds = [STAKE_ACCOUNT_SEED.as_bytes(), owner.key().as_ref()],
        bump = stake_account.bump,
    )]
    pub stake_account: Account<'info, StakeAccount>,

    /// CHECK: PDA derivation enforced via seeds; signs vault transfers.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(address = stake_ledger.stake_mint @ ErrorCode::InvalidMint)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = stake_mint,
        token::token_program = token_program,
    )]
    pub owner_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut, address = stake_ledger.stake_vault)]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Receives the withdrawal fee.
    #[account(mut, address = stake_ledger.treasury)]
    pub treasury: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Withdraws `amount` of principal once the lock window has passed.
///
/// Steps:
/// 1) Validate amount, lock and principal (`InvalidAmount`,
///    `WithdrawalLocked`, `InsufficientPrincipal`).
/// 2) Checkpoint every registered pool at the pre-withdrawal weight.
/// 3) Debit principal and the ledger total; split off the fee.
/// 4) Pay `amount - fee` to the owner and `fee` to the treasury.
///
/// The lock is not touched, so further partial withdrawals stay possible.
pub fn withdraw<'info>(
    ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>,
    amount: u64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let owner = ctx.accounts.owner.key();

    // --- 1) Fail fast before loading any pool ---
    ctx.accounts
        .stake_ledger
        .check_withdrawal(&ctx.accounts.stake_account, amount, now)?;

    // --- 2) Settle rewards against the pre-withdrawal weight ---
    checkpoint_registered_pools(
        ctx.remaining_accounts,
        &ctx.accounts.stake_ledger,
        &owner,
        ctx.accounts.stake_account.weight(),
        now,
    )?;

    // --- 3) Principal and total ---
    let stake_account = ctx.accounts.stake_account.deref_mut();
    let stake_ledger = ctx.accounts.stake_ledger.deref_mut();
    let split = stake_ledger.record_withdrawal(stake_account, amount, now)?;

    // --- 4) Two-way payout from the vault ---
    let signer_seeds: &[&[&[u8]]] = &[&[crate::AUTH_SEED.as_bytes(), &[ctx.bumps.authority]]];
    transfer_from_pool_vault_to_user(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.stake_vault.to_account_info(),
        ctx.accounts.owner_token.to_account_info(),
        ctx.accounts.stake_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        split.to_owner,
        ctx.accounts.stake_mint.decimals,
        signer_seeds,
    )?;
    transfer_from_pool_vault_to_user(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.stake_vault.to_account_info(),
        ctx.accounts.treasury.to_account_info(),
        ctx.accounts.stake_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        split.fee,
        ctx.accounts.stake_mint.decimals,
        signer_seeds,
    )?;

    emit!(Withdrawn {
        owner,
        amount,
        to_owner: split.to_owner,
        fee: split.fee,
        principal: stake_account.principal,
        total_staked: stake_ledger.total_staked,
    });
    Ok(())
}
