use crate::error::ErrorCode;
use crate::{states::*, STAKE_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use std::ops::DerefMut;

/// Accounts context for `initialise_ledger`.
///
/// This handler:
/// - Creates the `StakeLedger` singleton.
/// - Creates the program-owned vault that holds all staked principal.
/// - Records the treasury token account that receives withdrawal fees.
#[derive(Accounts)]
pub struct InitialiseLedger<'info> {
    /// Deployer signer (must match the program-level admin id); pays rent.
    #[account(
        mut,
        address = crate::admin::id() @ ErrorCode::Unauthorized
    )]
    pub owner: Signer<'info>,

    /// Program authority PDA, owner of every vault.
    ///
    /// CHECK: PDA derivation enforced via seeds. Not read as an account; used as Pubkey.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(
        init,
        seeds = [STAKE_LEDGER_SEED.as_bytes()],
        bump,
        payer = owner,
        space = StakeLedger::LEN
    )]
    pub stake_ledger: Account<'info, StakeLedger>,

    /// Mint of the staked asset.
    #[account(mint::token_program = token_program)]
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Program-owned vault for staked principal.
    #[account(
        init,
        seeds = [STAKE_VAULT_SEED.as_bytes()],
        bump,
        payer = owner,
        token::mint = stake_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Fee sink; any token account of the staked mint.
    #[account(
        token::mint = stake_mint,
        token::token_program = token_program,
    )]
    pub treasury: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Writes the initial ledger configuration.
///
/// The registry starts empty; pools are attached with `set_reward_pools`
/// before anyone stakes.
pub fn initialise_ledger(
    ctx: Context<InitialiseLedger>,
    admin: Pubkey,
    epoch_duration: u64,
    withdrawal_fee_rate: u64,
) -> Result<()> {
    require_keys_neq!(admin, Pubkey::default(), ErrorCode::Unauthorized);
    i64::try_from(epoch_duration).map_err(|_| ErrorCode::InvalidDuration)?;
    StakeLedger::validate_fee_rate(withdrawal_fee_rate)?;

    let stake_ledger = ctx.accounts.stake_ledger.deref_mut();
    stake_ledger.bump = ctx.bumps.stake_ledger;
    stake_ledger.admin = admin;
    stake_ledger.stake_mint = ctx.accounts.stake_mint.key();
    stake_ledger.stake_vault = ctx.accounts.stake_vault.key();
    stake_ledger.treasury = ctx.accounts.treasury.key();
    stake_ledger.epoch_duration = epoch_duration;
    stake_ledger.withdrawal_fee_rate = withdrawal_fee_rate;
    stake_ledger.total_staked = 0;
    stake_ledger.total_fees_collected = 0;
    stake_ledger.reward_pools = Vec::new();
    msg!("Stake ledger initialized");

    emit!(LedgerInitialised {
        admin,
        stake_mint: stake_ledger.stake_mint,
        stake_vault: stake_ledger.stake_vault,
        treasury: stake_ledger.treasury,
        epoch_duration,
        withdrawal_fee_rate,
    });
    Ok(())
}
