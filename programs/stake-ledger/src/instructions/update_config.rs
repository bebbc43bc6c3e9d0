use crate::error::ErrorCode;
use crate::states::{ConfigUpdated, StakeLedger, STAKE_LEDGER_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

/// Accounts context for the `update_config` instruction.
///
/// Only the ledger's current `admin` or the program-level `admin` id may
/// call it.
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    /// Authorized signer: must be the stored admin or the hardcoded program admin.
    #[account(
        constraint = (owner.key() == stake_ledger.admin || owner.key() == crate::admin::id()) @ ErrorCode::Unauthorized
    )]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKE_LEDGER_SEED.as_bytes()],
        bump = stake_ledger.bump,
    )]
    pub stake_ledger: Account<'info, StakeLedger>,

    pub system_program: Program<'info, System>,
}

/// Updates one field of the ledger configuration.
///
/// # Param Mapping
/// - `0`: **Admin change** → new admin Pubkey passed via `remaining_accounts[0]`.
/// - `1`: **epoch_duration** → lock window in seconds (u64). Applies to
///   existing locks too, since unlock time is derived on every withdrawal.
/// - `2`: **withdrawal_fee_rate** → numerator over `FEE_RATE_DENOMINATOR_VALUE`.
/// - `3`: **Treasury change** → token account of the staked mint passed via
///   `remaining_accounts[0]`.
///
/// Any other `param` value returns `ErrorCode::InvalidParam`.
///
/// # Example
/// ```ignore
/// // One-day lock
/// update_config(ctx, 1, 86_400)?;
///
/// // 0.5% withdrawal fee
/// update_config(ctx, 2, 5_000)?;
/// ```
pub fn update_config(ctx: Context<UpdateConfig>, param: u8, value: u64) -> Result<()> {
    let stake_ledger = &mut ctx.accounts.stake_ledger;
    match param {
        0 => {
            let new_admin = *ctx
                .remaining_accounts
                .iter()
                .next()
                .ok_or(error!(ErrorCode::MissingRemainingAccount))?
                .key;
            require_keys_neq!(new_admin, Pubkey::default());
            stake_ledger.admin = new_admin;
        }
        1 => {
            i64::try_from(value).map_err(|_| ErrorCode::InvalidDuration)?;
            stake_ledger.epoch_duration = value;
        }
        2 => {
            StakeLedger::validate_fee_rate(value)?;
            stake_ledger.withdrawal_fee_rate = value;
        }
        3 => {
            let treasury_info = ctx
                .remaining_accounts
                .iter()
                .next()
                .ok_or(error!(ErrorCode::MissingRemainingAccount))?;
            let treasury = {
                let data = treasury_info.try_borrow_data()?;
                TokenAccount::try_deserialize(&mut &data[..])?
            };
            require_keys_eq!(treasury.mint, stake_ledger.stake_mint, ErrorCode::InvalidMint);
            stake_ledger.treasury = treasury_info.key();
        }
        _ => return Err(error!(ErrorCode::InvalidParam)),
    }

    emit!(ConfigUpdated {
        admin: stake_ledger.admin,
        treasury: stake_ledger.treasury,
        epoch_duration: stake_ledger.epoch_duration,
        withdrawal_fee_rate: stake_ledger.withdrawal_fee_rate,
    });
    Ok(())
}
