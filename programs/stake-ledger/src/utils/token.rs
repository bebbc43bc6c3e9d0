use crate::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_spl::token_2022::{transfer_checked, TransferChecked};

/// Moves `amount` from a signer-owned token account into a program vault.
///
/// A zero amount is skipped without a CPI. Any rejection by the token
/// program surfaces as `TransferFailed`.
pub fn transfer_from_user_to_pool_vault<'info>(
    authority: AccountInfo<'info>,
    from: AccountInfo<'info>,
    to_vault: AccountInfo<'info>,
    mint: AccountInfo<'info>,
    token_program: AccountInfo<'info>,
    amount: u64,
    decimals: u8,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    transfer_checked(
        CpiContext::new(
            token_program,
            TransferChecked {
                from,
                to: to_vault,
                authority,
                mint,
            },
        ),
        amount,
        decimals,
    )
    .map_err(|e| {
        msg!("deposit transfer rejected: {:?}", e);
        error!(ErrorCode::TransferFailed)
    })
}

/// Moves `amount` out of a program vault, signing as the authority PDA.
pub fn transfer_from_pool_vault_to_user<'info>(
    authority: AccountInfo<'info>,
    from_vault: AccountInfo<'info>,
    to: AccountInfo<'info>,
    mint: AccountInfo<'info>,
    token_program: AccountInfo<'info>,
    amount: u64,
    decimals: u8,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    transfer_checked(
        CpiContext::new_with_signer(
            token_program,
            TransferChecked {
                from: from_vault,
                to,
                authority,
                mint,
            },
            signer_seeds,
        ),
        amount,
        decimals,
    )
    .map_err(|e| {
        msg!("vault transfer rejected: {:?}", e);
        error!(ErrorCode::TransferFailed)
    })
}
