use crate::error::ErrorCode;
use crate::{states::*, REWARD_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `initialise_fee_pool`.
///
/// Creates a push-model reward pool for `reward_mint` together with its
/// program-owned vault. The pool is inert until listed by `set_reward_pools`.
#[derive(Accounts)]
pub struct InitialiseFeePool<'info> {
    /// Ledger admin; pays rent.
    #[account(
        mut,
        constraint = owner.key() == stake_ledger.admin @ ErrorCode::Unauthorized
    )]
    pub owner: Signer<'info>,

    /// CHECK: PDA derivation enforced via seeds. Used as vault authority only.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(
        seeds = [STAKE_LEDGER_SEED.as_bytes()],
        bump = stake_ledger.bump,
    )]
    pub stake_ledger: Account<'info, StakeLedger>,

    #[account(mint::token_program = token_program)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        seeds = [
            REWARD_POOL_SEED.as_bytes(),
            reward_mint.key().as_ref(),
            &[FEE_POOL_TAG],
        ],
        bump,
        payer = owner,
        space = RewardPool::LEN
    )]
    pub reward_pool: Account<'info, RewardPool>,

    /// Vault paying out this pool's rewards.
    #[account(
        init,
        seeds = [REWARD_VAULT_SEED.as_bytes(), reward_pool.key().as_ref()],
        bump,
        payer = owner,
        token::mint = reward_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

pub fn initialise_fee_pool(ctx: Context<InitialiseFeePool>, fee_source: Pubkey) -> Result<()> {
    let pool = RewardPool::new_fee(
        ctx.bumps.reward_pool,
        ctx.accounts.reward_mint.key(),
        ctx.accounts.reward_vault.key(),
        fee_source,
        ctx.accounts.reward_mint.decimals,
    )?;
    ctx.accounts.reward_pool.set_inner(pool);
    msg!("Fee pool initialized, fee source {}", fee_source);

    emit!(RewardPoolInitialised {
        reward_pool: ctx.accounts.reward_pool.key(),
        reward_mint: ctx.accounts.reward_mint.key(),
        reward_vault: ctx.accounts.reward_vault.key(),
        kind: FEE_POOL_TAG,
    });
    Ok(())
}
