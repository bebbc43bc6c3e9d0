use crate::error::ErrorCode;
use crate::{states::*, REWARD_VAULT_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `initialise_emission_pool`.
///
/// Creates a streaming reward pool for `reward_mint`. Nothing is emitted
/// until the admin calls `queue_new_rewards`.
#[derive(Accounts)]
pub struct InitialiseEmissionPool<'info> {
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
            &[EMISSION_POOL_TAG],
        ],
        bump,
        payer = owner,
        space = RewardPool::LEN
    )]
    pub reward_pool: Account<'info, RewardPool>,

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

/// `rewards_duration` is the window length, in seconds, applied to every
/// later `queue_new_rewards`.
pub fn initialise_emission_pool(
    ctx: Context<InitialiseEmissionPool>,
    rewards_duration: u64,
) -> Result<()> {
    let pool = RewardPool::new_emission(
        ctx.bumps.reward_pool,
        ctx.accounts.reward_mint.key(),
        ctx.accounts.reward_vault.key(),
        rewards_duration,
    )?;
    ctx.accounts.reward_pool.set_inner(pool);
    msg!("Emission pool initialized, duration {}s", rewards_duration);

    emit!(RewardPoolInitialised {
        reward_pool: ctx.accounts.reward_pool.key(),
        reward_mint: ctx.accounts.reward_mint.key(),
        reward_vault: ctx.accounts.reward_vault.key(),
        kind: EMISSION_POOL_TAG,
    });
    Ok(())
}
