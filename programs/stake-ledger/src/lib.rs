#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;

#[cfg(not(feature = "no-entrypoint"))]
use solana_security_txt::security_txt;

declare_id!("FMgrxUBTRc2Zz8ga9aRrBhQ9huBPCu3kU1NYHkSimKXp");

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name: "Stake Ledger",
    project_url: "https://github.com/stake-ledger/stake-ledger",
    contacts: "email:security@stake-ledger.dev",
    policy: "#/blob/main/SECURITY.md",
    preferred_languages: "en",
    source_code: "https://github.com/stake-ledger/stake-ledger"
}

/// Deployer key allowed to create the ledger and act as a fallback admin.
pub mod admin {
    use anchor_lang::prelude::declare_id;
    declare_id!("CSgbSg8kFd3v5PnTBcis7W5W7hnPhgn5RFcLTUUREWQX");
}

pub const AUTH_SEED: &str = "ledger_authority";
pub const STAKE_VAULT_SEED: &str = "stake_vault";
pub const REWARD_VAULT_SEED: &str = "reward_vault";

/// Upper bound on the registry length; every registered pool costs two
/// remaining accounts on each `stake`/`withdraw`.
pub const MAX_REWARD_POOLS: usize = 8;

pub mod error;
pub mod instructions;
pub mod math;
pub mod states;
pub mod utils;

use instructions::*;

#[program]
pub mod stake_ledger {

    use super::*;

    pub fn initialise_ledger(
        ctx: Context<InitialiseLedger>,
        admin: Pubkey,
        epoch_duration: u64,
        withdrawal_fee_rate: u64,
    ) -> Result<()> {
        instructions::initialise_ledger(ctx, admin, epoch_duration, withdrawal_fee_rate)
    }

    pub fn update_config(ctx: Context<UpdateConfig>, param: u8, value: u64) -> Result<()> {
        instructions::update_config(ctx, param, value)
    }

    pub fn initialise_fee_pool(ctx: Context<InitialiseFeePool>, fee_source: Pubkey) -> Result<()> {
        instructions::initialise_fee_pool(ctx, fee_source)
    }

    pub fn initialise_emission_pool(
        ctx: Context<InitialiseEmissionPool>,
        rewards_duration: u64,
    ) -> Result<()> {
        instructions::initialise_emission_pool(ctx, rewards_duration)
    }

    pub fn set_reward_pools<'info>(
        ctx: Context<'_, '_, 'info, 'info, SetRewardPools<'info>>,
        reward_pools: Vec<Pubkey>,
    ) -> Result<()> {
        instructions::set_reward_pools(ctx, reward_pools)
    }

    pub fn set_fee_source(ctx: Context<SetFeeSource>, fee_source: Pubkey) -> Result<()> {
        instructions::set_fee_source(ctx, fee_source)
    }

    pub fn open_position(ctx: Context<OpenPosition>) -> Result<()> {
        instructions::open_position(ctx)
    }

    pub fn stake<'info>(
        ctx: Context<'_, '_, 'info, 'info, Stake<'info>>,
        amount: u64,
    ) -> Result<()> {
        instructions::stake(ctx, amount)
    }

    pub fn withdraw<'info>(
        ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>,
        amount: u64,
    ) -> Result<()> {
        instructions::withdraw(ctx, amount)
    }

    pub fn deposit_fee(ctx: Context<DepositFee>, amount: u64) -> Result<()> {
        instructions::deposit_fee(ctx, amount)
    }

    pub fn queue_new_rewards(ctx: Context<QueueNewRewards>, amount: u64) -> Result<()> {
        instructions::queue_new_rewards(ctx, amount)
    }

    pub fn claim(ctx: Context<Claim>) -> Result<()> {
        instructions::claim(ctx)
    }

    pub fn update_reward(ctx: Context<UpdateReward>) -> Result<()> {
        instructions::update_reward(ctx)
    }

    pub fn weight_of(ctx: Context<WeightOf>) -> Result<u64> {
        instructions::weight_of(ctx)
    }

    pub fn get_claimable_reward(ctx: Context<RewardView>) -> Result<u64> {
        instructions::get_claimable_reward(ctx)
    }

    pub fn earned(ctx: Context<RewardView>) -> Result<u64> {
        instructions::earned(ctx)
    }
}
