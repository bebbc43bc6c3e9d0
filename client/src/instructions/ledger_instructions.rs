use anchor_client::{Client, Cluster, Program};
use anchor_lang::prelude::AccountMeta;
use anyhow::Result;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, system_program};
use spl_associated_token_account::get_associated_token_address_with_program_id;
use stake_ledger::accounts as ledger_accounts;
use stake_ledger::instruction as ledger_instructions;
use stake_ledger::states::{RewardPool, StakeLedger};
use std::rc::Rc;

use super::rpc::{get_anchor_account, get_token_program};
use super::utils::{
    get_authority_address, get_fee_pool_address, get_pool_position_address, get_reward_pool_address,
    get_reward_vault_address, get_stake_account_address, get_stake_ledger_address,
    get_stake_vault_address,
};
use super::super::{read_keypair_file, ClientConfig};

fn ledger_program(config: &ClientConfig) -> Result<Program<Rc<Keypair>>> {
    let payer = read_keypair_file(&config.payer_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    let client = Client::new(url, Rc::new(payer));
    Ok(client.program(config.stake_ledger_program)?)
}

/// `[pool, position]` metas for every registered pool, in registry order.
pub fn registry_account_metas(
    program_id: &Pubkey,
    ledger: &StakeLedger,
    owner: &Pubkey,
) -> Vec<AccountMeta> {
    ledger
        .reward_pools
        .iter()
        .flat_map(|pool| {
            [
                AccountMeta::new(*pool, false),
                AccountMeta::new(get_pool_position_address(pool, owner, program_id), false),
            ]
        })
        .collect()
}

pub fn initialise_ledger_instr(
    config: &ClientConfig,
    rpc_client: &RpcClient,
    admin: Pubkey,
    treasury: Pubkey,
    epoch_duration: u64,
    withdrawal_fee_rate: u64,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let token_program = get_token_program(rpc_client, &config.stake_mint)?;

    let instructions = program
        .request()
        .accounts(ledger_accounts::InitialiseLedger {
            owner: program.payer(),
            authority: get_authority_address(&program.id()),
            stake_ledger: get_stake_ledger_address(&program.id()),
            stake_mint: config.stake_mint,
            stake_vault: get_stake_vault_address(&program.id()),
            treasury,
            token_program,
            system_program: system_program::id(),
        })
        .args(ledger_instructions::InitialiseLedger {
            admin,
            epoch_duration,
            withdrawal_fee_rate,
        })
        .instructions()?;
    Ok(instructions)
}

/// `account` is required for param 0 (new admin) and 3 (new treasury).
pub fn update_config_instr(
    config: &ClientConfig,
    owner: Pubkey,
    param: u8,
    value: u64,
    account: Option<Pubkey>,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;

    let mut ixs = program
        .request()
        .accounts(ledger_accounts::UpdateConfig {
            owner,
            stake_ledger: get_stake_ledger_address(&program.id()),
            system_program: system_program::id(),
        })
        .args(ledger_instructions::UpdateConfig { param, value })
        .instructions()?;

    if let Some(account) = account {
        ixs[0]
            .accounts
            .push(AccountMeta::new_readonly(account, false));
    }
    Ok(ixs)
}

pub fn initialise_fee_pool_instr(
    config: &ClientConfig,
    rpc_client: &RpcClient,
    owner: Pubkey,
    reward_mint: Pubkey,
    fee_source: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let reward_pool = get_fee_pool_address(&reward_mint, &program.id());

    let instructions = program
        .request()
        .accounts(ledger_accounts::InitialiseFeePool {
            owner,
            authority: get_authority_address(&program.id()),
            stake_ledger: get_stake_ledger_address(&program.id()),
            reward_mint,
            reward_pool,
            reward_vault: get_reward_vault_address(&reward_pool, &program.id()),
            token_program: get_token_program(rpc_client, &reward_mint)?,
            system_program: system_program::id(),
        })
        .args(ledger_instructions::InitialiseFeePool { fee_source })
        .instructions()?;
    Ok(instructions)
}

pub fn initialise_emission_pool_instr(
    config: &ClientConfig,
    rpc_client: &RpcClient,
    owner: Pubkey,
    reward_mint: Pubkey,
    rewards_duration: u64,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let reward_pool = get_reward_pool_address(
        &reward_mint,
        stake_ledger::states::EMISSION_POOL_TAG,
        &program.id(),
    );

    let instructions = program
        .request()
        .accounts(ledger_accounts::InitialiseEmissionPool {
            owner,
            authority: get_authority_address(&program.id()),
            stake_ledger: get_stake_ledger_address(&program.id()),
            reward_mint,
            reward_pool,
            reward_vault: get_reward_vault_address(&reward_pool, &program.id()),
            token_program: get_token_program(rpc_client, &reward_mint)?,
            system_program: system_program::id(),
        })
        .args(ledger_instructions::InitialiseEmissionPool { rewards_duration })
        .instructions()?;
    Ok(instructions)
}

pub fn set_reward_pools_instr(
    config: &ClientConfig,
    owner: Pubkey,
    reward_pools: Vec<Pubkey>,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;

    let mut ixs = program
        .request()
        .accounts(ledger_accounts::SetRewardPools {
            owner,
            stake_ledger: get_stake_ledger_address(&program.id()),
        })
        .args(ledger_instructions::SetRewardPools {
            reward_pools: reward_pools.clone(),
        })
        .instructions()?;

    ixs[0].accounts.extend(
        reward_pools
            .iter()
            .map(|pool| AccountMeta::new_readonly(*pool, false)),
    );
    Ok(ixs)
}

pub fn set_fee_source_instr(
    config: &ClientConfig,
    owner: Pubkey,
    reward_pool: Pubkey,
    fee_source: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;

    let instructions = program
        .request()
        .accounts(ledger_accounts::SetFeeSource {
            owner,
            stake_ledger: get_stake_ledger_address(&program.id()),
            reward_pool,
        })
        .args(ledger_instructions::SetFeeSource { fee_source })
        .instructions()?;
    Ok(instructions)
}

pub fn open_position_instr(
    config: &ClientConfig,
    owner: Pubkey,
    reward_pool: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;

    let instructions = program
        .request()
        .accounts(ledger_accounts::OpenPosition {
            owner,
            stake_account: get_stake_account_address(&owner, &program.id()),
            stake_ledger: get_stake_ledger_address(&program.id()),
            reward_pool,
            pool_position: get_pool_position_address(&reward_pool, &owner, &program.id()),
            system_program: system_program::id(),
        })
        .args(ledger_instructions::OpenPosition {})
        .instructions()?;
    Ok(instructions)
}

pub fn stake_instr(
    config: &ClientConfig,
    rpc_client: &RpcClient,
    owner: Pubkey,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let stake_ledger_key = get_stake_ledger_address(&program.id());
    let ledger: StakeLedger = get_anchor_account(rpc_client, &stake_ledger_key)?;
    let token_program = get_token_program(rpc_client, &ledger.stake_mint)?;

    let mut ixs = program
        .request()
        .accounts(ledger_accounts::Stake {
            owner,
            stake_ledger: stake_ledger_key,
            stake_account: get_stake_account_address(&owner, &program.id()),
            stake_mint: ledger.stake_mint,
            owner_token: get_associated_token_address_with_program_id(
                &owner,
                &ledger.stake_mint,
                &token_program,
            ),
            stake_vault: ledger.stake_vault,
            token_program,
            system_program: system_program::id(),
        })
        .args(ledger_instructions::Stake { amount })
        .instructions()?;

    ixs[0]
        .accounts
        .extend(registry_account_metas(&program.id(), &ledger, &owner));
    Ok(ixs)
}

pub fn withdraw_instr(
    config: &ClientConfig,
    rpc_client: &RpcClient,
    owner: Pubkey,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let stake_ledger_key = get_stake_ledger_address(&program.id());
    let ledger: StakeLedger = get_anchor_account(rpc_client, &stake_ledger_key)?;
    let token_program = get_token_program(rpc_client, &ledger.stake_mint)?;

    let mut ixs = program
        .request()
        .accounts(ledger_accounts::Withdraw {
            owner,
            stake_ledger: stake_ledger_key,
            stake_account: get_stake_account_address(&owner, &program.id()),
            authority: get_authority_address(&program.id()),
            stake_mint: ledger.stake_mint,
            owner_token: get_associated_token_address_with_program_id(
                &owner,
                &ledger.stake_mint,
                &token_program,
            ),
            stake_vault: ledger.stake_vault,
            treasury: ledger.treasury,
            token_program,
        })
        .args(ledger_instructions::Withdraw { amount })
        .instructions()?;

    ixs[0]
        .accounts
        .extend(registry_account_metas(&program.id(), &ledger, &owner));
    Ok(ixs)
}

pub fn deposit_fee_instr(
    config: &ClientConfig,
    rpc_client: &RpcClient,
    fee_source: Pubkey,
    reward_pool: Pubkey,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let pool: RewardPool = get_anchor_account(rpc_client, &reward_pool)?;
    let token_program = get_token_program(rpc_client, &pool.reward_mint)?;

    let instructions = program
        .request()
        .accounts(ledger_accounts::DepositFee {
            fee_source,
            stake_ledger: get_stake_ledger_address(&program.id()),
            reward_pool,
            reward_mint: pool.reward_mint,
            source_token: get_associated_token_address_with_program_id(
                &fee_source,
                &pool.reward_mint,
                &token_program,
            ),
            reward_vault: pool.reward_vault,
            token_program,
        })
        .args(ledger_instructions::DepositFee { amount })
        .instructions()?;
    Ok(instructions)
}

pub fn queue_new_rewards_instr(
    config: &ClientConfig,
    rpc_client: &RpcClient,
    owner: Pubkey,
    reward_pool: Pubkey,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let pool: RewardPool = get_anchor_account(rpc_client, &reward_pool)?;
    let token_program = get_token_program(rpc_client, &pool.reward_mint)?;

    let instructions = program
        .request()
        .accounts(ledger_accounts::QueueNewRewards {
            owner,
            stake_ledger: get_stake_ledger_address(&program.id()),
            reward_pool,
            reward_mint: pool.reward_mint,
            owner_token: get_associated_token_address_with_program_id(
                &owner,
                &pool.reward_mint,
                &token_program,
            ),
            reward_vault: pool.reward_vault,
            token_program,
        })
        .args(ledger_instructions::QueueNewRewards { amount })
        .instructions()?;
    Ok(instructions)
}

pub fn claim_instr(
    config: &ClientConfig,
    rpc_client: &RpcClient,
    owner: Pubkey,
    reward_pool: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;
    let pool: RewardPool = get_anchor_account(rpc_client, &reward_pool)?;
    let token_program = get_token_program(rpc_client, &pool.reward_mint)?;

    let instructions = program
        .request()
        .accounts(ledger_accounts::Claim {
            owner,
            stake_ledger: get_stake_ledger_address(&program.id()),
            stake_account: get_stake_account_address(&owner, &program.id()),
            reward_pool,
            pool_position: get_pool_position_address(&reward_pool, &owner, &program.id()),
            authority: get_authority_address(&program.id()),
            reward_mint: pool.reward_mint,
            reward_vault: pool.reward_vault,
            owner_reward_token: get_associated_token_address_with_program_id(
                &owner,
                &pool.reward_mint,
                &token_program,
            ),
            token_program,
            associated_token_program: spl_associated_token_account::id(),
            system_program: system_program::id(),
        })
        .args(ledger_instructions::Claim {})
        .instructions()?;
    Ok(instructions)
}

pub fn update_reward_instr(
    config: &ClientConfig,
    owner: Pubkey,
    reward_pool: Pubkey,
) -> Result<Vec<Instruction>> {
    let program = ledger_program(config)?;

    let instructions = program
        .request()
        .accounts(ledger_accounts::UpdateReward {
            stake_ledger: get_stake_ledger_address(&program.id()),
            stake_account: get_stake_account_address(&owner, &program.id()),
            reward_pool,
            pool_position: get_pool_position_address(&reward_pool, &owner, &program.id()),
        })
        .args(ledger_instructions::UpdateReward {})
        .instructions()?;
    Ok(instructions)
}
