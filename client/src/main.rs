use anyhow::{format_err, Result};
use clap::Parser;
use colorful::{Color, Colorful};
use configparser::ini::Ini;
use serde::Serialize;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use stake_ledger::states::{PoolKind, PoolPosition, RewardPool, StakeAccount, StakeLedger};
use std::str::FromStr;

mod instructions;
use instructions::ledger_instructions::*;
use instructions::rpc::*;
use instructions::utils::*;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    http_url: String,
    ws_url: String,
    payer_path: String,
    admin_path: String,
    stake_ledger_program: Pubkey,
    stake_mint: Pubkey,
}

fn required(config: &Ini, key: &str) -> Result<String> {
    match config.get("Global", key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(format_err!("{} must not be empty", key)),
    }
}

fn parse_cfg(config: &Ini) -> Result<ClientConfig> {
    let stake_ledger_program = Pubkey::from_str(&required(config, "stake_ledger_program")?)?;
    let stake_mint = Pubkey::from_str(&required(config, "stake_mint")?)?;
    Ok(ClientConfig {
        http_url: required(config, "http_url")?,
        ws_url: required(config, "ws_url")?,
        payer_path: required(config, "payer_path")?,
        admin_path: required(config, "admin_path")?,
        stake_ledger_program,
        stake_mint,
    })
}

fn load_cfg(client_config: &str) -> Result<ClientConfig> {
    let mut config = Ini::new();
    config
        .load(client_config)
        .map_err(|e| format_err!("failed to load {}: {}", client_config, e))?;
    parse_cfg(&config)
}

fn read_keypair_file(s: &str) -> Result<Keypair> {
    solana_sdk::signature::read_keypair_file(s)
        .map_err(|_| format_err!("failed to read keypair from {}", s))
}

#[derive(Debug, Parser)]
pub struct Opts {
    /// Path of the INI file holding the `[Global]` section.
    #[arg(long, default_value = "client_config.ini")]
    pub config: String,
    #[clap(subcommand)]
    pub command: LedgerCommands,
}

#[derive(Debug, Parser)]
pub enum LedgerCommands {
    InitialiseLedger {
        #[arg(long)]
        admin: Pubkey,
        #[arg(long)]
        treasury: Pubkey,
        #[arg(long)]
        epoch_duration: u64,
        #[arg(long)]
        withdrawal_fee_rate: u64,
    },
    UpdateConfig {
        #[arg(long)]
        param: u8,
        #[arg(long, default_value_t = 0)]
        value: u64,
        /// New admin (param 0) or new treasury (param 3).
        #[arg(long)]
        account: Option<Pubkey>,
    },
    InitialiseFeePool {
        #[arg(long)]
        reward_mint: Pubkey,
        #[arg(long)]
        fee_source: Pubkey,
    },
    InitialiseEmissionPool {
        #[arg(long)]
        reward_mint: Pubkey,
        #[arg(long)]
        rewards_duration: u64,
    },
    SetRewardPools {
        #[arg(long, value_delimiter = ',')]
        pools: Vec<Pubkey>,
    },
    SetFeeSource {
        #[arg(long)]
        reward_pool: Pubkey,
        #[arg(long)]
        fee_source: Pubkey,
    },
    /// Opens the payer's position in one pool, or in every registered pool
    /// still missing one.
    OpenPosition {
        #[arg(long)]
        reward_pool: Option<Pubkey>,
    },
    Stake {
        #[arg(long)]
        amount: u64,
    },
    Withdraw {
        #[arg(long)]
        amount: u64,
    },
    /// Deposits from the payer, which must be the pool's fee source.
    DepositFee {
        #[arg(long)]
        reward_pool: Pubkey,
        #[arg(long)]
        amount: u64,
    },
    QueueNewRewards {
        #[arg(long)]
        reward_pool: Pubkey,
        #[arg(long)]
        amount: u64,
    },
    Claim {
        #[arg(long)]
        reward_pool: Pubkey,
    },
    UpdateReward {
        #[arg(long)]
        reward_pool: Pubkey,
        #[arg(long)]
        owner: Option<Pubkey>,
    },
    ShowLedger {},
    ShowPosition {
        #[arg(long)]
        owner: Option<Pubkey>,
    },
}

#[derive(Debug, Serialize)]
struct PoolReport {
    address: String,
    kind: &'static str,
    reward_mint: String,
    reward_per_weight_stored: String,
    total_funded: u64,
    total_claimed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    fee_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decimals_scale: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reward_rate: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    period_finish: Option<i64>,
}

#[derive(Debug, Serialize)]
struct LedgerReport {
    address: String,
    admin: String,
    stake_mint: String,
    treasury: String,
    epoch_duration: u64,
    withdrawal_fee_rate: u64,
    total_staked: String,
    total_fees_collected: String,
    reward_pools: Vec<PoolReport>,
}

#[derive(Debug, Serialize)]
struct PositionReport {
    reward_pool: String,
    claimable: u64,
    total_claimed: u64,
}

#[derive(Debug, Serialize)]
struct AccountReport {
    owner: String,
    principal: String,
    last_stake_time: i64,
    unlock_time: i64,
    locked: bool,
    positions: Vec<PositionReport>,
}

fn pool_report(address: &Pubkey, pool: &RewardPool) -> PoolReport {
    let (kind, fee_source, decimals_scale, reward_rate, period_finish) = match pool.kind {
        PoolKind::Fee(fee) => (
            "fee",
            Some(fee.fee_source.to_string()),
            Some(fee.decimals_scale),
            None,
            None,
        ),
        PoolKind::Emission(emission) => (
            "emission",
            None,
            None,
            Some(emission.reward_rate),
            Some(emission.period_finish),
        ),
    };
    PoolReport {
        address: address.to_string(),
        kind,
        reward_mint: pool.reward_mint.to_string(),
        reward_per_weight_stored: pool.reward_per_weight_stored.to_string(),
        total_funded: pool.total_funded,
        total_claimed: pool.total_claimed,
        fee_source,
        decimals_scale,
        reward_rate,
        period_finish,
    }
}

fn cluster_time(rpc_client: &RpcClient) -> Result<i64> {
    Ok(rpc_client.get_block_time(rpc_client.get_slot()?)?)
}

fn send_instructions(
    rpc_client: &RpcClient,
    instructions: &[Instruction],
    payer: &Keypair,
    admin: Option<&Keypair>,
) -> Result<()> {
    let mut signers = vec![payer];
    if let Some(admin) = admin {
        if admin.pubkey() != payer.pubkey() {
            signers.push(admin);
        }
    }
    let recent_hash = rpc_client.get_latest_blockhash()?;
    let txn = Transaction::new_signed_with_payer(
        instructions,
        Some(&payer.pubkey()),
        &signers,
        recent_hash,
    );
    let signature = send_txn(rpc_client, &txn, true)?;
    println!("{} {}", "confirmed".color(Color::Green), signature);
    Ok(())
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let ledger_config = load_cfg(&opts.config)?;
    let payer = read_keypair_file(&ledger_config.payer_path)?;
    let rpc_client = RpcClient::new(ledger_config.http_url.to_string());
    let program_id = ledger_config.stake_ledger_program;

    match opts.command {
        LedgerCommands::InitialiseLedger {
            admin,
            treasury,
            epoch_duration,
            withdrawal_fee_rate,
        } => {
            let instructions = initialise_ledger_instr(
                &ledger_config,
                &rpc_client,
                admin,
                treasury,
                epoch_duration,
                withdrawal_fee_rate,
            )?;
            send_instructions(&rpc_client, &instructions, &payer, None)?;
        }
        LedgerCommands::UpdateConfig {
            param,
            value,
            account,
        } => {
            let admin = read_keypair_file(&ledger_config.admin_path)?;
            let instructions =
                update_config_instr(&ledger_config, admin.pubkey(), param, value, account)?;
            send_instructions(&rpc_client, &instructions, &payer, Some(&admin))?;
        }
        LedgerCommands::InitialiseFeePool {
            reward_mint,
            fee_source,
        } => {
            let admin = read_keypair_file(&ledger_config.admin_path)?;
            let instructions = initialise_fee_pool_instr(
                &ledger_config,
                &rpc_client,
                admin.pubkey(),
                reward_mint,
                fee_source,
            )?;
            send_instructions(&rpc_client, &instructions, &payer, Some(&admin))?;
        }
        LedgerCommands::InitialiseEmissionPool {
            reward_mint,
            rewards_duration,
        } => {
            let admin = read_keypair_file(&ledger_config.admin_path)?;
            let instructions = initialise_emission_pool_instr(
                &ledger_config,
                &rpc_client,
                admin.pubkey(),
                reward_mint,
                rewards_duration,
            )?;
            send_instructions(&rpc_client, &instructions, &payer, Some(&admin))?;
        }
        LedgerCommands::SetRewardPools { pools } => {
            let admin = read_keypair_file(&ledger_config.admin_path)?;
            let instructions = set_reward_pools_instr(&ledger_config, admin.pubkey(), pools)?;
            send_instructions(&rpc_client, &instructions, &payer, Some(&admin))?;
        }
        LedgerCommands::SetFeeSource {
            reward_pool,
            fee_source,
        } => {
            let admin = read_keypair_file(&ledger_config.admin_path)?;
            let instructions =
                set_fee_source_instr(&ledger_config, admin.pubkey(), reward_pool, fee_source)?;
            send_instructions(&rpc_client, &instructions, &payer, Some(&admin))?;
        }
        LedgerCommands::OpenPosition { reward_pool } => {
            let owner = payer.pubkey();
            let pools = match reward_pool {
                Some(pool) => vec![pool],
                None => {
                    let ledger: StakeLedger =
                        get_anchor_account(&rpc_client, &get_stake_ledger_address(&program_id))?;
                    let mut missing = Vec::new();
                    for pool in ledger.reward_pools {
                        let position = get_pool_position_address(&pool, &owner, &program_id);
                        if get_anchor_account_opt::<PoolPosition>(&rpc_client, &position)?.is_none() {
                            missing.push(pool);
                        }
                    }
                    missing
                }
            };
            if pools.is_empty() {
                println!("all positions already open");
                return Ok(());
            }
            let mut instructions = Vec::new();
            for pool in pools {
                instructions.extend(open_position_instr(&ledger_config, owner, pool)?);
            }
            send_instructions(&rpc_client, &instructions, &payer, None)?;
        }
        LedgerCommands::Stake { amount } => {
            let instructions = stake_instr(&ledger_config, &rpc_client, payer.pubkey(), amount)?;
            send_instructions(&rpc_client, &instructions, &payer, None)?;
        }
        LedgerCommands::Withdraw { amount } => {
            let instructions =
                withdraw_instr(&ledger_config, &rpc_client, payer.pubkey(), amount)?;
            send_instructions(&rpc_client, &instructions, &payer, None)?;
        }
        LedgerCommands::DepositFee {
            reward_pool,
            amount,
        } => {
            let instructions = deposit_fee_instr(
                &ledger_config,
                &rpc_client,
                payer.pubkey(),
                reward_pool,
                amount,
            )?;
            send_instructions(&rpc_client, &instructions, &payer, None)?;
        }
        LedgerCommands::QueueNewRewards {
            reward_pool,
            amount,
        } => {
            let admin = read_keypair_file(&ledger_config.admin_path)?;
            let instructions = queue_new_rewards_instr(
                &ledger_config,
                &rpc_client,
                admin.pubkey(),
                reward_pool,
                amount,
            )?;
            send_instructions(&rpc_client, &instructions, &payer, Some(&admin))?;
        }
        LedgerCommands::Claim { reward_pool } => {
            let instructions =
                claim_instr(&ledger_config, &rpc_client, payer.pubkey(), reward_pool)?;
            send_instructions(&rpc_client, &instructions, &payer, None)?;
        }
        LedgerCommands::UpdateReward { reward_pool, owner } => {
            let owner = owner.unwrap_or_else(|| payer.pubkey());
            let instructions = update_reward_instr(&ledger_config, owner, reward_pool)?;
            send_instructions(&rpc_client, &instructions, &payer, None)?;
        }
        LedgerCommands::ShowLedger {} => {
            let address = get_stake_ledger_address(&program_id);
            let ledger: StakeLedger = get_anchor_account(&rpc_client, &address)?;
            let decimals = mint_decimals(&rpc_client.get_account(&ledger.stake_mint)?)?;
            let mut reward_pools = Vec::with_capacity(ledger.reward_pools.len());
            for pool_key in &ledger.reward_pools {
                let pool: RewardPool = get_anchor_account(&rpc_client, pool_key)?;
                reward_pools.push(pool_report(pool_key, &pool));
            }
            let report = LedgerReport {
                address: address.to_string(),
                admin: ledger.admin.to_string(),
                stake_mint: ledger.stake_mint.to_string(),
                treasury: ledger.treasury.to_string(),
                epoch_duration: ledger.epoch_duration,
                withdrawal_fee_rate: ledger.withdrawal_fee_rate,
                total_staked: ui_amount(ledger.total_staked, decimals),
                total_fees_collected: ui_amount(ledger.total_fees_collected, decimals),
                reward_pools,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        LedgerCommands::ShowPosition { owner } => {
            let owner = owner.unwrap_or_else(|| payer.pubkey());
            let ledger: StakeLedger =
                get_anchor_account(&rpc_client, &get_stake_ledger_address(&program_id))?;
            let stake_account: StakeAccount = get_anchor_account_opt(
                &rpc_client,
                &get_stake_account_address(&owner, &program_id),
            )?
            .unwrap_or_default();
            let decimals = mint_decimals(&rpc_client.get_account(&ledger.stake_mint)?)?;
            let now = cluster_time(&rpc_client)?;

            let mut positions = Vec::with_capacity(ledger.reward_pools.len());
            for pool_key in &ledger.reward_pools {
                let pool: RewardPool = get_anchor_account(&rpc_client, pool_key)?;
                let position_key = get_pool_position_address(pool_key, &owner, &program_id);
                let Some(position) =
                    get_anchor_account_opt::<PoolPosition>(&rpc_client, &position_key)?
                else {
                    continue;
                };
                let claimable = pool
                    .claimable(&position, stake_account.weight(), ledger.total_staked, now)
                    .map_err(|e| format_err!("{}", e))?;
                positions.push(PositionReport {
                    reward_pool: pool_key.to_string(),
                    claimable,
                    total_claimed: position.total_claimed,
                });
            }

            let unlock_time = ledger
                .unlock_time(&stake_account)
                .map_err(|e| format_err!("{}", e))?;
            let report = AccountReport {
                owner: owner.to_string(),
                principal: ui_amount(stake_account.principal, decimals),
                last_stake_time: stake_account.last_stake_time,
                unlock_time,
                locked: now < unlock_time,
                positions,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
