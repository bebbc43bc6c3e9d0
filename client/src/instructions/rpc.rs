use anchor_lang::AccountDeserialize;
use anyhow::{format_err, Result};
use solana_client::{rpc_client::RpcClient, rpc_config::RpcSendTransactionConfig};
use solana_sdk::{
    commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};

use super::utils::deserialize_anchor_account;

pub fn send_txn(client: &RpcClient, txn: &Transaction, wait_confirm: bool) -> Result<Signature> {
    Ok(client.send_and_confirm_transaction_with_spinner_and_config(
        txn,
        if wait_confirm {
            CommitmentConfig::confirmed()
        } else {
            CommitmentConfig::processed()
        },
        RpcSendTransactionConfig {
            skip_preflight: false,
            ..RpcSendTransactionConfig::default()
        },
    )?)
}

/// Fetches and decodes an account owned by the ledger program.
pub fn get_anchor_account<T: AccountDeserialize>(client: &RpcClient, addr: &Pubkey) -> Result<T> {
    let account = client
        .get_account(addr)
        .map_err(|e| format_err!("failed to load {}: {}", addr, e))?;
    deserialize_anchor_account::<T>(&account)
}

/// Like [`get_anchor_account`], but a missing account is `None`.
pub fn get_anchor_account_opt<T: AccountDeserialize>(
    client: &RpcClient,
    addr: &Pubkey,
) -> Result<Option<T>> {
    let response = client.get_account_with_commitment(addr, CommitmentConfig::confirmed())?;
    response
        .value
        .map(|account| deserialize_anchor_account::<T>(&account))
        .transpose()
}

/// Token program owning `mint` (SPL Token or Token-2022).
pub fn get_token_program(client: &RpcClient, mint: &Pubkey) -> Result<Pubkey> {
    Ok(client.get_account(mint)?.owner)
}
