use anchor_lang::AccountDeserialize;
use anyhow::Result;
use solana_sdk::{account::Account, pubkey::Pubkey};
use spl_token_2022::{
    extension::StateWithExtensions,
    state::Mint,
};
use stake_ledger::states::{
    FEE_POOL_TAG, POOL_POSITION_SEED, REWARD_POOL_SEED, STAKE_ACCOUNT_SEED, STAKE_LEDGER_SEED,
};

pub fn deserialize_anchor_account<T: AccountDeserialize>(account: &Account) -> Result<T> {
    let mut data: &[u8] = &account.data;
    T::try_deserialize(&mut data).map_err(Into::into)
}

/// Decimals of a legacy or Token-2022 mint.
pub fn mint_decimals(account: &Account) -> Result<u8> {
    Ok(StateWithExtensions::<Mint>::unpack(&account.data)?.base.decimals)
}

/// Renders `amount` minimal units as a decimal string.
pub fn ui_amount(amount: u64, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let scale = 10u128.pow(decimals as u32);
    let whole = amount as u128 / scale;
    let frac = amount as u128 % scale;
    format!("{}.{:0width$}", whole, frac, width = decimals as usize)
}

pub fn get_stake_ledger_address(program_id: &Pubkey) -> Pubkey {
    let (stake_ledger, _bump) =
        Pubkey::find_program_address(&[STAKE_LEDGER_SEED.as_bytes()], program_id);
    stake_ledger
}

pub fn get_authority_address(program_id: &Pubkey) -> Pubkey {
    let (authority, _bump) =
        Pubkey::find_program_address(&[stake_ledger::AUTH_SEED.as_bytes()], program_id);
    authority
}

pub fn get_stake_vault_address(program_id: &Pubkey) -> Pubkey {
    let (stake_vault, _bump) =
        Pubkey::find_program_address(&[stake_ledger::STAKE_VAULT_SEED.as_bytes()], program_id);
    stake_vault
}

pub fn get_stake_account_address(owner: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (stake_account, _bump) = Pubkey::find_program_address(
        &[STAKE_ACCOUNT_SEED.as_bytes(), owner.as_ref()],
        program_id,
    );
    stake_account
}

/// `kind` is `FEE_POOL_TAG` or `EMISSION_POOL_TAG`.
pub fn get_reward_pool_address(reward_mint: &Pubkey, kind: u8, program_id: &Pubkey) -> Pubkey {
    let (reward_pool, _bump) = Pubkey::find_program_address(
        &[REWARD_POOL_SEED.as_bytes(), reward_mint.as_ref(), &[kind]],
        program_id,
    );
    reward_pool
}

pub fn get_fee_pool_address(reward_mint: &Pubkey, program_id: &Pubkey) -> Pubkey {
    get_reward_pool_address(reward_mint, FEE_POOL_TAG, program_id)
}

pub fn get_reward_vault_address(reward_pool: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (reward_vault, _bump) = Pubkey::find_program_address(
        &[stake_ledger::REWARD_VAULT_SEED.as_bytes(), reward_pool.as_ref()],
        program_id,
    );
    reward_vault
}

pub fn get_pool_position_address(reward_pool: &Pubkey, owner: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (pool_position, _bump) = Pubkey::find_program_address(
        &[
            POOL_POSITION_SEED.as_bytes(),
            reward_pool.as_ref(),
            owner.as_ref(),
        ],
        program_id,
    );
    pool_position
}

#[cfg(test)]
mod tests {
    use super::*;
    use stake_ledger::states::EMISSION_POOL_TAG;

    #[test]
    fn ui_amount_pads_fraction() {
        assert_eq!(ui_amount(1_990_000_000_000, 9), "1990.000000000");
        assert_eq!(ui_amount(5, 3), "0.005");
        assert_eq!(ui_amount(42, 0), "42");
    }

    #[test]
    fn pool_kinds_derive_distinct_addresses() {
        let mint = Pubkey::new_unique();
        let fee = get_fee_pool_address(&mint, &stake_ledger::ID);
        let emission = get_reward_pool_address(&mint, EMISSION_POOL_TAG, &stake_ledger::ID);
        assert_ne!(fee, emission);
        assert_ne!(
            get_reward_vault_address(&fee, &stake_ledger::ID),
            get_reward_vault_address(&emission, &stake_ledger::ID)
        );
    }

    #[test]
    fn positions_are_per_owner() {
        let pool = Pubkey::new_unique();
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        assert_ne!(
            get_pool_position_address(&pool, &a, &stake_ledger::ID),
            get_pool_position_address(&pool, &b, &stake_ledger::ID)
        );
    }
}
