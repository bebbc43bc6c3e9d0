pub mod initialise_ledger;
pub use initialise_ledger::*;

pub mod update_config;
pub use update_config::*;

pub mod initialise_fee_pool;
pub use initialise_fee_pool::*;

pub mod initialise_emission_pool;
pub use initialise_emission_pool::*;

pub mod set_reward_pools;
pub use set_reward_pools::*;

pub mod set_fee_source;
pub use set_fee_source::*;

pub mod open_position;
pub use open_position::*;

pub mod stake;
pub use stake::*;

pub mod withdraw;
pub use withdraw::*;

pub mod deposit_fee;
pub use deposit_fee::*;

pub mod queue_new_rewards;
pub use queue_new_rewards::*;

pub mod claim;
pub use claim::*;

pub mod update_reward;
pub use update_reward::*;

pub mod views;
pub use views::*;
