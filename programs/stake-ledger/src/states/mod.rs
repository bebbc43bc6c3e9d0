pub mod events;
pub use events::*;

pub mod stake_ledger;
pub use stake_ledger::*;

pub mod stake_account;
pub use stake_account::*;

pub mod reward_pool;
pub use reward_pool::*;

pub mod pool_position;
pub use pool_position::*;

#[cfg(test)]
mod tests;
