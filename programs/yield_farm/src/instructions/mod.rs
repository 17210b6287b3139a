//! Farm instructions
//! Handlers wire on-chain accounts to the farm controller; all accounting lives in `farm`

pub mod admin;
pub mod initialize_farm;
pub mod add_pool;
pub mod set_pool;
pub mod set_tier;
pub mod update_market_condition;
pub mod set_multiplier_params;
pub mod set_protocol_tvl;
pub mod set_farm_params;
pub mod settle_pool;
pub mod deposit;
pub mod withdraw;
pub mod harvest;
pub mod emergency_withdraw;
pub mod pending_reward;

pub use admin::*;
#[allow(ambiguous_glob_reexports)]
pub use initialize_farm::*;
#[allow(ambiguous_glob_reexports)]
pub use add_pool::*;
#[allow(ambiguous_glob_reexports)]
pub use set_pool::*;
#[allow(ambiguous_glob_reexports)]
pub use set_tier::*;
#[allow(ambiguous_glob_reexports)]
pub use update_market_condition::*;
#[allow(ambiguous_glob_reexports)]
pub use set_multiplier_params::*;
#[allow(ambiguous_glob_reexports)]
pub use set_protocol_tvl::*;
#[allow(ambiguous_glob_reexports)]
pub use set_farm_params::*;
#[allow(ambiguous_glob_reexports)]
pub use settle_pool::*;
#[allow(ambiguous_glob_reexports)]
pub use deposit::*;
#[allow(ambiguous_glob_reexports)]
pub use withdraw::*;
#[allow(ambiguous_glob_reexports)]
pub use harvest::*;
#[allow(ambiguous_glob_reexports)]
pub use emergency_withdraw::*;
#[allow(ambiguous_glob_reexports)]
pub use pending_reward::*;
