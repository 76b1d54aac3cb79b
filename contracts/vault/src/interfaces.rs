//! Client interfaces for the vault's external collaborators.
//!
//! The vault never holds a concrete pool or swap implementation; it stores
//! contract addresses and dispatches through these capability sets. One
//! staking-pool implementation exists per pool family, all exposing the same
//! surface.

use soroban_sdk::{contractclient, Address, Env};

/// Staking pool client interface.
///
/// `pool_id` is an opaque handle distinguishing one staking position among
/// several managed by the same pool contract. Balances are reported net of
/// any withdrawal penalty the pool would apply.
#[contractclient(name = "StakingPoolClient")]
pub trait StakingPool {
    /// Pulls `amount` of the pool's deposit token from `from` and credits
    /// the position. The pool may shave its own entry fee off the credit.
    fn stake(e: Env, pool_id: u64, from: Address, amount: i128);

    /// Debits `amount` from the position and pays out to `to`, net of the
    /// pool's exit fee. Traps when `amount` exceeds the position.
    fn unstake(e: Env, pool_id: u64, to: Address, amount: i128);

    /// Best-effort full withdrawal to `to`. May forfeit unclaimed rewards
    /// and apply an emergency penalty.
    fn emergency_unstake(e: Env, pool_id: u64, to: Address);

    /// Claims accrued pool-native reward tokens to `to`.
    fn harvest_rewards(e: Env, pool_id: u64, to: Address);

    /// Unclaimed pool-native reward accrual for `holder`.
    fn pending_reward_estimate(e: Env, pool_id: u64, holder: Address) -> i128;

    /// Current staked position of `holder`, net of withdrawal penalty.
    fn staked_balance(e: Env, pool_id: u64, holder: Address) -> i128;

    /// Entry fee the pool charges on stakes, in units of `fee_denominator`.
    fn deposit_fee_bips(e: Env, pool_id: u64) -> u32;

    /// Exit fee the pool charges on unstakes, in units of `fee_denominator`.
    fn withdraw_fee_bips(e: Env, pool_id: u64) -> u32;

    /// Fixed-point denominator for the pool's fee rates.
    fn fee_denominator(e: Env) -> u32;
}

/// Swap venue client interface for converting reward tokens.
#[contractclient(name = "RewardConverterClient")]
pub trait RewardConverter {
    /// Read-only quote: how much `to_asset` a swap of `amount` would return.
    fn estimate_conversion(e: Env, amount: i128, from_asset: Address, to_asset: Address) -> i128;

    /// Pulls `amount` of `from_asset` from `spender`, pays the proceeds in
    /// `to_asset` back to `spender`, and returns the received amount. Traps
    /// when the output is implausible for the quoted price.
    fn swap(e: Env, spender: Address, amount: i128, from_asset: Address, to_asset: Address)
        -> i128;
}
