//! # Compounder Vault Contract
//!
//! An auto-compounding vault on Stellar. Users deposit a single asset, the
//! vault stakes it with an external yield pool, and anyone may periodically
//! trigger a reinvest that harvests accrued rewards, converts them back into
//! the deposit asset, and re-stakes them. Each depositor's claim is a
//! fungible share balance on an external share token administered by the
//! vault.
//!
//! ## Share Accounting Model
//!
//! Shares price against the live staked position:
//!
//! ```text
//! share price = total_deposits() / total_shares
//! ```
//!
//! where `total_deposits()` is always queried from the staking pool (the
//! position can move passively through pool rebasing or penalties). The
//! first depositor sets a 1:1 price; all conversions floor, so rounding
//! error accrues to existing holders and can never be farmed.
//!
//! ## Asset Flow
//!
//! ```text
//! Deposit Flow:
//! User -> [Deposit Token] -> [Vault] -> [Staking Pool]
//!                            |
//!                    shares minted for amount net of pool entry fee
//!
//! Reinvest Flow (any authenticated caller):
//! [Staking Pool] -> harvest -> [Vault] -> swap via [Reward Converter]
//!                            |
//!            dev / admin / caller fees, remainder re-staked
//!
//! Withdraw Flow:
//! User -> [Vault.withdraw()] -> unstake -> [Deposit Token] -> User
//!         shares burned, payout net of pool exit fee
//! ```
//!
//! ## Storage Layout
//!
//! Everything lives in instance storage; per-holder balances belong to the
//! external share token, not to this contract.
//!
//! - `Owner`: authorized party for configuration and fund recovery
//! - `Assets`: deposit / reward / pool-reward / share token addresses
//! - `Pool`: staking pool address, opaque pool id, converter address
//! - `Fees`: basis-point rates and fee recipients
//! - `MinTokensToReinvest`: floor below which `reinvest` aborts
//! - `MaxTokensToDepositWithoutReinvest`: force-compound threshold (0 = off)
//! - `DepositsEnabled`: gate for new deposits
//! - `TotalShares`: mirror of the share token's outstanding supply
//!
//! ## Atomicity
//!
//! Every entry point is a single invocation: any trap rolls back all storage
//! writes, token movements, and collaborator calls, so no partial fee
//! disbursement or half-applied share mint is ever observable.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, symbol_short, token,
    Address, Env,
};

pub mod interfaces;
pub mod math;


use interfaces::{RewardConverterClient, StakingPoolClient};
use math::{assets_for_shares, fee_amount, shares_for_assets, BIPS_DIVISOR};

/// Lifetime of the allowances granted by `set_allowances`, roughly 30 days
/// of 5-second ledgers. The owner re-grants when they age out.
const ALLOWANCE_LIFETIME_LEDGERS: u32 = 518_400;

// ============================================================================
// STORAGE KEYS
// ============================================================================

/// Instance storage keys for vault state.
#[contracttype]
pub enum DataKey {
    /// Authorized party for configuration and recovery
    Owner,
    /// Token addresses the vault moves value between
    Assets,
    /// Staking pool wiring
    Pool,
    /// Reinvest fee schedule
    Fees,
    /// Estimated reward floor below which `reinvest` aborts
    MinTokensToReinvest,
    /// Outstanding-reward ceiling that forces a compound before a deposit,
    /// 0 disables the trigger
    MaxTokensWithoutReinvest,
    /// Gate for new deposits; withdrawals are never gated
    DepositsEnabled,
    /// Mirror of the share token's outstanding supply
    TotalShares,
}

// ============================================================================
// CONFIGURATION TYPES
// ============================================================================

/// Token addresses fixed at initialization.
///
/// `pool_reward_asset` is the pool-native token the staking pool pays
/// rewards in; `reward_asset` is the intermediate asset fees are paid in.
/// The two may coincide, as may `reward_asset` and `deposit_asset`; each
/// coincidence simply skips one conversion leg.
#[contracttype]
#[derive(Clone)]
pub struct AssetConfig {
    pub deposit_asset: Address,
    pub reward_asset: Address,
    pub pool_reward_asset: Address,
    pub share_token: Address,
}

/// Staking pool wiring fixed at initialization.
#[contracttype]
#[derive(Clone)]
pub struct PoolConfig {
    pub staking_pool: Address,
    pub pool_id: u64,
    pub reward_converter: Address,
}

/// Basis-point fee rates applied to harvested rewards, and their recipients.
///
/// Rates are mutable by the owner under the joint cap; recipients are fixed
/// at construction. The reinvest reward goes to whichever caller triggered
/// the compound.
#[contracttype]
#[derive(Clone)]
pub struct FeeSchedule {
    pub admin_fee_bips: u32,
    pub dev_fee_bips: u32,
    pub reinvest_reward_bips: u32,
    pub admin_recipient: Address,
    pub dev_recipient: Address,
}

impl FeeSchedule {
    fn total_bips(&self) -> u32 {
        self.admin_fee_bips + self.dev_fee_bips + self.reinvest_reward_bips
    }
}

// ============================================================================
// EVENTS
// ============================================================================

/// Emitted when a depositor's stake is accepted and shares are minted.
///
/// # Topics
/// - `SymbolShort("deposit")`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    /// The account the shares were minted to
    pub account: Address,
    /// Gross amount of deposit asset staked
    pub amount: i128,
}

/// Emitted when shares are redeemed for the underlying asset.
///
/// # Topics
/// - `SymbolShort("withdraw")`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    /// The account whose shares were burned
    pub account: Address,
    /// Gross amount of deposit asset unstaked (before the pool exit fee)
    pub amount: i128,
}

/// Emitted after every successful reinvest, after a rescue, and once with
/// zero values at initialization to establish a baseline record.
///
/// # Topics
/// - `SymbolShort("reinvest")`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReinvestEvent {
    /// Staked position after the operation
    pub total_deposits: i128,
    /// Outstanding shares after the operation
    pub total_shares: i128,
}

// ============================================================================
// ERRORS
// ============================================================================

/// Stable error codes surfaced by the vault's own checks.
///
/// Collaborator failures (token transfer, pool position underflow, swap
/// slippage) and authentication failures trap in the collaborator or the
/// host and roll this contract's invocation back with them.
#[contracterror]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum VaultError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidFeeConfiguration = 3,
    DepositsDisabled = 4,
    ZeroAmount = 5,
    BelowMinimumReward = 6,
    InsufficientRescue = 7,
    AuthorizationExpired = 8,
}

// ============================================================================
// CONTRACT
// ============================================================================

/// Compounder Vault - auto-compounding single-asset vault on Stellar.
///
/// # Security Model
///
/// - Depositors and withdrawers authorize their own operations
/// - Anyone may trigger `reinvest`, authenticating as themselves; the
///   reinvest reward pays that caller, so compounding needs no keeper
///   privileges
/// - Only the owner mutates configuration or runs the rescue path
/// - All fee and share math reads are sequenced strictly before or strictly
///   after collaborator calls within one entry point, never mixed
#[contract]
pub struct CompounderVault;

#[contractimpl]
impl CompounderVault {
    // ==========================================================================
    // INITIALIZATION
    // ==========================================================================

    /// Initializes the vault with its full configuration snapshot.
    ///
    /// Must be called exactly once after deployment. The share token's
    /// admin must be handed to this contract before the first deposit so
    /// the vault can mint.
    ///
    /// # Panics
    /// - `AlreadyInitialized` if called twice
    /// - `InvalidFeeConfiguration` if the fee rates jointly exceed 10_000
    ///   bips or the share token aliases the deposit asset
    ///
    /// # Events
    /// Emits a zero-valued `reinvest` record as the accounting baseline.
    pub fn initialize(
        env: Env,
        owner: Address,
        assets: AssetConfig,
        pool: PoolConfig,
        fees: FeeSchedule,
        min_tokens_to_reinvest: i128,
        max_without_reinvest: i128,
    ) -> Result<(), VaultError> {
        if env.storage().instance().has(&DataKey::Owner) {
            panic_with_error!(&env, VaultError::AlreadyInitialized);
        }
        if fees.total_bips() > BIPS_DIVISOR {
            panic_with_error!(&env, VaultError::InvalidFeeConfiguration);
        }
        if assets.share_token == assets.deposit_asset {
            panic_with_error!(&env, VaultError::InvalidFeeConfiguration);
        }

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Assets, &assets);
        env.storage().instance().set(&DataKey::Pool, &pool);
        env.storage().instance().set(&DataKey::Fees, &fees);
        env.storage()
            .instance()
            .set(&DataKey::MinTokensToReinvest, &min_tokens_to_reinvest);
        env.storage().instance().set(
            &DataKey::MaxTokensWithoutReinvest,
            &max_without_reinvest,
        );
        env.storage().instance().set(&DataKey::DepositsEnabled, &true);
        env.storage().instance().set(&DataKey::TotalShares, &0_i128);

        env.events().publish(
            (symbol_short!("reinvest"),),
            ReinvestEvent { total_deposits: 0, total_shares: 0 },
        );

        Ok(())
    }

    // ==========================================================================
    // CORE LIFECYCLE - DEPOSIT
    // ==========================================================================

    /// Deposits `amount` of the deposit asset for the caller's own account.
    pub fn deposit(env: Env, account: Address, amount: i128) -> Result<(), VaultError> {
        Self::enter(&env, &account, &account, amount);
        Ok(())
    }

    /// Deposits `amount` pulled from `payer`, minting the shares to
    /// `account`. The payer authorizes the transfer.
    pub fn deposit_for(env: Env, payer: Address, account: Address, amount: i128) {
        Self::enter(&env, &payer, &account, amount);
    }

    /// Deposit under a signed authorization with an expiry.
    ///
    /// The signature itself travels in the transaction's auth entries and
    /// is verified by the host auth framework; the contract's job is to
    /// refuse authorizations presented after their deadline.
    ///
    /// # Panics
    /// - `AuthorizationExpired` if the ledger timestamp is past `deadline`
    /// - otherwise exactly as `deposit`
    pub fn deposit_with_authorization(
        env: Env,
        account: Address,
        amount: i128,
        deadline: u64,
    ) -> Result<(), VaultError> {
        if env.ledger().timestamp() > deadline {
            panic_with_error!(&env, VaultError::AuthorizationExpired);
        }
        Self::enter(&env, &account, &account, amount);
        Ok(())
    }

    // ==========================================================================
    // CORE LIFECYCLE - WITHDRAW
    // ==========================================================================

    /// Redeems `shares` for the underlying deposit asset.
    ///
    /// The asset value is computed first; a value of zero (dust shares at
    /// the current price) is a deliberate no-op: nothing is burned and
    /// nothing is transferred, so negligible withdrawals never trap.
    /// Otherwise the full asset amount is unstaked, the shares are burned,
    /// and the payout net of the pool's exit fee goes to `account`.
    ///
    /// Withdrawals never trigger an opportunistic reinvest: a depositor
    /// must not enter at a stale price, but an exiting holder has no reason
    /// to wait on an unrelated harvest.
    ///
    /// # Panics
    /// - `ZeroAmount` if `shares` is not positive
    /// - traps if `account` holds fewer shares, or the pool position cannot
    ///   cover the unstake
    ///
    /// # Events
    /// Emits `WithdrawEvent` with the gross asset amount.
    pub fn withdraw(env: Env, account: Address, shares: i128) -> Result<(), VaultError> {
        account.require_auth();

        let assets = Self::assets(&env);
        if shares <= 0 {
            panic_with_error!(&env, VaultError::ZeroAmount);
        }

        let pool = Self::pool(&env);
        let pool_client = StakingPoolClient::new(&env, &pool.staking_pool);
        let amount =
            assets_for_shares(shares, Self::deployed_balance(&env), Self::outstanding_shares(&env));
        if amount == 0 {
            return Ok(());
        }

        // Exit-fee math is fixed before the unstake call so the payout never
        // mixes pre- and post-call reads.
        let exit_fee = fee_amount(
            amount,
            pool_client.withdraw_fee_bips(&pool.pool_id),
            pool_client.fee_denominator(),
        );

        pool_client.unstake(&pool.pool_id, &env.current_contract_address(), &amount);
        Self::burn_shares(&env, &assets, &account, shares);
        token::Client::new(&env, &assets.deposit_asset).transfer(
            &env.current_contract_address(),
            &account,
            &(amount - exit_fee),
        );

        env.events()
            .publish((symbol_short!("withdraw"),), WithdrawEvent { account, amount });

        Ok(())
    }

    // ==========================================================================
    // CORE LIFECYCLE - REINVEST
    // ==========================================================================

    /// Estimated total outstanding reward, in reward-asset terms.
    ///
    /// Sums the pool-native reward balance already held with the pool's
    /// pending-accrual estimate, quotes the conversion, and adds any
    /// reward-asset balance already sitting in the vault. Pure read, safe
    /// to call any number of times.
    pub fn check_reward(env: Env) -> i128 {
        Self::estimate_total_reward(&env)
    }

    /// Harvests, converts, disburses fees, and re-stakes the remainder.
    ///
    /// Callable by anyone acting directly for themselves: `caller` must
    /// authenticate as the invoking account, never as an intermediary
    /// execution context, which keeps the reinvest reward from being farmed
    /// through wrapper contracts. The reward for triggering the compound is
    /// paid to `caller`.
    ///
    /// Fixed order: harvest, convert the pool-native balance to the reward
    /// asset, then from the gross reward-asset balance disburse first the
    /// dev fee, then the admin fee, then the caller reward, and finally
    /// convert and re-stake the remainder. Any failing step aborts the
    /// whole operation.
    ///
    /// # Panics
    /// - `BelowMinimumReward` if the estimated reward is under the
    ///   configured floor
    ///
    /// # Events
    /// Emits `ReinvestEvent` with the post-compound totals.
    pub fn reinvest(env: Env, caller: Address) -> Result<(), VaultError> {
        caller.require_auth();

        let estimated = Self::estimate_total_reward(&env);
        let min: i128 = env
            .storage()
            .instance()
            .get(&DataKey::MinTokensToReinvest)
            .unwrap_or(0);
        if estimated < min {
            panic_with_error!(&env, VaultError::BelowMinimumReward);
        }

        Self::compound(&env, &caller);

        Ok(())
    }

    // ==========================================================================
    // ADMINISTRATIVE - RECOVERY
    // ==========================================================================

    /// Grants the collaborators their working allowances: the staking pool
    /// over the deposit asset, the converter over the pool-reward and
    /// reward assets. Owner-only; call again when the allowances age out.
    pub fn set_allowances(env: Env) {
        Self::require_owner(&env);

        let assets = Self::assets(&env);
        let pool = Self::pool(&env);
        let vault = env.current_contract_address();
        let expiration = env.ledger().sequence() + ALLOWANCE_LIFETIME_LEDGERS;

        token::Client::new(&env, &assets.deposit_asset).approve(
            &vault,
            &pool.staking_pool,
            &i128::MAX,
            &expiration,
        );
        token::Client::new(&env, &assets.pool_reward_asset).approve(
            &vault,
            &pool.reward_converter,
            &i128::MAX,
            &expiration,
        );
        token::Client::new(&env, &assets.reward_asset).approve(
            &vault,
            &pool.reward_converter,
            &i128::MAX,
            &expiration,
        );
    }

    /// Circuit breaker for a compromised or frozen pool.
    ///
    /// Performs a best-effort emergency unstake, measures the deposit-asset
    /// delta actually received, and aborts if it falls short of
    /// `min_return`. An aborted rescue leaves the staked position exactly
    /// as the pool reports it. Optionally disables future deposits in the
    /// same breath.
    ///
    /// # Panics
    /// - `InsufficientRescue` if the recovered delta is below `min_return`
    ///
    /// # Events
    /// Emits `ReinvestEvent` reflecting the (now likely zero) staked
    /// position.
    pub fn rescue_deployed_funds(
        env: Env,
        min_return: i128,
        disable_deposits: bool,
    ) -> Result<(), VaultError> {
        Self::require_owner(&env);

        let assets = Self::assets(&env);
        let pool = Self::pool(&env);
        let vault = env.current_contract_address();
        let deposit_client = token::Client::new(&env, &assets.deposit_asset);

        let balance_before = deposit_client.balance(&vault);
        StakingPoolClient::new(&env, &pool.staking_pool).emergency_unstake(&pool.pool_id, &vault);
        let recovered = deposit_client.balance(&vault) - balance_before;
        if recovered < min_return {
            panic_with_error!(&env, VaultError::InsufficientRescue);
        }

        Self::publish_reinvest(&env);

        if disable_deposits && Self::deposits_enabled(&env) {
            env.storage().instance().set(&DataKey::DepositsEnabled, &false);
        }

        Ok(())
    }

    // ==========================================================================
    // ADMINISTRATIVE - CONFIGURATION
    // ==========================================================================

    /// Sets the estimated-reward floor below which `reinvest` aborts.
    pub fn update_min_tokens_to_reinvest(env: Env, amount: i128) {
        Self::require_owner(&env);
        env.storage().instance().set(&DataKey::MinTokensToReinvest, &amount);
    }

    /// Sets the outstanding-reward ceiling that forces a compound before a
    /// deposit is accepted. Zero disables the trigger.
    pub fn update_max_without_reinvest(env: Env, amount: i128) {
        Self::require_owner(&env);
        env.storage()
            .instance()
            .set(&DataKey::MaxTokensWithoutReinvest, &amount);
    }

    /// Sets the admin fee rate. The joint fee sum stays capped at 10_000.
    pub fn update_admin_fee(env: Env, bips: u32) -> Result<(), VaultError> {
        Self::require_owner(&env);
        let mut fees = Self::fees(&env);
        fees.admin_fee_bips = bips;
        Self::store_fees(&env, fees);
        Ok(())
    }

    /// Sets the dev fee rate. The joint fee sum stays capped at 10_000.
    pub fn update_dev_fee(env: Env, bips: u32) {
        Self::require_owner(&env);
        let mut fees = Self::fees(&env);
        fees.dev_fee_bips = bips;
        Self::store_fees(&env, fees);
    }

    /// Sets the caller reward rate. The joint fee sum stays capped at
    /// 10_000.
    pub fn update_reinvest_reward(env: Env, bips: u32) {
        Self::require_owner(&env);
        let mut fees = Self::fees(&env);
        fees.reinvest_reward_bips = bips;
        Self::store_fees(&env, fees);
    }

    /// Opens or closes the vault for new deposits. Withdrawals are never
    /// gated.
    pub fn update_deposits_enabled(env: Env, enabled: bool) {
        Self::require_owner(&env);
        env.storage().instance().set(&DataKey::DepositsEnabled, &enabled);
    }

    // ==========================================================================
    // READ FUNCTIONS
    // ==========================================================================

    /// The staked position backing all shares, queried live from the pool.
    pub fn total_deposits(env: Env) -> i128 {
        Self::deployed_balance(&env)
    }

    /// Current position as reported by the staking pool, net of any
    /// withdrawal penalty it would apply.
    pub fn estimate_deployed_balance(env: Env) -> i128 {
        Self::deployed_balance(&env)
    }

    /// Outstanding share supply.
    pub fn total_shares(env: Env) -> i128 {
        Self::outstanding_shares(&env)
    }

    /// Whether new deposits are currently accepted.
    pub fn is_deposits_enabled(env: Env) -> bool {
        Self::deposits_enabled(&env)
    }

    pub fn get_owner(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .unwrap_or_else(|| panic_with_error!(&env, VaultError::NotInitialized))
    }

    pub fn get_asset_config(env: Env) -> AssetConfig {
        Self::assets(&env)
    }

    pub fn get_pool_config(env: Env) -> PoolConfig {
        Self::pool(&env)
    }

    pub fn get_fee_schedule(env: Env) -> FeeSchedule {
        Self::fees(&env)
    }

    pub fn get_min_tokens_to_reinvest(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::MinTokensToReinvest)
            .unwrap_or(0)
    }

    pub fn get_max_without_reinvest(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::MaxTokensWithoutReinvest)
            .unwrap_or(0)
    }

    // ==========================================================================
    // INTERNAL - DEPOSIT / COMPOUND PIPELINE
    // ==========================================================================

    /// Shared deposit path.
    ///
    /// When the force-compound trigger fires, the reinvest completes before
    /// any share math runs, so the incoming deposit prices against the
    /// freshly compounded position and cannot dilute existing holders. The
    /// share count is then fixed against the pre-stake totals, before any
    /// balance-moving call of this deposit.
    fn enter(env: &Env, payer: &Address, account: &Address, amount: i128) {
        payer.require_auth();

        let assets = Self::assets(env);
        if !Self::deposits_enabled(env) {
            panic_with_error!(env, VaultError::DepositsDisabled);
        }
        if amount <= 0 {
            panic_with_error!(env, VaultError::ZeroAmount);
        }

        let force_threshold: i128 = env
            .storage()
            .instance()
            .get(&DataKey::MaxTokensWithoutReinvest)
            .unwrap_or(0);
        if force_threshold > 0 && Self::estimate_total_reward(env) > force_threshold {
            Self::compound(env, payer);
        }

        let pool = Self::pool(env);
        let pool_client = StakingPoolClient::new(env, &pool.staking_pool);

        // The pool keeps its entry fee, so shares are minted only for the
        // net amount the position is actually credited with. The fee bases
        // on the incoming amount as presented.
        let entry_fee = fee_amount(
            amount,
            pool_client.deposit_fee_bips(&pool.pool_id),
            pool_client.fee_denominator(),
        );
        let shares = shares_for_assets(
            amount - entry_fee,
            Self::deployed_balance(env),
            Self::outstanding_shares(env),
        );
        if shares <= 0 {
            panic_with_error!(env, VaultError::ZeroAmount);
        }

        token::Client::new(env, &assets.deposit_asset).transfer(
            payer,
            &env.current_contract_address(),
            &amount,
        );
        pool_client.stake(&pool.pool_id, &env.current_contract_address(), &amount);
        Self::mint_shares(env, &assets, account, shares);

        env.events().publish(
            (symbol_short!("deposit"),),
            DepositEvent { account: account.clone(), amount },
        );
    }

    /// The reinvestment pipeline. Callers have already authenticated and
    /// cleared whichever threshold applies.
    fn compound(env: &Env, caller: &Address) {
        let assets = Self::assets(env);
        let pool = Self::pool(env);
        let fees = Self::fees(env);
        let vault = env.current_contract_address();
        let pool_client = StakingPoolClient::new(env, &pool.staking_pool);

        // 1. Harvest accrued pool-native rewards into the vault.
        pool_client.harvest_rewards(&pool.pool_id, &vault);

        // 2. Convert the pool-native balance into the reward asset.
        if assets.pool_reward_asset != assets.reward_asset {
            let native = token::Client::new(env, &assets.pool_reward_asset).balance(&vault);
            if native > 0 {
                RewardConverterClient::new(env, &pool.reward_converter).swap(
                    &vault,
                    &native,
                    &assets.pool_reward_asset,
                    &assets.reward_asset,
                );
            }
        }
        let reward_client = token::Client::new(env, &assets.reward_asset);
        let gross = reward_client.balance(&vault);

        // 3. Fee pipeline: dev, then admin, then the caller reward. Zero
        // fees skip their transfer.
        let dev_fee = fee_amount(gross, fees.dev_fee_bips, BIPS_DIVISOR);
        if dev_fee > 0 {
            reward_client.transfer(&vault, &fees.dev_recipient, &dev_fee);
        }
        let admin_fee = fee_amount(gross, fees.admin_fee_bips, BIPS_DIVISOR);
        if admin_fee > 0 {
            reward_client.transfer(&vault, &fees.admin_recipient, &admin_fee);
        }
        let caller_fee = fee_amount(gross, fees.reinvest_reward_bips, BIPS_DIVISOR);
        if caller_fee > 0 {
            reward_client.transfer(&vault, caller, &caller_fee);
        }

        // 4. Convert the remainder into the deposit asset and re-stake.
        let net = gross - dev_fee - admin_fee - caller_fee;
        let staked = if assets.reward_asset == assets.deposit_asset {
            net
        } else if net > 0 {
            RewardConverterClient::new(env, &pool.reward_converter).swap(
                &vault,
                &net,
                &assets.reward_asset,
                &assets.deposit_asset,
            )
        } else {
            0
        };
        if staked > 0 {
            pool_client.stake(&pool.pool_id, &vault, &staked);
        }

        // 5. Record the post-compound accounting state.
        Self::publish_reinvest(env);
    }

    fn estimate_total_reward(env: &Env) -> i128 {
        let assets = Self::assets(env);
        let pool = Self::pool(env);
        let vault = env.current_contract_address();

        let pending = StakingPoolClient::new(env, &pool.staking_pool)
            .pending_reward_estimate(&pool.pool_id, &vault);
        let held_native = token::Client::new(env, &assets.pool_reward_asset).balance(&vault);
        let pool_amount = pending + held_native;

        if assets.pool_reward_asset == assets.reward_asset {
            return pool_amount;
        }

        let converted = if pool_amount > 0 {
            RewardConverterClient::new(env, &pool.reward_converter).estimate_conversion(
                &pool_amount,
                &assets.pool_reward_asset,
                &assets.reward_asset,
            )
        } else {
            0
        };
        converted + token::Client::new(env, &assets.reward_asset).balance(&vault)
    }

    fn publish_reinvest(env: &Env) {
        env.events().publish(
            (symbol_short!("reinvest"),),
            ReinvestEvent {
                total_deposits: Self::deployed_balance(env),
                total_shares: Self::outstanding_shares(env),
            },
        );
    }

    // ==========================================================================
    // INTERNAL - SHARE LEDGER
    // ==========================================================================

    fn mint_shares(env: &Env, assets: &AssetConfig, to: &Address, amount: i128) {
        token::StellarAssetClient::new(env, &assets.share_token).mint(to, &amount);
        let total = Self::outstanding_shares(env) + amount;
        env.storage().instance().set(&DataKey::TotalShares, &total);
    }

    fn burn_shares(env: &Env, assets: &AssetConfig, from: &Address, amount: i128) {
        token::Client::new(env, &assets.share_token).burn(from, &amount);
        let total = Self::outstanding_shares(env) - amount;
        env.storage().instance().set(&DataKey::TotalShares, &total);
    }

    // ==========================================================================
    // INTERNAL - STATE ACCESS
    // ==========================================================================

    fn deployed_balance(env: &Env) -> i128 {
        let pool = Self::pool(env);
        StakingPoolClient::new(env, &pool.staking_pool)
            .staked_balance(&pool.pool_id, &env.current_contract_address())
    }

    fn outstanding_shares(env: &Env) -> i128 {
        env.storage().instance().get(&DataKey::TotalShares).unwrap_or(0)
    }

    fn deposits_enabled(env: &Env) -> bool {
        env.storage().instance().get(&DataKey::DepositsEnabled).unwrap_or(false)
    }

    fn assets(env: &Env) -> AssetConfig {
        env.storage()
            .instance()
            .get(&DataKey::Assets)
            .unwrap_or_else(|| panic_with_error!(env, VaultError::NotInitialized))
    }

    fn pool(env: &Env) -> PoolConfig {
        env.storage()
            .instance()
            .get(&DataKey::Pool)
            .unwrap_or_else(|| panic_with_error!(env, VaultError::NotInitialized))
    }

    fn fees(env: &Env) -> FeeSchedule {
        env.storage()
            .instance()
            .get(&DataKey::Fees)
            .unwrap_or_else(|| panic_with_error!(env, VaultError::NotInitialized))
    }

    fn store_fees(env: &Env, fees: FeeSchedule) {
        if fees.total_bips() > BIPS_DIVISOR {
            panic_with_error!(env, VaultError::InvalidFeeConfiguration);
        }
        env.storage().instance().set(&DataKey::Fees, &fees);
    }

    #[inline]
    fn require_owner(env: &Env) {
        let owner: Address = env
            .storage()
            .instance()
            .get(&DataKey::Owner)
            .unwrap_or_else(|| panic_with_error!(env, VaultError::NotInitialized));
        owner.require_auth();
    }
}
