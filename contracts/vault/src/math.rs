//! Pure conversion math for shares and basis-point fees.
//!
//! Every conversion floors. Rounding a deposit down mints slightly fewer
//! shares, rounding a redemption down pays slightly fewer assets, so
//! truncation error always accrues to existing shareholders and integer
//! division can never mint value out of nothing.

/// Fixed-point denominator for the vault's own fee rates (1 bip = 1/10000).
pub const BIPS_DIVISOR: u32 = 10_000;

/// Shares minted for a deposit worth `amount`, given the current totals.
///
/// While either total is zero the vault is in bootstrap and the first
/// depositor sets the 1:1 share price.
pub fn shares_for_assets(amount: i128, total_deposits: i128, total_shares: i128) -> i128 {
    if total_shares == 0 || total_deposits == 0 {
        return amount;
    }
    amount * total_shares / total_deposits
}

/// Underlying assets redeemable for `shares`, given the current totals.
pub fn assets_for_shares(shares: i128, total_deposits: i128, total_shares: i128) -> i128 {
    if total_shares == 0 || total_deposits == 0 {
        return 0;
    }
    shares * total_deposits / total_shares
}

/// A basis-point fee cut of `amount`, floored.
pub fn fee_amount(amount: i128, bips: u32, denominator: u32) -> i128 {
    amount * bips as i128 / denominator as i128
}
