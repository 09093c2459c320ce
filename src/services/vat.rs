//! VAT arithmetic for tax-inclusive prices
//!
//! Spanish retail prices are displayed gross (IVA included), so the net
//! amount and the tax are backed out of the amount the customer pays.

use rust_decimal::{Decimal, RoundingStrategy};

/// Net/tax/gross split of a single tax-inclusive amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VatAmounts {
    pub net: Decimal,
    pub vat: Decimal,
    pub gross: Decimal,
}

/// Back out net and VAT from a tax-inclusive amount.
///
/// `net = gross / (1 + rate/100)`; the VAT is the difference against the
/// unrounded net. Net and VAT are then rounded to cents independently,
/// half away from zero, so `net + vat` can drift from `gross` by at most
/// one cent. That drift is accepted; forcing `vat = gross - net` after
/// rounding would hide it instead of bounding it.
///
/// The domain only uses the Spanish bands (4, 10, 21) but any
/// non-negative rate is computed the same way. Rate 0 returns the gross
/// amount unchanged as net.
pub fn compute_vat(gross: Decimal, vat_rate: i32) -> VatAmounts {
    let divisor = Decimal::ONE + Decimal::from(vat_rate) / Decimal::ONE_HUNDRED;
    let net = gross / divisor;
    let vat = gross - net;

    VatAmounts {
        net: round_to_cents(net),
        vat: round_to_cents(vat),
        gross: round_to_cents(gross),
    }
}

fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
