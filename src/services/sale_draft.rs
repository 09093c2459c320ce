//! Draft accumulation of sale line items before a transaction commit
//!
//! The point-of-sale form builds sales one product at a time. The same
//! accumulation runs server side on commit, so wire payloads get the
//! validation and per-line VAT split in one place and the header totals
//! are the item sums by construction.

use rust_decimal::Decimal;

use crate::services::vat;

/// Validation failures while assembling a draft
#[derive(Debug, PartialEq, Eq)]
pub enum DraftError {
    Invalid(String),
    OutOfRange { index: usize, len: usize },
}

impl std::fmt::Display for DraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftError::Invalid(msg) => write!(f, "{}", msg),
            DraftError::OutOfRange { index, len } => {
                write!(f, "Índice {} fuera de rango ({} artículos)", index, len)
            }
        }
    }
}

/// One validated line with its computed amounts
#[derive(Debug, Clone)]
pub struct DraftItem {
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub vat_rate: i32,
    pub subtotal: Decimal,
    pub vat_amount: Decimal,
    pub total: Decimal,
}

/// Running totals over the draft, summed element-wise from the items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftTotals {
    pub subtotal: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
}

/// Ordered sequence of line items for a sale not yet committed
#[derive(Debug, Default)]
pub struct SaleDraft {
    items: Vec<DraftItem>,
}

impl SaleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate one line and append it with its VAT split. The gross
    /// amount of the line is `unit_price * quantity`. On error the
    /// draft is left unchanged.
    pub fn add_item(
        &mut self,
        product_name: &str,
        quantity: i32,
        unit_price: Decimal,
        vat_rate: i32,
    ) -> Result<(), DraftError> {
        let name = product_name.trim();
        if name.is_empty() {
            return Err(DraftError::Invalid(
                "Introduce un nombre de producto válido".to_string(),
            ));
        }
        if quantity <= 0 {
            return Err(DraftError::Invalid(
                "La cantidad debe ser mayor que 0".to_string(),
            ));
        }
        if unit_price < Decimal::ZERO {
            return Err(DraftError::Invalid(
                "Introduce un precio válido".to_string(),
            ));
        }
        // The NUMERIC(10,2) money columns cannot hold a larger price
        if unit_price > Decimal::new(9_999_999_999, 2) {
            return Err(DraftError::Invalid(
                "El precio supera el máximo permitido".to_string(),
            ));
        }
        if vat_rate < 0 {
            return Err(DraftError::Invalid(
                "El tipo de IVA no puede ser negativo".to_string(),
            ));
        }

        let amounts = vat::compute_vat(unit_price * Decimal::from(quantity), vat_rate);

        self.items.push(DraftItem {
            product_name: name.to_string(),
            quantity,
            unit_price,
            vat_rate,
            subtotal: amounts.net,
            vat_amount: amounts.vat,
            total: amounts.gross,
        });

        Ok(())
    }

    /// Remove a line by position
    pub fn remove_item(&mut self, index: usize) -> Result<DraftItem, DraftError> {
        if index >= self.items.len() {
            return Err(DraftError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Element-wise sums over the items. Never recomputed from the
    /// aggregated gross, so a committed header always matches its items
    /// exactly.
    pub fn totals(&self) -> DraftTotals {
        let mut totals = DraftTotals {
            subtotal: Decimal::ZERO,
            vat: Decimal::ZERO,
            total: Decimal::ZERO,
        };
        for item in &self.items {
            totals.subtotal += item.subtotal;
            totals.vat += item.vat_amount;
            totals.total += item.total;
        }
        totals
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[DraftItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn accumulates_items_and_totals() {
        let mut draft = SaleDraft::new();
        draft.add_item("Café", 2, dec!(1.10), 10).unwrap();
        draft.add_item("Tarta", 1, dec!(3.30), 10).unwrap();

        assert_eq!(draft.items().len(), 2);
        assert_eq!(draft.items()[0].total, dec!(2.20));
        assert_eq!(draft.items()[0].subtotal, dec!(2.00));
        assert_eq!(draft.items()[0].vat_amount, dec!(0.20));

        let totals = draft.totals();
        assert_eq!(totals.subtotal, dec!(5.00));
        assert_eq!(totals.vat, dec!(0.50));
        assert_eq!(totals.total, dec!(5.50));
    }

    #[test]
    fn totals_equal_item_sums_exactly() {
        let mut draft = SaleDraft::new();
        draft.add_item("A", 3, dec!(0.37), 21).unwrap();
        draft.add_item("B", 1, dec!(1.01), 4).unwrap();
        draft.add_item("C", 7, dec!(2.99), 10).unwrap();

        let totals = draft.totals();
        let subtotal: Decimal = draft.items().iter().map(|i| i.subtotal).sum();
        let vat: Decimal = draft.items().iter().map(|i| i.vat_amount).sum();
        let total: Decimal = draft.items().iter().map(|i| i.total).sum();
        assert_eq!(totals.subtotal, subtotal);
        assert_eq!(totals.vat, vat);
        assert_eq!(totals.total, total);
    }

    #[test]
    fn rejects_blank_product_name() {
        let mut draft = SaleDraft::new();
        let err = draft.add_item("   ", 1, dec!(1.00), 21).unwrap_err();
        assert!(matches!(err, DraftError::Invalid(_)));
        assert!(draft.is_empty());
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let mut draft = SaleDraft::new();
        assert!(draft.add_item("Café", 0, dec!(1.00), 21).is_err());
        assert!(draft.add_item("Café", -2, dec!(1.00), 21).is_err());
        assert!(draft.is_empty());
    }

    #[test]
    fn rejects_negative_price_and_rate() {
        let mut draft = SaleDraft::new();
        assert!(draft.add_item("Café", 1, dec!(-0.01), 21).is_err());
        assert!(draft.add_item("Café", 1, dec!(1.00), -5).is_err());
        assert!(draft.is_empty());
    }

    #[test]
    fn accepts_price_at_storage_ceiling() {
        let mut draft = SaleDraft::new();
        draft.add_item("Lote", 1, dec!(99999999.99), 21).unwrap();
        assert_eq!(draft.items()[0].total, dec!(99999999.99));
    }

    #[test]
    fn rejects_price_beyond_storage_ceiling() {
        let mut draft = SaleDraft::new();

        // A price this size would overflow the line multiplication if
        // it ever reached it
        let err = draft
            .add_item("Lote", 1_000_000, dec!(99999999999999999999999999.99), 21)
            .unwrap_err();
        assert_eq!(
            err,
            DraftError::Invalid("El precio supera el máximo permitido".to_string())
        );
        assert!(draft.is_empty());

        assert!(draft.add_item("Lote", 1, dec!(100000000.00), 21).is_err());
        assert!(draft.is_empty());
    }

    #[test]
    fn remove_by_position() {
        let mut draft = SaleDraft::new();
        draft.add_item("Café", 1, dec!(1.10), 10).unwrap();
        draft.add_item("Tarta", 1, dec!(3.30), 10).unwrap();

        let removed = draft.remove_item(0).unwrap();
        assert_eq!(removed.product_name, "Café");
        assert_eq!(draft.items().len(), 1);
        assert_eq!(draft.totals().total, dec!(3.30));
    }

    #[test]
    fn remove_out_of_range_fails() {
        let mut draft = SaleDraft::new();
        draft.add_item("Café", 1, dec!(1.10), 10).unwrap();

        let err = draft.remove_item(5).unwrap_err();
        assert_eq!(err, DraftError::OutOfRange { index: 5, len: 1 });
        assert_eq!(draft.items().len(), 1);
    }

    #[test]
    fn clear_empties_the_draft() {
        let mut draft = SaleDraft::new();
        draft.add_item("Café", 1, dec!(1.10), 10).unwrap();
        draft.clear();
        assert!(draft.is_empty());
        assert_eq!(draft.totals().total, dec!(0));
    }

    #[test]
    fn trims_product_name() {
        let mut draft = SaleDraft::new();
        draft.add_item("  Café  ", 1, dec!(1.10), 10).unwrap();
        assert_eq!(draft.items()[0].product_name, "Café");
    }
}
