//! Reporting Aggregator - dashboard snapshot and date-range breakdowns
//!
//! All figures are derived by folding over stored rows at request time;
//! nothing here writes. Range reports treat both endpoints as inclusive
//! calendar days, the dashboard covers the current UTC day.

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::*;
use serde::Serialize;

use crate::models::client::{self, Entity as Client};
use crate::models::transaction::{self, Entity as Transaction, PaymentMethod};
use crate::models::transaction_item::{self, Entity as TransactionItem};
use crate::services::transaction_service::{self, TransactionWithDetails};
use crate::services::ServiceError;

/// Inclusive instant range covering whole calendar days
#[derive(Debug, Clone, Copy)]
pub struct DateRange {
    pub start: chrono::DateTime<Utc>,
    pub end: chrono::DateTime<Utc>,
}

impl DateRange {
    /// From midnight at the start of `start` through the last stored
    /// millisecond of `end`
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        let start = start.and_time(NaiveTime::MIN).and_utc();
        let end = (end + Duration::days(1)).and_time(NaiveTime::MIN).and_utc()
            - Duration::milliseconds(1);
        DateRange { start, end }
    }
}

/// Base, VAT and gross accumulated for one rate band
#[derive(Debug, Clone, Default, Serialize)]
pub struct VatBucket {
    pub base: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
}

/// Line items bucketed by the Spanish VAT bands. Items carrying any
/// other rate are left out of all three buckets.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VatBreakdown {
    pub vat21: VatBucket,
    pub vat10: VatBucket,
    pub vat4: VatBucket,
}

/// Gross revenue per payment method
#[derive(Debug, Clone, Default, Serialize)]
pub struct PaymentMethodBreakdown {
    pub cash: Decimal,
    pub card: Decimal,
    pub transfer: Decimal,
}

/// Live snapshot for the admin landing page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_sales: Decimal,
    pub today_transactions: u64,
    pub vat_collected: Decimal,
    pub active_clients: u64,
}

/// Transactions whose sale date falls inside the range, newest first,
/// with client and items attached
pub async fn transactions_in_range(
    db: &DatabaseConnection,
    range: DateRange,
) -> Result<Vec<TransactionWithDetails>, ServiceError> {
    let rows = Transaction::find()
        .filter(transaction::Column::SaleDate.gte(range.start))
        .filter(transaction::Column::SaleDate.lte(range.end))
        .order_by_desc(transaction::Column::SaleDate)
        .find_also_related(Client)
        .all(db)
        .await?;

    transaction_service::assemble_details(db, rows).await
}

/// Fold the line items of every in-range transaction into per-band
/// VAT buckets. Items are matched through an inner join on the owning
/// header's sale date.
pub async fn vat_breakdown(
    db: &DatabaseConnection,
    range: DateRange,
) -> Result<VatBreakdown, ServiceError> {
    let items = TransactionItem::find()
        .join(
            JoinType::InnerJoin,
            transaction_item::Relation::Transaction.def(),
        )
        .filter(transaction::Column::SaleDate.gte(range.start))
        .filter(transaction::Column::SaleDate.lte(range.end))
        .all(db)
        .await?;

    let mut breakdown = VatBreakdown::default();
    for item in items {
        let bucket = match item.vat_rate {
            21 => &mut breakdown.vat21,
            10 => &mut breakdown.vat10,
            4 => &mut breakdown.vat4,
            _ => continue,
        };
        bucket.base += item.subtotal;
        bucket.vat += item.vat_amount;
        bucket.total += item.total;
    }

    Ok(breakdown)
}

/// Gross totals of in-range transactions grouped by how they were paid
pub async fn payment_method_breakdown(
    db: &DatabaseConnection,
    range: DateRange,
) -> Result<PaymentMethodBreakdown, ServiceError> {
    let headers = Transaction::find()
        .filter(transaction::Column::SaleDate.gte(range.start))
        .filter(transaction::Column::SaleDate.lte(range.end))
        .all(db)
        .await?;

    let mut breakdown = PaymentMethodBreakdown::default();
    for header in headers {
        match header.payment_method {
            PaymentMethod::Cash => breakdown.cash += header.total,
            PaymentMethod::Card => breakdown.card += header.total,
            PaymentMethod::Transfer => breakdown.transfer += header.total,
        }
    }

    Ok(breakdown)
}

/// Today's sales figures plus the active-client count. "Today" is the
/// half-open UTC day [00:00, next 00:00), so a sale stamped exactly at
/// the following midnight belongs to tomorrow.
pub async fn dashboard_stats(db: &DatabaseConnection) -> Result<DashboardStats, ServiceError> {
    let today_start = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    let tomorrow_start = today_start + Duration::days(1);

    let todays = Transaction::find()
        .filter(transaction::Column::SaleDate.gte(today_start))
        .filter(transaction::Column::SaleDate.lt(tomorrow_start))
        .all(db)
        .await?;

    let today_sales: Decimal = todays.iter().map(|t| t.total).sum();
    let vat_collected: Decimal = todays.iter().map(|t| t.vat_amount).sum();
    let today_transactions = todays.len() as u64;

    let active_clients = Client::find()
        .filter(client::Column::IsActive.eq(true))
        .count(db)
        .await?;

    Ok(DashboardStats {
        today_sales,
        today_transactions,
        vat_collected,
        active_clients,
    })
}
