//! Transaction Aggregate - commit, update and fetch of completed sales
//!
//! A transaction is a header plus the line items it owns. Header and
//! items are written in one store transaction so a failure partway
//! through never leaves one without the other, and the header totals are
//! always the sums of the item set (recomputed through the draft on
//! every commit and item replacement).

use sea_orm::*;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::client::{self, Entity as Client};
use crate::models::transaction::{self, Entity as Transaction, NewTransaction, TransactionPatch};
use crate::models::transaction_item::{self, Entity as TransactionItem, NewTransactionItem};
use crate::services::sale_draft::SaleDraft;
use crate::services::ServiceError;

/// Read-time composite: header fields flattened, plus the resolved
/// client and the ordered item list. Assembled by joining, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionWithDetails {
    #[serde(flatten)]
    pub transaction: transaction::Model,
    pub client: client::Model,
    pub items: Vec<transaction_item::Model>,
}

/// Commit a sale: validate the items through the draft, persist the
/// header with the draft's totals and the items as its children,
/// all atomically.
pub async fn create_transaction(
    db: &DatabaseConnection,
    header: NewTransaction,
    items: Vec<NewTransactionItem>,
) -> Result<TransactionWithDetails, ServiceError> {
    if items.is_empty() {
        return Err(ServiceError::Validation(
            "Añade al menos un producto a la venta".to_string(),
        ));
    }

    let client = Client::find_by_id(header.client_id.clone())
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("Cliente no encontrado"))?;

    let draft = build_draft(&items)?;
    let totals = draft.totals();

    let transaction_id = Uuid::new_v4().to_string();
    let txn = db.begin().await?;

    let saved_header = transaction::ActiveModel {
        id: Set(transaction_id.clone()),
        client_id: Set(header.client_id),
        sale_date: Set(header.sale_date),
        subtotal: Set(totals.subtotal),
        vat_amount: Set(totals.vat),
        total: Set(totals.total),
        payment_method: Set(header.payment_method),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(&txn)
    .await?;

    let saved_items = insert_items(&txn, &transaction_id, &draft).await?;
    txn.commit().await?;

    Ok(TransactionWithDetails {
        transaction: saved_header,
        client,
        items: saved_items,
    })
}

/// One transaction with its client and items
pub async fn get_transaction(
    db: &DatabaseConnection,
    id: &str,
) -> Result<TransactionWithDetails, ServiceError> {
    let row = Transaction::find_by_id(id.to_owned())
        .find_also_related(Client)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("Transacción no encontrada"))?;

    let mut details = assemble_details(db, vec![row]).await?;
    details
        .pop()
        .ok_or(ServiceError::NotFound("Transacción no encontrada"))
}

/// All transactions, newest first (by record creation), each with its
/// client and items
pub async fn list_transactions(
    db: &DatabaseConnection,
) -> Result<Vec<TransactionWithDetails>, ServiceError> {
    let rows = Transaction::find()
        .order_by_desc(transaction::Column::CreatedAt)
        .find_also_related(Client)
        .all(db)
        .await?;

    assemble_details(db, rows).await
}

/// Patch the header and, when a new item set is supplied, replace the
/// previous items wholesale. Replacement deletes every old item, inserts
/// the new set and recomputes the header totals from it; header totals
/// sent by callers are never trusted.
pub async fn update_transaction(
    db: &DatabaseConnection,
    id: &str,
    patch: TransactionPatch,
    items: Option<Vec<NewTransactionItem>>,
) -> Result<TransactionWithDetails, ServiceError> {
    let existing = Transaction::find_by_id(id.to_owned())
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("Transacción no encontrada"))?;

    if let Some(client_id) = &patch.client_id {
        Client::find_by_id(client_id.clone())
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Cliente no encontrado"))?;
    }

    // Validate the replacement set before touching the store
    let replacement = match &items {
        Some(new_items) => {
            if new_items.is_empty() {
                return Err(ServiceError::Validation(
                    "Añade al menos un producto a la venta".to_string(),
                ));
            }
            Some(build_draft(new_items)?)
        }
        None => None,
    };

    let txn = db.begin().await?;

    let mut active_model: transaction::ActiveModel = existing.into();
    if let Some(client_id) = patch.client_id {
        active_model.client_id = Set(client_id);
    }
    if let Some(sale_date) = patch.sale_date {
        active_model.sale_date = Set(sale_date);
    }
    if let Some(payment_method) = patch.payment_method {
        active_model.payment_method = Set(payment_method);
    }

    if let Some(draft) = &replacement {
        TransactionItem::delete_many()
            .filter(transaction_item::Column::TransactionId.eq(id))
            .exec(&txn)
            .await?;
        insert_items(&txn, id, draft).await?;

        let totals = draft.totals();
        active_model.subtotal = Set(totals.subtotal);
        active_model.vat_amount = Set(totals.vat);
        active_model.total = Set(totals.total);
    }

    let updated = active_model.update(&txn).await?;
    txn.commit().await?;

    get_transaction(db, &updated.id).await
}

/// Delete a transaction together with its items. Deleting an id that
/// does not exist is a no-op.
pub async fn delete_transaction(db: &DatabaseConnection, id: &str) -> Result<(), ServiceError> {
    let txn = db.begin().await?;

    TransactionItem::delete_many()
        .filter(transaction_item::Column::TransactionId.eq(id))
        .exec(&txn)
        .await?;
    Transaction::delete_by_id(id.to_owned()).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}

// SQLite caps the number of bound parameters in one statement
const BIND_CHUNK: usize = 500;

/// Every item belonging to the given transactions. The id list is
/// chunked so a long listing never exceeds the statement parameter cap.
async fn items_for_transactions(
    db: &DatabaseConnection,
    transaction_ids: &[String],
) -> Result<Vec<transaction_item::Model>, ServiceError> {
    let mut items = Vec::new();
    for chunk in transaction_ids.chunks(BIND_CHUNK) {
        let mut batch = TransactionItem::find()
            .filter(transaction_item::Column::TransactionId.is_in(chunk.to_vec()))
            .all(db)
            .await?;
        items.append(&mut batch);
    }
    Ok(items)
}

/// Resolve the joined client rows and attach each transaction's items,
/// preserving the incoming row order
pub(crate) async fn assemble_details(
    db: &DatabaseConnection,
    rows: Vec<(transaction::Model, Option<client::Model>)>,
) -> Result<Vec<TransactionWithDetails>, ServiceError> {
    let transaction_ids: Vec<String> = rows.iter().map(|(t, _)| t.id.clone()).collect();

    let mut items_map: HashMap<String, Vec<transaction_item::Model>> = HashMap::new();
    for item in items_for_transactions(db, &transaction_ids).await? {
        items_map
            .entry(item.transaction_id.clone())
            .or_default()
            .push(item);
    }

    rows.into_iter()
        .map(|(tx, client)| {
            let client = client.ok_or_else(|| {
                ServiceError::Database(format!("transaction {} references a missing client", tx.id))
            })?;
            let items = items_map.remove(&tx.id).unwrap_or_default();
            Ok(TransactionWithDetails {
                transaction: tx,
                client,
                items,
            })
        })
        .collect()
}

fn build_draft(items: &[NewTransactionItem]) -> Result<SaleDraft, ServiceError> {
    let mut draft = SaleDraft::new();
    for item in items {
        draft.add_item(&item.product_name, item.quantity, item.unit_price, item.vat_rate)?;
    }
    Ok(draft)
}

async fn insert_items(
    txn: &DatabaseTransaction,
    transaction_id: &str,
    draft: &SaleDraft,
) -> Result<Vec<transaction_item::Model>, ServiceError> {
    let mut saved = Vec::with_capacity(draft.items().len());
    for line in draft.items() {
        let item = transaction_item::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            transaction_id: Set(transaction_id.to_owned()),
            product_name: Set(line.product_name.clone()),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            vat_rate: Set(line.vat_rate),
            subtotal: Set(line.subtotal),
            vat_amount: Set(line.vat_amount),
            total: Set(line.total),
        }
        .insert(txn)
        .await?;
        saved.push(item);
    }
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::client::NewClient;
    use crate::services::client_service;
    use rust_decimal_macros::dec;

    async fn committed_sale(db: &DatabaseConnection, client_id: &str, product: &str) -> String {
        let details = create_transaction(
            db,
            NewTransaction {
                client_id: client_id.to_owned(),
                sale_date: chrono::Utc::now(),
                payment_method: transaction::PaymentMethod::Cash,
            },
            vec![NewTransactionItem {
                product_name: product.to_owned(),
                quantity: 1,
                unit_price: dec!(1.10),
                vat_rate: 10,
            }],
        )
        .await
        .unwrap();
        details.transaction.id
    }

    #[tokio::test]
    async fn item_lookup_spans_parameter_chunks() {
        let db = db::init_db("sqlite::memory:").await.unwrap();

        let client = client_service::create_client(
            &db,
            NewClient {
                name: "Cliente".to_string(),
                email: None,
                phone: None,
                nif: None,
                address: None,
                is_default: false,
                is_active: true,
            },
        )
        .await
        .unwrap();

        let first = committed_sale(&db, &client.id, "Café").await;
        let second = committed_sale(&db, &client.id, "Tarta").await;
        let third = committed_sale(&db, &client.id, "Menú del día").await;

        // Pad the lookup list past one chunk so the real ids land in
        // different statements
        let mut ids: Vec<String> = (0..BIND_CHUNK * 2).map(|n| format!("ausente-{}", n)).collect();
        ids.insert(0, first);
        ids.insert(BIND_CHUNK, second);
        ids.push(third);

        let items = items_for_transactions(&db, &ids).await.unwrap();
        assert_eq!(items.len(), 3);

        let mut names: Vec<String> = items.into_iter().map(|i| i.product_name).collect();
        names.sort();
        assert_eq!(names, vec!["Café", "Menú del día", "Tarta"]);
    }

    #[tokio::test]
    async fn item_lookup_with_no_transactions_is_empty() {
        let db = db::init_db("sqlite::memory:").await.unwrap();

        let items = items_for_transactions(&db, &[]).await.unwrap();
        assert!(items.is_empty());
    }
}
