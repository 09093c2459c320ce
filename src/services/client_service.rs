//! Client Directory - clients ordered by name, with a single default
//! record used as the fallback customer at sale time

use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::client::{self, ClientPatch, Entity as Client, NewClient};
use crate::models::transaction::{self, Entity as Transaction};
use crate::services::ServiceError;

/// List all clients ordered by name
pub async fn list_clients(db: &DatabaseConnection) -> Result<Vec<client::Model>, ServiceError> {
    let clients = Client::find()
        .order_by_asc(client::Column::Name)
        .all(db)
        .await?;
    Ok(clients)
}

/// Get a single client by ID
pub async fn get_client(db: &DatabaseConnection, id: &str) -> Result<client::Model, ServiceError> {
    Client::find_by_id(id.to_owned())
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("Cliente no encontrado"))
}

/// The designated fallback client, if one exists yet
pub async fn get_default_client(
    db: &DatabaseConnection,
) -> Result<Option<client::Model>, ServiceError> {
    let client = Client::find()
        .filter(client::Column::IsDefault.eq(true))
        .one(db)
        .await?;
    Ok(client)
}

/// Create a new client. Setting `is_default` hands the default flag
/// over: any prior default is cleared in the same store transaction, so
/// at most one default exists at any point.
pub async fn create_client(
    db: &DatabaseConnection,
    input: NewClient,
) -> Result<client::Model, ServiceError> {
    let txn = db.begin().await?;

    if input.is_default {
        clear_default(&txn).await?;
    }

    let new_client = client::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(input.name),
        email: Set(input.email),
        phone: Set(input.phone),
        nif: Set(input.nif),
        address: Set(input.address),
        is_default: Set(input.is_default),
        is_active: Set(input.is_active),
        created_at: Set(chrono::Utc::now()),
    };

    let saved = new_client.insert(&txn).await?;
    txn.commit().await?;

    Ok(saved)
}

/// Apply a partial update. Only the fields present in the patch change;
/// promoting a client to default clears the previous one atomically.
pub async fn update_client(
    db: &DatabaseConnection,
    id: &str,
    patch: ClientPatch,
) -> Result<client::Model, ServiceError> {
    let existing = Client::find_by_id(id.to_owned())
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("Cliente no encontrado"))?;

    let txn = db.begin().await?;

    if patch.is_default == Some(true) && !existing.is_default {
        clear_default(&txn).await?;
    }

    let mut active_model: client::ActiveModel = existing.into();

    if let Some(name) = patch.name {
        active_model.name = Set(name);
    }
    if let Some(email) = patch.email {
        active_model.email = Set(Some(email));
    }
    if let Some(phone) = patch.phone {
        active_model.phone = Set(Some(phone));
    }
    if let Some(nif) = patch.nif {
        active_model.nif = Set(Some(nif));
    }
    if let Some(address) = patch.address {
        active_model.address = Set(Some(address));
    }
    if let Some(is_default) = patch.is_default {
        active_model.is_default = Set(is_default);
    }
    if let Some(is_active) = patch.is_active {
        active_model.is_active = Set(is_active);
    }

    let updated = active_model.update(&txn).await?;
    txn.commit().await?;

    Ok(updated)
}

/// Delete a client. The default client is never deletable, and neither
/// is a client that transactions still reference. Deleting an id that
/// does not exist is a no-op.
pub async fn delete_client(db: &DatabaseConnection, id: &str) -> Result<(), ServiceError> {
    let Some(existing) = Client::find_by_id(id.to_owned()).one(db).await? else {
        return Ok(());
    };

    if existing.is_default {
        return Err(ServiceError::Conflict(
            "No se puede eliminar el cliente por defecto",
        ));
    }

    let referenced = Transaction::find()
        .filter(transaction::Column::ClientId.eq(id))
        .count(db)
        .await?;
    if referenced > 0 {
        return Err(ServiceError::Conflict(
            "No se puede eliminar un cliente con transacciones asociadas",
        ));
    }

    existing.delete(db).await?;
    Ok(())
}

async fn clear_default<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    Client::update_many()
        .col_expr(client::Column::IsDefault, Expr::value(false))
        .filter(client::Column::IsDefault.eq(true))
        .exec(conn)
        .await?;
    Ok(())
}
