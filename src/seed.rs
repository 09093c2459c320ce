use sea_orm::*;
use uuid::Uuid;

use crate::models::client::{self, Entity as Client};

/// Make sure a default walk-in client exists and return it. Runs at
/// startup and behind POST /api/init, so it must be idempotent: an
/// existing default wins over creating a new one.
pub async fn ensure_default_client(db: &DatabaseConnection) -> Result<client::Model, DbErr> {
    if let Some(existing) = Client::find()
        .filter(client::Column::IsDefault.eq(true))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let generic = client::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set("Cliente Genérico".to_owned()),
        email: Set(Some(String::new())),
        phone: Set(Some(String::new())),
        nif: Set(Some(String::new())),
        address: Set(Some(String::new())),
        is_default: Set(true),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
    };

    generic.insert(db).await
}
