use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Create clients table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS clients (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            phone TEXT,
            nif TEXT,
            address TEXT,
            is_default INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_clients_name ON clients(name);
        CREATE INDEX IF NOT EXISTS idx_clients_is_default ON clients(is_default);
        "#
        .to_owned(),
    ))
    .await?;

    // Create transactions table
    // Money columns get NUMERIC affinity so amounts come back as numbers
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id TEXT PRIMARY KEY,
            client_id TEXT NOT NULL,
            sale_date TEXT NOT NULL,
            subtotal NUMERIC(10,2) NOT NULL,
            vat_amount NUMERIC(10,2) NOT NULL,
            total NUMERIC(10,2) NOT NULL,
            payment_method TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (client_id) REFERENCES clients(id)
        );
        CREATE INDEX IF NOT EXISTS idx_transactions_client_id ON transactions(client_id);
        CREATE INDEX IF NOT EXISTS idx_transactions_sale_date ON transactions(sale_date);
        CREATE INDEX IF NOT EXISTS idx_transactions_created_at ON transactions(created_at);
        "#
        .to_owned(),
    ))
    .await?;

    // Create transaction_items table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS transaction_items (
            id TEXT PRIMARY KEY,
            transaction_id TEXT NOT NULL,
            product_name TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            unit_price NUMERIC(10,2) NOT NULL,
            vat_rate INTEGER NOT NULL,
            subtotal NUMERIC(10,2) NOT NULL,
            vat_amount NUMERIC(10,2) NOT NULL,
            total NUMERIC(10,2) NOT NULL,
            FOREIGN KEY (transaction_id) REFERENCES transactions(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_transaction_items_transaction_id ON transaction_items(transaction_id);
        CREATE INDEX IF NOT EXISTS idx_transaction_items_vat_rate ON transaction_items(vat_rate);
        "#
        .to_owned(),
    ))
    .await?;

    Ok(())
}
