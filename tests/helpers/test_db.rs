use chamados::database::Database;

pub async fn setup_test_db() -> Database {
    // Install drivers for AnyPool (required for tests)
    sqlx::any::install_default_drivers();

    // Use file-based SQLite for tests (unique UUID per test for parallel execution)
    use uuid::Uuid;
    let temp_file = format!("test_{}.db", Uuid::new_v4());
    let db_url = format!("sqlite://{}?mode=rwc", temp_file);

    let db = Database::connect(&db_url)
        .await
        .expect("Failed to connect to test database");

    setup_schema(&db).await;

    db
}

async fn setup_schema(db: &Database) {
    let pool = db.pool();

    sqlx::query(
        "CREATE TABLE persons (
            id TEXT PRIMARY KEY,
            kind TEXT NOT NULL CHECK(kind IN ('cliente', 'tecnico')),
            name TEXT NOT NULL,
            cpf TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            profiles TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .expect("Failed to create persons table");

    sqlx::query("CREATE INDEX idx_persons_kind ON persons(kind)")
        .execute(pool)
        .await
        .ok();

    sqlx::query(
        "CREATE TABLE tickets (
            id TEXT PRIMARY KEY,
            opened_at TEXT NOT NULL,
            closed_at TEXT,
            priority TEXT NOT NULL CHECK(priority IN ('BAIXA', 'MEDIA', 'ALTA')),
            status TEXT NOT NULL CHECK(status IN ('ABERTO', 'EM_ANDAMENTO', 'PAUSADO', 'ENCERRADO', 'CANCELADO')) DEFAULT 'ABERTO',
            title TEXT NOT NULL,
            notes TEXT,
            client_id TEXT NOT NULL,
            technician_id TEXT,
            FOREIGN KEY (client_id) REFERENCES persons(id) ON DELETE RESTRICT,
            FOREIGN KEY (technician_id) REFERENCES persons(id) ON DELETE RESTRICT
        )",
    )
    .execute(pool)
    .await
    .expect("Failed to create tickets table");

    sqlx::query("CREATE INDEX idx_tickets_status ON tickets(status)")
        .execute(pool)
        .await
        .ok();

    sqlx::query("CREATE INDEX idx_tickets_priority ON tickets(priority)")
        .execute(pool)
        .await
        .ok();
}
