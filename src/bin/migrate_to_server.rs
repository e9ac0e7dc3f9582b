//! One-shot migration: copies the auctions and auction_images tables from
//! a local database file to a server database file. Plain paginated copy,
//! no transform; the destination tables are emptied first and row ids are
//! preserved.

use courtauction_scraper::db::connection::SCHEMA;
use courtauction_scraper::errors::StoreError;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const BATCH_SIZE: usize = 1000;
const TABLES: [&str; 3] = ["auctions", "auction_images", "auction_studies"];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    dotenvy::dotenv().ok();

    let local_path = env::var("LOCAL_DB_PATH").unwrap_or_else(|_| "auctions.sqlite3".to_string());
    let server_path = match env::var("SERVER_DB_PATH") {
        Ok(path) => path,
        Err(_) => {
            eprintln!("SERVER_DB_PATH must be set");
            std::process::exit(1);
        }
    };

    info!("local database: {local_path}");
    info!("server database: {server_path}");

    if let Err(e) = migrate(&local_path, &server_path) {
        error!("migration failed: {e}");
        std::process::exit(1);
    }
    info!("all collections migrated");
}

fn migrate(local_path: &str, server_path: &str) -> Result<(), StoreError> {
    let local = Connection::open(local_path)
        .map_err(|e| StoreError::Db(format!("local connection failed: {e}")))?;
    let mut server = Connection::open(server_path)
        .map_err(|e| StoreError::Db(format!("server connection failed: {e}")))?;

    server
        .execute_batch(SCHEMA)
        .map_err(|e| StoreError::Db(format!("schema apply failed: {e}")))?;

    for table in TABLES {
        migrate_table(&local, &mut server, table)?;
    }
    Ok(())
}

fn db_err(e: rusqlite::Error) -> StoreError {
    StoreError::Db(e.to_string())
}

fn migrate_table(local: &Connection, server: &mut Connection, table: &str) -> Result<(), StoreError> {
    info!("migrating {table}...");

    server
        .execute(&format!("DELETE FROM {table}"), [])
        .map_err(db_err)?;

    let mut select = local
        .prepare(&format!("SELECT * FROM {table} LIMIT ?1 OFFSET ?2"))
        .map_err(db_err)?;
    let columns: Vec<String> = select.column_names().iter().map(|c| c.to_string()).collect();

    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    let insert_sql = format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );

    let mut copied: usize = 0;
    loop {
        let batch: Vec<Vec<Value>> = select
            .query_map([BATCH_SIZE as i64, copied as i64], |row| {
                (0..columns.len()).map(|i| row.get::<_, Value>(i)).collect()
            })
            .map_err(db_err)?
            .collect::<Result<_, _>>()
            .map_err(db_err)?;

        if batch.is_empty() {
            break;
        }

        let tx = server.transaction().map_err(db_err)?;
        {
            let mut insert = tx.prepare(&insert_sql).map_err(db_err)?;
            for row in &batch {
                insert.execute(params_from_iter(row.iter())).map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;

        copied += batch.len();
        info!("progress: {copied} rows copied");
    }

    if copied > 0 {
        verify_sample_id(local, server, table)?;
    }
    info!("migration of {table} finished: {copied} rows");
    Ok(())
}

/// Spot check that a sampled row id survived the copy unchanged.
fn verify_sample_id(local: &Connection, server: &Connection, table: &str) -> Result<(), StoreError> {
    let sample_id: i64 = local
        .query_row(&format!("SELECT id FROM {table} LIMIT 1"), [], |row| row.get(0))
        .map_err(db_err)?;

    let found: i64 = server
        .query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE id = ?1"),
            [sample_id],
            |row| row.get(0),
        )
        .map_err(db_err)?;

    if found > 0 {
        info!("id preservation verified: {table} id {sample_id} present on server");
    } else {
        warn!("id preservation failed: {table} id {sample_id} missing on server");
    }
    Ok(())
}
