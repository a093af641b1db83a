//! Client search history persistence.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::SearchEntry;

/// Append a filter to a client's history.
pub async fn record_search(pool: &SqlitePool, client_id: i64, filter: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO historico_pesquisas (cliente_id, filtro)
        VALUES (?, ?)
        "#,
    )
    .bind(client_id)
    .bind(filter)
    .execute(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            DatabaseError::NotFound {
                entity: "Client",
                id: client_id.to_string(),
            }
        }
        other => DatabaseError::Sqlx(other),
    })?;

    Ok(())
}

/// A client's history entries, most recent first.
pub async fn history(pool: &SqlitePool, client_id: i64) -> Result<Vec<SearchEntry>> {
    let rows = sqlx::query_as::<_, SearchEntry>(
        r#"
        SELECT id, cliente_id, filtro, CAST(data_pesquisa AS TEXT) AS data_pesquisa
        FROM historico_pesquisas
        WHERE cliente_id = ?
        ORDER BY data_pesquisa DESC, id DESC
        "#,
    )
    .bind(client_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// A client's filters in the order they were searched.
pub async fn filters_oldest_first(pool: &SqlitePool, client_id: i64) -> Result<Vec<String>> {
    let filters = sqlx::query_scalar::<_, String>(
        r#"
        SELECT filtro
        FROM historico_pesquisas
        WHERE cliente_id = ?
        ORDER BY data_pesquisa, id
        "#,
    )
    .bind(client_id)
    .fetch_all(pool)
    .await?;

    Ok(filters)
}

/// Remove a client's whole history. Returns the number of entries removed.
pub async fn clear_history(pool: &SqlitePool, client_id: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM historico_pesquisas
        WHERE cliente_id = ?
        "#,
    )
    .bind(client_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
