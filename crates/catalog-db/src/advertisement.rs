//! Advertisement repository.
//!
//! Reads resolve the vehicle eagerly through a join and keep the advertiser
//! as an id, so no load ever walks back into the owner's advertisements.

use sqlx::SqlitePool;

use catalog_core::{AdStatus, Advertisement};

use crate::error::{DatabaseError, Result};
use crate::models::AdvertisementRow;
use crate::statement::{bind_value, SqlValue};

const SELECT_JOINED: &str = r#"
    SELECT a.id, a.data_publicacao, a.status, a.anunciante_id,
           v.id AS veiculo_id, v.marca, v.modelo, v.ano, v.preco, v.quilometragem,
           v.anunciante_id AS veiculo_anunciante_id
    FROM anuncios a
    JOIN veiculos v ON v.id = a.veiculo_id
"#;

fn column_for(field: &str) -> Option<&'static str> {
    match field {
        "data_publicacao" | "publication_date" => Some("data_publicacao"),
        "status" => Some("status"),
        _ => None,
    }
}

fn into_ads(rows: Vec<AdvertisementRow>) -> Result<Vec<Advertisement>> {
    rows.into_iter().map(Advertisement::try_from).collect()
}

/// Insert an advertisement for `vehicle_id` owned by `advertiser_id`.
/// Returns the new id.
///
/// A vehicle carries at most one advertisement; a second one is refused
/// with `AlreadyExists`.
pub async fn save(
    pool: &SqlitePool,
    ad: &Advertisement,
    vehicle_id: i64,
    advertiser_id: i64,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO anuncios (data_publicacao, status, veiculo_id, anunciante_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&ad.publication_date)
    .bind(ad.status().as_str())
    .bind(vehicle_id)
    .bind(advertiser_id)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::from_write(e, "Advertisement", format!("vehicle {}", vehicle_id)))?;

    Ok(result.last_insert_rowid())
}

/// Get an advertisement by ID.
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Advertisement>> {
    let sql = format!("{SELECT_JOINED} WHERE a.id = ?");
    let row = sqlx::query_as::<_, AdvertisementRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(Advertisement::try_from).transpose()
}

/// List all advertisements.
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Advertisement>> {
    let sql = format!("{SELECT_JOINED} ORDER BY a.id");
    let rows = sqlx::query_as::<_, AdvertisementRow>(&sql)
        .fetch_all(pool)
        .await?;

    into_ads(rows)
}

/// List the advertisements of one advertiser.
pub async fn list_by_owner(pool: &SqlitePool, advertiser_id: i64) -> Result<Vec<Advertisement>> {
    let sql = format!("{SELECT_JOINED} WHERE a.anunciante_id = ? ORDER BY a.id");
    let rows = sqlx::query_as::<_, AdvertisementRow>(&sql)
        .bind(advertiser_id)
        .fetch_all(pool)
        .await?;

    into_ads(rows)
}

/// List advertisements in one status.
pub async fn list_by_status(pool: &SqlitePool, status: AdStatus) -> Result<Vec<Advertisement>> {
    let sql = format!("{SELECT_JOINED} WHERE a.status = ? ORDER BY a.id");
    let rows = sqlx::query_as::<_, AdvertisementRow>(&sql)
        .bind(status.as_str())
        .fetch_all(pool)
        .await?;

    into_ads(rows)
}

/// Write a status directly. No lifecycle rule is checked here.
pub async fn update_status(pool: &SqlitePool, id: i64, status: AdStatus) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE anuncios
        SET status = ?
        WHERE id = ?
        "#,
    )
    .bind(status.as_str())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Advertisement",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Update whitelisted columns (`data_publicacao`, `status`). Unrecognized
/// field names are skipped without error.
pub async fn update(pool: &SqlitePool, id: i64, fields: &[(&str, SqlValue)]) -> Result<u64> {
    let recognized: Vec<(&'static str, &SqlValue)> = fields
        .iter()
        .filter_map(|(field, value)| column_for(field).map(|column| (column, value)))
        .collect();

    if recognized.is_empty() {
        return Ok(0);
    }

    let assignments = recognized
        .iter()
        .map(|(column, _)| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("UPDATE anuncios SET {assignments} WHERE id = ?");

    let result = recognized
        .iter()
        .fold(sqlx::query(&sql), |query, (_, value)| bind_value(query, value))
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Delete an advertisement by ID.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM anuncios
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Advertisement",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Count advertisements per status, in [`AdStatus::ALL`] order.
pub async fn count_by_status(pool: &SqlitePool) -> Result<Vec<(AdStatus, i64)>> {
    let mut counts = Vec::with_capacity(AdStatus::ALL.len());
    for status in AdStatus::ALL {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM anuncios WHERE status = ?
            "#,
        )
        .bind(status.as_str())
        .fetch_one(pool)
        .await?;
        counts.push((status, count));
    }
    Ok(counts)
}
