//! Vehicle repository.

use sqlx::SqlitePool;

use catalog_core::Vehicle;

use crate::error::{DatabaseError, Result};
use crate::models::VehicleRow;
use crate::statement::{bind_value, SqlValue};

fn column_for(field: &str) -> Option<&'static str> {
    match field {
        "marca" | "brand" => Some("marca"),
        "modelo" | "model" => Some("modelo"),
        "ano" | "year" => Some("ano"),
        "preco" | "price" => Some("preco"),
        "quilometragem" | "mileage" => Some("quilometragem"),
        _ => None,
    }
}

/// Insert a vehicle, optionally owned by an advertiser. Returns the new id.
pub async fn save(pool: &SqlitePool, vehicle: &Vehicle, advertiser_id: Option<i64>) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO veiculos (marca, modelo, ano, preco, quilometragem, anunciante_id)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&vehicle.brand)
    .bind(&vehicle.model)
    .bind(vehicle.year)
    .bind(vehicle.price)
    .bind(vehicle.mileage)
    .bind(advertiser_id)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Get a vehicle by ID.
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Vehicle>> {
    let row = sqlx::query_as::<_, VehicleRow>(
        r#"
        SELECT id, marca, modelo, ano, preco, quilometragem, anunciante_id
        FROM veiculos
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Vehicle::from))
}

/// List all vehicles.
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Vehicle>> {
    let rows = sqlx::query_as::<_, VehicleRow>(
        r#"
        SELECT id, marca, modelo, ano, preco, quilometragem, anunciante_id
        FROM veiculos
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Vehicle::from).collect())
}

/// List the vehicles owned by one advertiser.
pub async fn list_by_owner(pool: &SqlitePool, advertiser_id: i64) -> Result<Vec<Vehicle>> {
    let rows = sqlx::query_as::<_, VehicleRow>(
        r#"
        SELECT id, marca, modelo, ano, preco, quilometragem, anunciante_id
        FROM veiculos
        WHERE anunciante_id = ?
        ORDER BY id
        "#,
    )
    .bind(advertiser_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Vehicle::from).collect())
}

/// Vehicles whose brand or model contains `filter`, ignoring case.
pub async fn search(pool: &SqlitePool, filter: &str) -> Result<Vec<Vehicle>> {
    let pattern = format!("%{}%", filter.to_lowercase());
    let rows = sqlx::query_as::<_, VehicleRow>(
        r#"
        SELECT id, marca, modelo, ano, preco, quilometragem, anunciante_id
        FROM veiculos
        WHERE LOWER(marca) LIKE ? OR LOWER(modelo) LIKE ?
        ORDER BY id
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Vehicle::from).collect())
}

/// Update whitelisted columns (`marca`, `modelo`, `ano`, `preco`,
/// `quilometragem`). Unrecognized field names are skipped without error.
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
    let sql = format!("UPDATE veiculos SET {assignments} WHERE id = ?");

    let result = recognized
        .iter()
        .fold(sqlx::query(&sql), |query, (_, value)| bind_value(query, value))
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Delete a vehicle. Its advertisement, if any, goes with it.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM veiculos
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Vehicle",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Count total vehicles.
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM veiculos
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
