//! Database row models and their conversion to entities.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use catalog_core::{Account, AdStatus, Advertisement, Role, Vehicle};

use crate::error::DatabaseError;

/// A row of `usuarios`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Taxpayer number, 11 digits.
    pub cpf: String,
    #[sqlx(rename = "nome")]
    pub name: String,
    pub email: String,
    #[sqlx(rename = "senha")]
    pub password: String,
    /// Stored role text (`admin`, `anunciante`, `cliente`).
    #[sqlx(rename = "tipo")]
    pub role: String,
    #[sqlx(rename = "logado")]
    pub logged_in: bool,
}

impl UserRow {
    pub fn role(&self) -> Result<Role, DatabaseError> {
        self.role.parse().map_err(|_| DatabaseError::Corrupt {
            entity: "User",
            detail: format!("unknown role '{}' for user {}", self.role, self.id),
        })
    }

    pub fn into_account(self) -> Account {
        Account::new(self.id, self.cpf, self.name, self.email, self.password)
            .with_logged_in(self.logged_in)
    }
}

/// A row of `veiculos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VehicleRow {
    /// Auto-incrementing ID.
    pub id: i64,
    #[sqlx(rename = "marca")]
    pub brand: String,
    #[sqlx(rename = "modelo")]
    pub model: String,
    #[sqlx(rename = "ano")]
    pub year: i32,
    #[sqlx(rename = "preco")]
    pub price: f64,
    #[sqlx(rename = "quilometragem")]
    pub mileage: i32,
    /// Owning advertiser, null once the advertiser is deleted.
    #[sqlx(rename = "anunciante_id")]
    pub advertiser_id: Option<i64>,
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Vehicle {
            id: row.id,
            brand: row.brand,
            model: row.model,
            year: row.year,
            price: row.price,
            mileage: row.mileage,
            advertiser_id: row.advertiser_id,
        }
    }
}

/// A row of `anuncios` joined with its vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AdvertisementRow {
    /// Auto-incrementing ID.
    pub id: i64,
    #[sqlx(rename = "data_publicacao")]
    pub publication_date: String,
    /// Stored status text (`Pendente`, `Aprovado`, `Rejeitado`).
    pub status: String,
    #[sqlx(rename = "anunciante_id")]
    pub advertiser_id: i64,
    #[sqlx(rename = "veiculo_id")]
    pub vehicle_id: i64,
    #[sqlx(rename = "marca")]
    pub brand: String,
    #[sqlx(rename = "modelo")]
    pub model: String,
    #[sqlx(rename = "ano")]
    pub year: i32,
    #[sqlx(rename = "preco")]
    pub price: f64,
    #[sqlx(rename = "quilometragem")]
    pub mileage: i32,
    #[sqlx(rename = "veiculo_anunciante_id")]
    pub vehicle_advertiser_id: Option<i64>,
}

impl TryFrom<AdvertisementRow> for Advertisement {
    type Error = DatabaseError;

    fn try_from(row: AdvertisementRow) -> Result<Self, Self::Error> {
        let status: AdStatus = row.status.parse().map_err(|_| DatabaseError::Corrupt {
            entity: "Advertisement",
            detail: format!("unknown status '{}' for advertisement {}", row.status, row.id),
        })?;
        let vehicle = Vehicle {
            id: row.vehicle_id,
            brand: row.brand,
            model: row.model,
            year: row.year,
            price: row.price,
            mileage: row.mileage,
            advertiser_id: row.vehicle_advertiser_id,
        };
        Ok(Advertisement::restore(
            row.id,
            row.publication_date,
            status,
            vehicle,
            row.advertiser_id,
        ))
    }
}

/// A row of `historico_pesquisas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SearchEntry {
    /// Auto-incrementing ID.
    pub id: i64,
    #[sqlx(rename = "cliente_id")]
    pub client_id: i64,
    #[sqlx(rename = "filtro")]
    pub filter: String,
    /// Creation timestamp.
    #[sqlx(rename = "data_pesquisa")]
    pub searched_at: String,
}
