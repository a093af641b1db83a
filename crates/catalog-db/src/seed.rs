//! Bootstrap data: the default administrator and a demonstration catalog.

use catalog_core::{today, Account, AdStatus, Admin, Role, User};

use crate::statement::SqlValue;
use crate::{user, Database, Result};

pub const DEFAULT_ADMIN_CPF: &str = "00000000000";
pub const DEFAULT_ADMIN_NAME: &str = "Administrador";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@admin.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_ADMIN_ID: i64 = 1;

/// Create the default administrator. Returns its user id.
///
/// Fails with `AlreadyExists` if the account is already there.
pub async fn create_default_admin(db: &Database) -> Result<i64> {
    let admin: User = Admin::new(
        Account::new(
            0,
            DEFAULT_ADMIN_CPF,
            DEFAULT_ADMIN_NAME,
            DEFAULT_ADMIN_EMAIL,
            DEFAULT_ADMIN_PASSWORD,
        ),
        DEFAULT_ADMIN_ID,
    )
    .into();

    let id = user::save(db.pool(), &admin).await?;
    tracing::info!(user_id = id, email = DEFAULT_ADMIN_EMAIL, "Created default admin");
    Ok(id)
}

/// What [`insert_sample_data`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleData {
    pub advertisers: usize,
    pub clients: usize,
    pub vehicles: usize,
    pub advertisements: usize,
    pub searches: usize,
}

async fn insert_user(
    db: &Database,
    role: Role,
    cpf: &str,
    name: &str,
    email: &str,
    password: &str,
) -> Result<i64> {
    let executed = db
        .execute(
            "INSERT INTO usuarios (cpf, nome, email, senha, tipo) VALUES (?, ?, ?, ?, ?)",
            &[cpf.into(), name.into(), email.into(), password.into(), role.as_str().into()],
        )
        .await?;
    Ok(executed.last_insert_id)
}

/// Insert three advertisers, two clients, seven vehicles, seven
/// advertisements (four approved, two pending, one rejected) and four
/// history entries.
pub async fn insert_sample_data(db: &Database) -> Result<SampleData> {
    let advertisers = [
        ("12345678900", "João Silva", "joao@email.com", "senha123", "(11) 98765-4321"),
        ("98765432100", "Maria Santos", "maria@email.com", "senha456", "(21) 99999-8888"),
        ("11111111111", "Pedro Costa", "pedro@email.com", "senha789", "(31) 97777-6666"),
    ];
    let mut advertiser_ids = Vec::with_capacity(advertisers.len());
    for (cpf, name, email, password, phone) in advertisers {
        let id = insert_user(db, Role::Advertiser, cpf, name, email, password).await?;
        db.execute(
            "INSERT INTO anunciantes (usuario_id, telefone) VALUES (?, ?)",
            &[id.into(), phone.into()],
        )
        .await?;
        advertiser_ids.push(id);
    }

    let clients = [
        ("22222222222", "Ana Lima", "ana@email.com", "senha000"),
        ("33333333333", "Carlos Souza", "carlos@email.com", "senha111"),
    ];
    let mut client_ids = Vec::with_capacity(clients.len());
    for (cpf, name, email, password) in clients {
        client_ids.push(insert_user(db, Role::Client, cpf, name, email, password).await?);
    }
    db.execute_many(
        "INSERT INTO clientes (usuario_id) VALUES (?)",
        &client_ids.iter().map(|id| vec![(*id).into()]).collect::<Vec<_>>(),
    )
    .await?;

    let (joao, maria, pedro) = (advertiser_ids[0], advertiser_ids[1], advertiser_ids[2]);
    let vehicles = [
        ("Toyota", "Corolla", 2020, 85000.0, 50000, joao),
        ("Honda", "Civic", 2019, 75000.0, 40000, joao),
        ("Ford", "Ka", 2018, 35000.0, 45000, maria),
        ("Volkswagen", "Gol", 2018, 45000.0, 60000, maria),
        ("Chevrolet", "Onix", 2021, 60000.0, 30000, maria),
        ("Toyota", "Hilux", 2021, 150000.0, 20000, pedro),
        ("Fiat", "Palio", 2015, 28000.0, 70000, pedro),
    ];
    let mut vehicle_ids = Vec::with_capacity(vehicles.len());
    for (brand, model, year, price, mileage, owner) in vehicles {
        let executed = db
            .execute(
                "INSERT INTO veiculos (marca, modelo, ano, preco, quilometragem, anunciante_id) \
                 VALUES (?, ?, ?, ?, ?, ?)",
                &[
                    brand.into(),
                    model.into(),
                    SqlValue::Integer(year),
                    price.into(),
                    SqlValue::Integer(mileage),
                    owner.into(),
                ],
            )
            .await?;
        vehicle_ids.push(executed.last_insert_id);
    }

    let date = today();
    let ads = [
        (AdStatus::Approved, 0, joao),
        (AdStatus::Approved, 1, joao),
        (AdStatus::Approved, 2, maria),
        (AdStatus::Approved, 4, maria),
        (AdStatus::Pending, 3, maria),
        (AdStatus::Pending, 5, pedro),
        (AdStatus::Rejected, 6, pedro),
    ];
    let ad_rows: Vec<Vec<SqlValue>> = ads
        .iter()
        .map(|(status, vehicle, owner)| {
            vec![
                date.as_str().into(),
                status.as_str().into(),
                vehicle_ids[*vehicle].into(),
                (*owner).into(),
            ]
        })
        .collect();
    db.execute_many(
        "INSERT INTO anuncios (data_publicacao, status, veiculo_id, anunciante_id) VALUES (?, ?, ?, ?)",
        &ad_rows,
    )
    .await?;

    let searches = [
        (client_ids[0], "Toyota"),
        (client_ids[0], "Honda"),
        (client_ids[1], "Ford"),
        (client_ids[1], "Volkswagen"),
    ];
    let search_rows: Vec<Vec<SqlValue>> = searches
        .iter()
        .map(|(client, filter)| vec![(*client).into(), (*filter).into()])
        .collect();
    db.execute_many(
        "INSERT INTO historico_pesquisas (cliente_id, filtro) VALUES (?, ?)",
        &search_rows,
    )
    .await?;

    let written = SampleData {
        advertisers: advertiser_ids.len(),
        clients: client_ids.len(),
        vehicles: vehicle_ids.len(),
        advertisements: ad_rows.len(),
        searches: search_rows.len(),
    };
    tracing::info!(?written, "Inserted sample data");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatabaseError;
    use crate::stats;
    use crate::test_support::test_db;

    #[tokio::test]
    async fn test_default_admin_is_created_once() {
        let db = test_db().await;
        let id = create_default_admin(&db).await.unwrap();

        let (admin, role) = user::find_by_email(db.pool(), DEFAULT_ADMIN_EMAIL)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.id(), id);
        assert_eq!(role, Role::Admin);
        assert!(admin.as_approver().is_some());

        assert!(matches!(
            create_default_admin(&db).await,
            Err(DatabaseError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_sample_data_counts() {
        let db = test_db().await;
        create_default_admin(&db).await.unwrap();
        let written = insert_sample_data(&db).await.unwrap();
        assert_eq!(written.vehicles, 7);

        let stats = stats::collect(db.pool()).await.unwrap();
        assert_eq!(stats.admins, 1);
        assert_eq!(stats.advertisers, 3);
        assert_eq!(stats.clients, 2);
        assert_eq!(stats.vehicles, 7);
        assert_eq!(stats.approved_ads, 4);
        assert_eq!(stats.pending_ads, 2);
        assert_eq!(stats.rejected_ads, 1);

        let (ana, _) = user::find_by_email(db.pool(), "ana@email.com").await.unwrap().unwrap();
        assert_eq!(
            ana.as_searcher().unwrap().search_history(),
            ["Toyota", "Honda"]
        );
    }
}
