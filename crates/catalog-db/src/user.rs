//! User repository: `usuarios` plus the role tables.

use sqlx::SqlitePool;

use catalog_core::{Admin, Advertiser, Client, Role, User, ValidationError};

use crate::error::{DatabaseError, Result};
use crate::models::UserRow;
use crate::statement::{bind_value, SqlValue};
use crate::{advertisement, search_history};

/// Column for an updatable user field, or `None` if the field is not whitelisted.
fn column_for(field: &str) -> Option<&'static str> {
    match field {
        "nome" | "name" => Some("nome"),
        "email" => Some("email"),
        "senha" | "password" => Some("senha"),
        "logado" | "logged_in" => Some("logado"),
        _ => None,
    }
}

/// Insert a user and its role row. Returns the new user id.
///
/// If the role row is refused (for example a duplicate `admin_id`), the
/// user row is removed again before the error is returned.
pub async fn save(pool: &SqlitePool, user: &User) -> Result<i64> {
    let account = user.account();
    let result = sqlx::query(
        r#"
        INSERT INTO usuarios (cpf, nome, email, senha, tipo, logado)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(account.cpf())
    .bind(account.name())
    .bind(account.email())
    .bind(account.password())
    .bind(user.role().as_str())
    .bind(account.is_logged_in())
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::from_write(e, "User", account.email()))?;

    let user_id = result.last_insert_rowid();

    if let Err(e) = save_role_row(pool, user_id, user).await {
        sqlx::query("DELETE FROM usuarios WHERE id = ?")
            .bind(user_id)
            .execute(pool)
            .await?;
        return Err(e);
    }

    tracing::debug!(user_id, role = %user.role(), "Saved user");
    Ok(user_id)
}

async fn save_role_row(pool: &SqlitePool, user_id: i64, user: &User) -> Result<()> {
    match user {
        User::Admin(admin) => {
            sqlx::query(
                r#"
                INSERT INTO admins (usuario_id, admin_id)
                VALUES (?, ?)
                "#,
            )
            .bind(user_id)
            .bind(admin.admin_id)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Admin", admin.admin_id.to_string()))?;
        }
        User::Advertiser(advertiser) => {
            sqlx::query(
                r#"
                INSERT INTO anunciantes (usuario_id, telefone)
                VALUES (?, ?)
                "#,
            )
            .bind(user_id)
            .bind(advertiser.phone())
            .execute(pool)
            .await?;
        }
        User::Client(_) => {
            sqlx::query(
                r#"
                INSERT INTO clientes (usuario_id)
                VALUES (?)
                "#,
            )
            .bind(user_id)
            .execute(pool)
            .await?;
        }
    }
    Ok(())
}

/// Get a user by ID.
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, cpf, nome, email, senha, tipo, logado
        FROM usuarios
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(hydrate(pool, row).await?)),
        None => Ok(None),
    }
}

/// Get a user and its role by email.
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<(User, Role)>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, cpf, nome, email, senha, tipo, logado
        FROM usuarios
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let user = hydrate(pool, row).await?;
            let role = user.role();
            Ok(Some((user, role)))
        }
        None => Ok(None),
    }
}

/// List all users, optionally restricted to one role.
pub async fn list_all(pool: &SqlitePool, role: Option<Role>) -> Result<Vec<User>> {
    let rows = match role {
        Some(role) => {
            sqlx::query_as::<_, UserRow>(
                r#"
                SELECT id, cpf, nome, email, senha, tipo, logado
                FROM usuarios
                WHERE tipo = ?
                ORDER BY id
                "#,
            )
            .bind(role.as_str())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, UserRow>(
                r#"
                SELECT id, cpf, nome, email, senha, tipo, logado
                FROM usuarios
                ORDER BY id
                "#,
            )
            .fetch_all(pool)
            .await?
        }
    };

    let mut users = Vec::with_capacity(rows.len());
    for row in rows {
        users.push(hydrate(pool, row).await?);
    }
    Ok(users)
}

/// Update whitelisted columns (`nome`, `email`, `senha`, `logado`).
///
/// Unrecognized field names are skipped without error. Returns the number of
/// rows changed, which is `0` when nothing recognized was given.
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
    let sql = format!("UPDATE usuarios SET {assignments} WHERE id = ?");

    let query = recognized
        .iter()
        .fold(sqlx::query(&sql), |query, (_, value)| bind_value(query, value));
    let result = query
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "User", id.to_string()))?;

    Ok(result.rows_affected())
}

/// Replace an advertiser's phone number. Blank numbers are rejected.
pub async fn update_phone(pool: &SqlitePool, user_id: i64, phone: &str) -> Result<()> {
    if phone.trim().is_empty() {
        return Err(ValidationError::Empty("phone".to_string()).into());
    }

    let result = sqlx::query(
        r#"
        UPDATE anunciantes
        SET telefone = ?
        WHERE usuario_id = ?
        "#,
    )
    .bind(phone)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Advertiser",
            id: user_id.to_string(),
        });
    }

    Ok(())
}

/// Delete a user. Role rows, search history, advertisements and vehicle
/// ownership follow through the foreign keys.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM usuarios
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Next free `admin_id` (one past the highest in use).
pub async fn next_admin_id(pool: &SqlitePool) -> Result<i64> {
    let max = sqlx::query_scalar::<_, Option<i64>>(
        r#"
        SELECT MAX(admin_id) FROM admins
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(max.unwrap_or(0) + 1)
}

/// Count users grouped by role, in [`Role::ALL`] order.
pub async fn count_by_role(pool: &SqlitePool) -> Result<Vec<(Role, i64)>> {
    let mut counts = Vec::with_capacity(Role::ALL.len());
    for role in Role::ALL {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM usuarios WHERE tipo = ?
            "#,
        )
        .bind(role.as_str())
        .fetch_one(pool)
        .await?;
        counts.push((role, count));
    }
    Ok(counts)
}

/// Build the role-specific entity for a `usuarios` row.
async fn hydrate(pool: &SqlitePool, row: UserRow) -> Result<User> {
    let role = row.role()?;
    let id = row.id;
    let account = row.into_account();

    let user = match role {
        Role::Admin => {
            let admin_id = sqlx::query_scalar::<_, i64>(
                r#"
                SELECT admin_id FROM admins WHERE usuario_id = ?
                "#,
            )
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| missing_role_row("admins", id))?;
            Admin::new(account, admin_id).into()
        }
        Role::Advertiser => {
            let phone = sqlx::query_scalar::<_, String>(
                r#"
                SELECT telefone FROM anunciantes WHERE usuario_id = ?
                "#,
            )
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| missing_role_row("anunciantes", id))?;
            let ads = advertisement::list_by_owner(pool, id).await?;
            Advertiser::new(account, phone).with_ads(ads).into()
        }
        Role::Client => {
            let history = search_history::filters_oldest_first(pool, id).await?;
            Client::new(account).with_history(history).into()
        }
    };

    tracing::debug!(user_id = id, role = %role, "Loaded user");
    Ok(user)
}

fn missing_role_row(table: &str, id: i64) -> DatabaseError {
    DatabaseError::Corrupt {
        entity: "User",
        detail: format!("user {} has no row in {}", id, table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use catalog_core::Account;

    fn advertiser(cpf: &str, email: &str) -> User {
        Advertiser::new(Account::new(0, cpf, "João", email, "senha123"), "119999").into()
    }

    fn client(cpf: &str, email: &str) -> User {
        Client::new(Account::new(0, cpf, "Ana Lima", email, "senha000")).into()
    }

    fn admin(admin_id: i64, email: &str) -> User {
        Admin::new(Account::new(0, "00000000000", "Administrador", email, "admin123"), admin_id).into()
    }

    #[tokio::test]
    async fn test_save_and_find_each_role() {
        let db = test_db().await;

        let admin_id = save(db.pool(), &admin(1, "admin@admin.com")).await.unwrap();
        let adv_id = save(db.pool(), &advertiser("12345678900", "joao@email.com")).await.unwrap();
        let client_id = save(db.pool(), &client("22222222222", "ana@email.com")).await.unwrap();
        assert!(admin_id < adv_id && adv_id < client_id);

        match find_by_id(db.pool(), admin_id).await.unwrap().unwrap() {
            User::Admin(a) => assert_eq!(a.admin_id, 1),
            other => panic!("expected admin, got {:?}", other.role()),
        }
        match find_by_id(db.pool(), adv_id).await.unwrap().unwrap() {
            User::Advertiser(a) => assert_eq!(a.phone(), "119999"),
            other => panic!("expected advertiser, got {:?}", other.role()),
        }

        let (user, role) = find_by_email(db.pool(), "ana@email.com").await.unwrap().unwrap();
        assert_eq!(role, Role::Client);
        assert_eq!(user.id(), client_id);

        assert!(find_by_id(db.pool(), 999).await.unwrap().is_none());
        assert!(find_by_email(db.pool(), "nobody@email.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = test_db().await;
        let first = save(db.pool(), &client("22222222222", "ana@email.com")).await.unwrap();

        let result = save(db.pool(), &client("33333333333", "ana@email.com")).await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { entity: "User", .. })));

        let (user, _) = find_by_email(db.pool(), "ana@email.com").await.unwrap().unwrap();
        assert_eq!(user.id(), first);
    }

    #[tokio::test]
    async fn test_duplicate_admin_id_leaves_no_orphan_user() {
        let db = test_db().await;
        save(db.pool(), &admin(1, "admin@admin.com")).await.unwrap();

        let mut second = admin(1, "root@admin.com");
        if let User::Admin(a) = &mut second {
            a.account = Account::new(0, "99999999999", "Root", "root@admin.com", "root1234");
        }
        let result = save(db.pool(), &second).await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { entity: "Admin", .. })));
        assert!(find_by_email(db.pool(), "root@admin.com").await.unwrap().is_none());
        assert_eq!(next_admin_id(db.pool()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_ignores_unknown_fields() {
        let db = test_db().await;
        let id = save(db.pool(), &client("22222222222", "ana@email.com")).await.unwrap();

        let changed = update(db.pool(), id, &[("cpf", "000".into()), ("tipo", "admin".into())])
            .await
            .unwrap();
        assert_eq!(changed, 0);

        update(
            db.pool(),
            id,
            &[("nome", "Ana Souza".into()), ("logado", true.into()), ("bogus", 1.into())],
        )
        .await
        .unwrap();

        let user = find_by_id(db.pool(), id).await.unwrap().unwrap();
        assert_eq!(user.name(), "Ana Souza");
        assert_eq!(user.role(), Role::Client);
        assert_eq!(user.account().cpf(), "22222222222");
        assert!(user.account().is_logged_in());
    }

    #[tokio::test]
    async fn test_update_phone_rejects_blank() {
        let db = test_db().await;
        let id = save(db.pool(), &advertiser("12345678900", "joao@email.com")).await.unwrap();

        assert!(matches!(
            update_phone(db.pool(), id, "  ").await,
            Err(DatabaseError::Validation(ValidationError::Empty(_)))
        ));
        update_phone(db.pool(), id, "(11) 98765-4321").await.unwrap();

        match find_by_id(db.pool(), id).await.unwrap().unwrap() {
            User::Advertiser(a) => assert_eq!(a.phone(), "(11) 98765-4321"),
            other => panic!("expected advertiser, got {:?}", other.role()),
        }
    }

    #[tokio::test]
    async fn test_list_and_count_by_role() {
        let db = test_db().await;
        save(db.pool(), &admin(1, "admin@admin.com")).await.unwrap();
        save(db.pool(), &advertiser("12345678900", "joao@email.com")).await.unwrap();
        save(db.pool(), &client("22222222222", "ana@email.com")).await.unwrap();
        save(db.pool(), &client("33333333333", "carlos@email.com")).await.unwrap();

        assert_eq!(list_all(db.pool(), None).await.unwrap().len(), 4);
        assert_eq!(list_all(db.pool(), Some(Role::Client)).await.unwrap().len(), 2);
        assert_eq!(
            count_by_role(db.pool()).await.unwrap(),
            vec![(Role::Admin, 1), (Role::Advertiser, 1), (Role::Client, 2)]
        );
    }

    #[tokio::test]
    async fn test_delete_user() {
        let db = test_db().await;
        let id = save(db.pool(), &client("22222222222", "ana@email.com")).await.unwrap();

        delete(db.pool(), id).await.unwrap();
        assert!(find_by_id(db.pool(), id).await.unwrap().is_none());
        assert!(matches!(
            delete(db.pool(), id).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }
}
