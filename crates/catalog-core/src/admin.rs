//! Administrator role.

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::advertisement::Advertisement;
use crate::capability::{Approver, UserAction, UserManager};
use crate::error::{CatalogError, Result};
use crate::user::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub account: Account,
    pub admin_id: i64,
}

impl Admin {
    pub fn new(account: Account, admin_id: i64) -> Self {
        Self { account, admin_id }
    }

    pub fn exhibit_profile(&self) -> String {
        format!(
            "=== Administrator Profile ===\nUser ID: {}\nAdmin ID: {}\nName: {}\nEmail: {}\n",
            self.account.id(),
            self.admin_id,
            self.account.name(),
            self.account.email()
        )
    }
}

impl Approver for Admin {
    fn approve_ad(&self, ad: &mut Advertisement) -> Result<()> {
        ad.approve()
    }

    fn reject_ad(&self, ad: &mut Advertisement) -> Result<()> {
        ad.reject()
    }
}

fn not_found(id: i64) -> CatalogError {
    CatalogError::NotFound {
        entity: "User",
        id: id.to_string(),
    }
}

impl UserManager for Admin {
    fn manage_user(&self, action: UserAction, registry: &mut Vec<User>) -> Result<String> {
        match action {
            UserAction::Create(user) => {
                let message = format!("User {} created.", user.name());
                registry.push(user);
                Ok(message)
            }
            UserAction::Read(id) => registry
                .iter()
                .find(|u| u.id() == id)
                .map(User::exhibit_profile)
                .ok_or_else(|| not_found(id)),
            UserAction::Update { id, fields } => {
                let user = registry
                    .iter_mut()
                    .find(|u| u.id() == id)
                    .ok_or_else(|| not_found(id))?;
                user.update_info(fields)?;
                Ok(format!("User {} updated.", user.name()))
            }
            UserAction::Delete(id) => {
                let pos = registry
                    .iter()
                    .position(|u| u.id() == id)
                    .ok_or_else(|| not_found(id))?;
                let removed = registry.remove(pos);
                Ok(format!("User {} removed.", removed.name()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;

    fn admin() -> Admin {
        Admin::new(Account::new(1, "00000000000", "Administrador", "admin@admin.com", "admin123"), 1)
    }

    fn client(id: i64) -> User {
        Client::new(Account::new(id, "22222222222", "Ana Lima", "ana@email.com", "senha000")).into()
    }

    #[test]
    fn test_manage_user_crud() {
        let admin = admin();
        let mut registry = Vec::new();

        admin
            .manage_user(UserAction::Create(client(5)), &mut registry)
            .unwrap();
        assert_eq!(registry.len(), 1);

        let profile = admin.manage_user(UserAction::Read(5), &mut registry).unwrap();
        assert!(profile.contains("Ana Lima"));

        admin
            .manage_user(
                UserAction::Update {
                    id: 5,
                    fields: vec![("nome".to_string(), "Ana Souza".to_string())],
                },
                &mut registry,
            )
            .unwrap();
        assert_eq!(registry[0].name(), "Ana Souza");

        admin.manage_user(UserAction::Delete(5), &mut registry).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_delete_missing_user_is_not_found() {
        let admin = admin();
        let mut registry = vec![client(5)];
        assert!(matches!(
            admin.manage_user(UserAction::Delete(9), &mut registry),
            Err(CatalogError::NotFound { .. })
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_with_short_password_fails() {
        let admin = admin();
        let mut registry = vec![client(5)];
        let result = admin.manage_user(
            UserAction::Update {
                id: 5,
                fields: vec![("senha".to_string(), "abc".to_string())],
            },
            &mut registry,
        );
        assert!(matches!(result, Err(CatalogError::Validation(_))));
        assert_eq!(registry[0].account().password(), "senha000");
    }
}
