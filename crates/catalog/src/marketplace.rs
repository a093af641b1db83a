//! The marketplace service: registration, listings, approval and search.
//!
//! Every operation reads its entities fresh from the store. Capability and
//! ownership checks happen here, not in the entities, and a failed check is
//! answered with [`Decision::Denied`] instead of an error.

use tracing::{debug, info, warn};

use catalog_core::{
    validate_password, Account, AdStatus, Admin, Advertisement, Advertiser, Client, Role, User,
    ValidationError, Vehicle,
};
use catalog_db::{advertisement, search_history, user, vehicle, Database, SearchEntry};

use crate::decision::{Decision, Denial};
use crate::error::{MarketplaceError, Result};
use crate::validation::{validate_cpf, validate_email, validate_required, validate_vehicle};

/// Outcome an administrator gives a pending advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Approve,
    Reject,
}

/// Data needed to register a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub role: Role,
    pub cpf: String,
    pub name: String,
    pub email: String,
    pub password: String,
    /// Required for advertisers, ignored otherwise.
    pub phone: Option<String>,
    /// Admins only. The next free id is used when absent.
    pub admin_id: Option<i64>,
}

impl Registration {
    pub fn new(
        role: Role,
        cpf: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            role,
            cpf: cpf.into(),
            name: name.into(),
            email: email.into(),
            password: password.into(),
            phone: None,
            admin_id: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_admin_id(mut self, admin_id: i64) -> Self {
        self.admin_id = Some(admin_id);
        self
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        validate_cpf(&self.cpf)?;
        validate_required("name", &self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        if self.role == Role::Advertiser {
            validate_required("phone", self.phone.as_deref().unwrap_or_default())?;
        }
        Ok(())
    }
}

/// Attributes of a vehicle to create.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: i32,
    pub owner_id: Option<i64>,
}

impl NewVehicle {
    pub fn new(brand: impl Into<String>, model: impl Into<String>, year: i32, price: f64, mileage: i32) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            year,
            price,
            mileage,
            owner_id: None,
        }
    }

    pub fn owned_by(mut self, owner_id: i64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }
}

fn deny<T>(denial: Denial) -> Decision<T> {
    warn!(%denial, "Permission denied");
    Decision::Denied(denial)
}

/// Marketplace service over a catalog database.
#[derive(Debug, Clone)]
pub struct Marketplace {
    db: Database,
}

impl Marketplace {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn load_user(&self, id: i64) -> Result<User> {
        user::find_by_id(self.db.pool(), id)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound {
                entity: "User",
                id: id.to_string(),
            })
    }

    async fn load_advertisement(&self, id: i64) -> Result<Advertisement> {
        advertisement::find_by_id(self.db.pool(), id)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound {
                entity: "Advertisement",
                id: id.to_string(),
            })
    }

    /// Register a user of any role and return it as stored.
    ///
    /// A duplicate cpf, email or admin id fails with `Integrity`.
    pub async fn register(&self, registration: Registration) -> Result<User> {
        registration.validate()?;

        let Registration {
            role,
            cpf,
            name,
            email,
            password,
            phone,
            admin_id,
        } = registration;
        let account = Account::new(0, cpf, name, email.trim(), password);

        let new_user: User = match role {
            Role::Admin => {
                let admin_id = match admin_id {
                    Some(id) => id,
                    None => user::next_admin_id(self.db.pool()).await?,
                };
                Admin::new(account, admin_id).into()
            }
            Role::Advertiser => Advertiser::new(account, phone.unwrap_or_default()).into(),
            Role::Client => Client::new(account).into(),
        };

        let id = user::save(self.db.pool(), &new_user).await?;
        info!(user_id = id, role = %role, "Registered user");
        self.load_user(id).await
    }

    /// Check credentials. Returns `None` when the email is unknown or the
    /// password does not match. A successful login is recorded in the store.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<User>> {
        let Some((mut found, _)) = user::find_by_email(self.db.pool(), email).await? else {
            debug!(email, "Login for unknown email");
            return Ok(None);
        };

        if !found.login(email, password) {
            warn!(user_id = found.id(), "Login failed");
            return Ok(None);
        }

        user::update(self.db.pool(), found.id(), &[("logado", true.into())]).await?;
        info!(user_id = found.id(), "User logged in");
        Ok(Some(found))
    }

    pub async fn logout(&self, user_id: i64) -> Result<()> {
        let mut current = self.load_user(user_id).await?;
        current.logout();
        user::update(
            self.db.pool(),
            user_id,
            &[("logado", current.account().is_logged_in().into())],
        )
        .await?;
        info!(user_id, "User logged out");
        Ok(())
    }

    /// Change `name`, `email` or `password`.
    ///
    /// Fields are applied in order and the first invalid one stops the call.
    /// Whatever was applied before it is still saved, and the error is
    /// returned afterwards.
    pub async fn update_profile(&self, user_id: i64, fields: &[(&str, &str)]) -> Result<User> {
        let mut current = self.load_user(user_id).await?;
        let outcome = current.update_info(fields.iter().copied());

        let account = current.account();
        user::update(
            self.db.pool(),
            user_id,
            &[
                ("nome", account.name().into()),
                ("email", account.email().into()),
                ("senha", account.password().into()),
            ],
        )
        .await?;

        outcome?;
        info!(user_id, "Updated profile");
        Ok(current)
    }

    /// Remove a user. Only administrators may do this. The store removes the
    /// user's role row, history and advertisements, and orphans their vehicles.
    pub async fn delete_user(&self, actor_id: i64, target_id: i64) -> Result<Decision<()>> {
        let actor = self.load_user(actor_id).await?;
        if actor.as_user_manager().is_none() {
            return Ok(deny(Denial::NotAdmin { user_id: actor_id }));
        }

        user::delete(self.db.pool(), target_id).await?;
        info!(actor_id, user_id = target_id, "Deleted user");
        Ok(Decision::Allowed(()))
    }

    /// Create a vehicle, optionally owned by an advertiser.
    pub async fn create_vehicle(&self, new: NewVehicle) -> Result<Decision<Vehicle>> {
        validate_vehicle(&new.brand, &new.model, new.year, new.price, new.mileage)?;

        if let Some(owner_id) = new.owner_id {
            let owner = self.load_user(owner_id).await?;
            if owner.as_ad_creator().is_none() {
                return Ok(deny(Denial::NotAdvertiser { user_id: owner_id }));
            }
        }

        let mut created = Vehicle::new(new.brand, new.model, new.year, new.price, new.mileage);
        created.advertiser_id = new.owner_id;
        created.id = vehicle::save(self.db.pool(), &created, new.owner_id).await?;

        info!(vehicle_id = created.id, owner_id = ?new.owner_id, "Created vehicle");
        Ok(Decision::Allowed(created))
    }

    /// Publish a pending advertisement for one of the owner's vehicles.
    pub async fn create_advertisement(&self, owner_id: i64, vehicle_id: i64) -> Result<Decision<Advertisement>> {
        let mut owner = self.load_user(owner_id).await?;
        let target = vehicle::find_by_id(self.db.pool(), vehicle_id)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound {
                entity: "Vehicle",
                id: vehicle_id.to_string(),
            })?;

        let Some(creator) = owner.as_ad_creator_mut() else {
            return Ok(deny(Denial::NotAdvertiser { user_id: owner_id }));
        };
        if !target.is_owned_by(owner_id) {
            return Ok(deny(Denial::NotOwner {
                user_id: owner_id,
                resource: "Vehicle",
                id: vehicle_id,
            }));
        }

        let draft = creator.create_ad(target);
        let ad_id = advertisement::save(self.db.pool(), &draft, vehicle_id, owner_id).await?;

        info!(ad_id, vehicle_id, owner_id, "Created advertisement");
        Ok(Decision::Allowed(self.load_advertisement(ad_id).await?))
    }

    /// List advertisements, optionally filtered by status, owner, or both.
    pub async fn list_advertisements(
        &self,
        status: Option<AdStatus>,
        owner_id: Option<i64>,
    ) -> Result<Vec<Advertisement>> {
        let pool = self.db.pool();
        let ads = match (status, owner_id) {
            (None, None) => advertisement::list_all(pool).await?,
            (Some(status), None) => advertisement::list_by_status(pool, status).await?,
            (None, Some(owner)) => advertisement::list_by_owner(pool, owner).await?,
            (Some(status), Some(owner)) => advertisement::list_by_owner(pool, owner)
                .await?
                .into_iter()
                .filter(|ad| ad.status() == status)
                .collect(),
        };
        Ok(ads)
    }

    /// Approve a pending advertisement. Only administrators may do this.
    pub async fn approve(&self, actor_id: i64, ad_id: i64) -> Result<Decision<Advertisement>> {
        self.decide(actor_id, ad_id, Verdict::Approve).await
    }

    /// Reject a pending advertisement. Only administrators may do this.
    pub async fn reject(&self, actor_id: i64, ad_id: i64) -> Result<Decision<Advertisement>> {
        self.decide(actor_id, ad_id, Verdict::Reject).await
    }

    async fn decide(&self, actor_id: i64, ad_id: i64, verdict: Verdict) -> Result<Decision<Advertisement>> {
        let actor = self.load_user(actor_id).await?;
        let Some(approver) = actor.as_approver() else {
            return Ok(deny(Denial::NotAdmin { user_id: actor_id }));
        };

        let mut ad = self.load_advertisement(ad_id).await?;
        match verdict {
            Verdict::Approve => approver.approve_ad(&mut ad)?,
            Verdict::Reject => approver.reject_ad(&mut ad)?,
        }
        advertisement::update_status(self.db.pool(), ad_id, ad.status()).await?;

        info!(actor_id, ad_id, status = %ad.status(), "Advertisement decided");
        Ok(Decision::Allowed(ad))
    }

    /// Edit the publication date of one of the owner's advertisements.
    ///
    /// A `status` entry is denied with [`Denial::NotAdmin`] unless the actor
    /// can approve; status changes otherwise go through [`Self::approve`]
    /// and [`Self::reject`].
    pub async fn edit_advertisement(
        &self,
        actor_id: i64,
        ad_id: i64,
        fields: &[(&str, &str)],
    ) -> Result<Decision<Advertisement>> {
        let actor = self.load_user(actor_id).await?;
        let mut ad = self.load_advertisement(ad_id).await?;

        let Some(creator) = actor.as_ad_creator() else {
            return Ok(deny(Denial::NotAdvertiser { user_id: actor_id }));
        };
        if !creator.list_my_ads().iter().any(|mine| mine.id == ad_id) {
            return Ok(deny(Denial::NotOwner {
                user_id: actor_id,
                resource: "Advertisement",
                id: ad_id,
            }));
        }
        if fields.iter().any(|(key, _)| *key == "status") && actor.as_approver().is_none() {
            return Ok(deny(Denial::NotAdmin { user_id: actor_id }));
        }

        ad.apply_edit(fields)?;
        advertisement::update(
            self.db.pool(),
            ad_id,
            &[
                ("data_publicacao", ad.publication_date.as_str().into()),
                ("status", ad.status().as_str().into()),
            ],
        )
        .await?;

        info!(actor_id, ad_id, "Edited advertisement");
        Ok(Decision::Allowed(ad))
    }

    /// Delete one of the owner's advertisements. The vehicle stays.
    pub async fn delete_advertisement(&self, actor_id: i64, ad_id: i64) -> Result<Decision<()>> {
        let mut actor = self.load_user(actor_id).await?;
        self.load_advertisement(ad_id).await?;

        let Some(creator) = actor.as_ad_creator_mut() else {
            return Ok(deny(Denial::NotAdvertiser { user_id: actor_id }));
        };
        if !creator.delete_ad(ad_id) {
            return Ok(deny(Denial::NotOwner {
                user_id: actor_id,
                resource: "Advertisement",
                id: ad_id,
            }));
        }

        advertisement::delete(self.db.pool(), ad_id).await?;
        info!(actor_id, ad_id, "Deleted advertisement");
        Ok(Decision::Allowed(()))
    }

    /// Search approved advertisements by brand or model, ignoring case.
    ///
    /// Every search is added to the client's history, including searches
    /// with no match.
    pub async fn search(&self, client_id: i64, text: &str) -> Result<Decision<Vec<Advertisement>>> {
        let mut client = self.load_user(client_id).await?;
        let Some(searcher) = client.as_searcher_mut() else {
            return Ok(deny(Denial::NotClient { user_id: client_id }));
        };

        let approved = advertisement::list_by_status(self.db.pool(), AdStatus::Approved).await?;
        let candidates: Vec<Vehicle> = approved.iter().map(|ad| ad.vehicle.clone()).collect();
        let matches = searcher.search_vehicles(text, &candidates);
        search_history::record_search(self.db.pool(), client_id, text).await?;

        let hits: Vec<Advertisement> = approved
            .into_iter()
            .filter(|ad| matches.iter().any(|v| v.id == ad.vehicle.id))
            .collect();
        debug!(client_id, filter = text, hits = hits.len(), "Searched catalog");
        Ok(Decision::Allowed(hits))
    }

    /// A client's searches, most recent first.
    pub async fn history(&self, client_id: i64) -> Result<Decision<Vec<SearchEntry>>> {
        let client = self.load_user(client_id).await?;
        if client.as_searcher().is_none() {
            return Ok(deny(Denial::NotClient { user_id: client_id }));
        }
        Ok(Decision::Allowed(search_history::history(self.db.pool(), client_id).await?))
    }

    pub async fn my_vehicles(&self, owner_id: i64) -> Result<Vec<Vehicle>> {
        Ok(vehicle::list_by_owner(self.db.pool(), owner_id).await?)
    }

    pub async fn my_advertisements(&self, owner_id: i64) -> Result<Vec<Advertisement>> {
        Ok(advertisement::list_by_owner(self.db.pool(), owner_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_market() -> Marketplace {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        Marketplace::new(db)
    }

    fn joao() -> Registration {
        Registration::new(Role::Advertiser, "12345678900", "João Silva", "joao@email.com", "senha123")
            .with_phone("119999")
    }

    #[test]
    fn test_registration_validation() {
        assert!(joao().validate().is_ok());

        let no_phone = Registration::new(Role::Advertiser, "12345678900", "João", "joao@email.com", "senha123");
        assert_eq!(no_phone.validate(), Err(ValidationError::Empty("phone".to_string())));

        let client = Registration::new(Role::Client, "22222222222", "Ana", "ana@email.com", "senha000");
        assert!(client.validate().is_ok());

        let short = Registration::new(Role::Client, "22222222222", "Ana", "ana@email.com", "12345");
        assert!(matches!(short.validate(), Err(ValidationError::PasswordTooShort { .. })));

        let blank_name = Registration::new(Role::Client, "22222222222", "  ", "ana@email.com", "senha000");
        assert!(matches!(blank_name.validate(), Err(ValidationError::Empty(_))));
    }

    #[tokio::test]
    async fn test_register_assigns_admin_ids() {
        let market = test_market().await;
        let first = market
            .register(Registration::new(Role::Admin, "00000000000", "Admin", "admin@admin.com", "admin123"))
            .await
            .unwrap();
        let second = market
            .register(Registration::new(Role::Admin, "99999999999", "Root", "root@admin.com", "root1234"))
            .await
            .unwrap();

        match (first, second) {
            (User::Admin(a), User::Admin(b)) => {
                assert_eq!(a.admin_id, 1);
                assert_eq!(b.admin_id, 2);
            }
            _ => panic!("expected two admins"),
        }
    }

    #[tokio::test]
    async fn test_login_and_logout_persist_flag() {
        let market = test_market().await;
        let seller = market.register(joao()).await.unwrap();

        assert!(market.login("joao@email.com", "wrong!").await.unwrap().is_none());
        assert!(market.login("nobody@email.com", "senha123").await.unwrap().is_none());

        let logged = market.login("joao@email.com", "senha123").await.unwrap().unwrap();
        assert!(logged.account().is_logged_in());
        let stored = market.load_user(seller.id()).await.unwrap();
        assert!(stored.account().is_logged_in());

        market.logout(seller.id()).await.unwrap();
        let stored = market.load_user(seller.id()).await.unwrap();
        assert!(!stored.account().is_logged_in());
    }

    #[tokio::test]
    async fn test_vehicle_owner_must_be_advertiser() {
        let market = test_market().await;
        let ana = market
            .register(Registration::new(Role::Client, "22222222222", "Ana", "ana@email.com", "senha000"))
            .await
            .unwrap();

        let decision = market
            .create_vehicle(NewVehicle::new("Toyota", "Corolla", 2020, 85000.0, 50000).owned_by(ana.id()))
            .await
            .unwrap();
        assert_eq!(decision.denial(), Some(&Denial::NotAdvertiser { user_id: ana.id() }));

        let unowned = market
            .create_vehicle(NewVehicle::new("Fiat", "Palio", 2015, 28000.0, 70000))
            .await
            .unwrap()
            .allowed()
            .unwrap();
        assert_eq!(unowned.advertiser_id, None);

        let result = market
            .create_vehicle(NewVehicle::new("Fiat", "Palio", 2015, -1.0, 70000))
            .await;
        assert!(matches!(result, Err(MarketplaceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_edit_advertisement_owner_only() {
        let market = test_market().await;
        let seller = market.register(joao()).await.unwrap();
        let other = market
            .register(
                Registration::new(Role::Advertiser, "98765432100", "Maria", "maria@email.com", "senha456")
                    .with_phone("219999"),
            )
            .await
            .unwrap();
        let car = market
            .create_vehicle(NewVehicle::new("Toyota", "Corolla", 2020, 85000.0, 50000).owned_by(seller.id()))
            .await
            .unwrap()
            .allowed()
            .unwrap();
        let ad = market
            .create_advertisement(seller.id(), car.id)
            .await
            .unwrap()
            .allowed()
            .unwrap();

        let denied = market
            .edit_advertisement(other.id(), ad.id, &[("data_publicacao", "2026-01-01")])
            .await
            .unwrap();
        assert!(denied.is_denied());

        let edited = market
            .edit_advertisement(seller.id(), ad.id, &[("data_publicacao", "2026-01-01"), ("veiculo_id", "9")])
            .await
            .unwrap()
            .allowed()
            .unwrap();
        assert_eq!(edited.publication_date, "2026-01-01");
        let stored = market.load_advertisement(ad.id).await.unwrap();
        assert_eq!(stored.publication_date, "2026-01-01");
        assert_eq!(stored.vehicle.id, car.id);
    }
}
