//! A registered user of any role.

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::admin::Admin;
use crate::advertiser::Advertiser;
use crate::capability::{AdCreator, Approver, Searcher, UserManager};
use crate::client::Client;
use crate::error::ValidationError;
use crate::role::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum User {
    Admin(Admin),
    Advertiser(Advertiser),
    Client(Client),
}

impl User {
    pub fn account(&self) -> &Account {
        match self {
            User::Admin(a) => &a.account,
            User::Advertiser(a) => &a.account,
            User::Client(c) => &c.account,
        }
    }

    pub fn account_mut(&mut self) -> &mut Account {
        match self {
            User::Admin(a) => &mut a.account,
            User::Advertiser(a) => &mut a.account,
            User::Client(c) => &mut c.account,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            User::Admin(_) => Role::Admin,
            User::Advertiser(_) => Role::Advertiser,
            User::Client(_) => Role::Client,
        }
    }

    pub fn id(&self) -> i64 {
        self.account().id()
    }

    pub fn name(&self) -> &str {
        self.account().name()
    }

    pub fn email(&self) -> &str {
        self.account().email()
    }

    pub fn login(&mut self, email: &str, password: &str) -> bool {
        self.account_mut().login(email, password)
    }

    pub fn logout(&mut self) {
        self.account_mut().logout()
    }

    /// See [`Account::update_info`].
    pub fn update_info<I, K, V>(&mut self, fields: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.account_mut().update_info(fields)
    }

    /// Role-specific profile text.
    pub fn exhibit_profile(&self) -> String {
        match self {
            User::Admin(a) => a.exhibit_profile(),
            User::Advertiser(a) => a.exhibit_profile(),
            User::Client(c) => c.exhibit_profile(),
        }
    }

    pub fn as_approver(&self) -> Option<&dyn Approver> {
        match self {
            User::Admin(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_user_manager(&self) -> Option<&dyn UserManager> {
        match self {
            User::Admin(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_ad_creator(&self) -> Option<&dyn AdCreator> {
        match self {
            User::Advertiser(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_ad_creator_mut(&mut self) -> Option<&mut dyn AdCreator> {
        match self {
            User::Advertiser(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_searcher(&self) -> Option<&dyn Searcher> {
        match self {
            User::Client(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_searcher_mut(&mut self) -> Option<&mut dyn Searcher> {
        match self {
            User::Client(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Admin> for User {
    fn from(admin: Admin) -> Self {
        User::Admin(admin)
    }
}

impl From<Advertiser> for User {
    fn from(advertiser: Advertiser) -> Self {
        User::Advertiser(advertiser)
    }
}

impl From<Client> for User {
    fn from(client: Client) -> Self {
        User::Client(client)
    }
}
