//! Client role.

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::capability::Searcher;
use crate::vehicle::Vehicle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub account: Account,
    history: Vec<String>,
}

impl Client {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            history: Vec::new(),
        }
    }

    /// Attach the search history loaded from storage, oldest first.
    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.history = history;
        self
    }

    pub fn exhibit_profile(&self) -> String {
        let history = if self.history.is_empty() {
            "no searches yet".to_string()
        } else {
            self.history.join(", ")
        };
        format!(
            "Client ID: {}\nName: {}\nEmail: {}\nSearch history: {}\n",
            self.account.id(),
            self.account.name(),
            self.account.email(),
            history
        )
    }
}

impl Searcher for Client {
    fn search_vehicles(&mut self, filter: &str, candidates: &[Vehicle]) -> Vec<Vehicle> {
        self.history.push(filter.to_string());
        candidates
            .iter()
            .filter(|v| v.matches(filter))
            .cloned()
            .collect()
    }

    fn view_details<'a>(&self, vehicle_id: i64, candidates: &'a [Vehicle]) -> Option<&'a Vehicle> {
        candidates.iter().find(|v| v.id == vehicle_id)
    }

    fn search_history(&self) -> &[String] {
        &self.history
    }
}
