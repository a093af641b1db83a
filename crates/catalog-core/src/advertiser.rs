//! Advertiser role.

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::advertisement::{today, Advertisement};
use crate::capability::AdCreator;
use crate::error::ValidationError;
use crate::vehicle::Vehicle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advertiser {
    pub account: Account,
    phone: String,
    ads: Vec<Advertisement>,
}

impl Advertiser {
    pub fn new(account: Account, phone: impl Into<String>) -> Self {
        Self {
            account,
            phone: phone.into(),
            ads: Vec::new(),
        }
    }

    /// Attach the advertisements loaded from storage.
    pub fn with_ads(mut self, ads: Vec<Advertisement>) -> Self {
        self.ads = ads;
        self
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Change the phone number. Blank numbers are rejected and leave it unchanged.
    pub fn set_phone(&mut self, phone: impl Into<String>) -> Result<(), ValidationError> {
        let phone = phone.into();
        if phone.trim().is_empty() {
            return Err(ValidationError::Empty("phone".to_string()));
        }
        self.phone = phone;
        Ok(())
    }

    pub fn exhibit_profile(&self) -> String {
        format!(
            "Advertiser: {}\nEmail: {}\nPhone: {}\nTotal advertisements: {}",
            self.account.name(),
            self.account.email(),
            self.phone,
            self.ads.len()
        )
    }

    fn find_ad_mut(&mut self, id: i64) -> Option<&mut Advertisement> {
        self.ads.iter_mut().find(|ad| ad.id == id)
    }
}

impl AdCreator for Advertiser {
    fn create_ad(&mut self, vehicle: Vehicle) -> Advertisement {
        // Provisional id, replaced by the store-assigned one once saved.
        let id = self.ads.iter().map(|ad| ad.id).max().unwrap_or(0) + 1;
        let ad = Advertisement::new(id, vehicle, self.account.id(), today());
        self.ads.push(ad.clone());
        ad
    }

    fn edit_ad(&mut self, id: i64, fields: &[(&str, &str)]) -> bool {
        match self.find_ad_mut(id) {
            Some(ad) => ad.apply_edit(fields).is_ok(),
            None => false,
        }
    }

    fn delete_ad(&mut self, id: i64) -> bool {
        match self.ads.iter().position(|ad| ad.id == id) {
            Some(pos) => {
                self.ads.remove(pos);
                true
            }
            None => false,
        }
    }

    fn list_my_ads(&self) -> &[Advertisement] {
        &self.ads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advertisement::AdStatus;

    fn advertiser() -> Advertiser {
        Advertiser::new(
            Account::new(2, "12345678900", "João", "joao@email.com", "senha123"),
            "119999",
        )
    }

    #[test]
    fn test_create_ad_starts_pending_and_is_listed() {
        let mut adv = advertiser();
        let vehicle = Vehicle::new("Toyota", "Corolla", 2020, 85000.0, 50000).owned_by(2);

        let ad = adv.create_ad(vehicle);
        assert_eq!(ad.status(), AdStatus::Pending);
        assert_eq!(ad.advertiser_id, 2);
        assert_eq!(ad.publication_date, today());
        assert_eq!(adv.list_my_ads().len(), 1);

        let second = adv.create_ad(Vehicle::new("Honda", "Civic", 2019, 75000.0, 40000));
        assert_eq!(second.id, ad.id + 1);
    }

    #[test]
    fn test_edit_and_delete_only_own_ads() {
        let mut adv = advertiser();
        let ad = adv.create_ad(Vehicle::new("Ford", "Ka", 2018, 35000.0, 45000));

        assert!(adv.edit_ad(ad.id, &[("status", "Aprovado")]));
        assert_eq!(adv.list_my_ads()[0].status(), AdStatus::Approved);
        assert!(!adv.edit_ad(ad.id, &[("status", "Pendente")]));
        assert!(!adv.edit_ad(99, &[("status", "Aprovado")]));

        assert!(!adv.delete_ad(99));
        assert!(adv.delete_ad(ad.id));
        assert!(adv.list_my_ads().is_empty());
    }

    #[test]
    fn test_blank_phone_is_rejected() {
        let mut adv = advertiser();
        assert!(matches!(adv.set_phone("  "), Err(ValidationError::Empty(_))));
        assert_eq!(adv.phone(), "119999");
        adv.set_phone("(11) 98765-4321").unwrap();
        assert_eq!(adv.phone(), "(11) 98765-4321");
    }
}
