//! Vehicles offered in the catalog.

use serde::{Deserialize, Serialize};

/// A vehicle, optionally owned by an advertiser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Store-assigned identifier (`0` until saved).
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: i32,
    /// Owning advertiser; cleared when the advertiser is deleted.
    pub advertiser_id: Option<i64>,
}

impl Vehicle {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        price: f64,
        mileage: i32,
    ) -> Self {
        Self {
            id: 0,
            brand: brand.into(),
            model: model.into(),
            year,
            price,
            mileage,
            advertiser_id: None,
        }
    }

    pub fn owned_by(mut self, advertiser_id: i64) -> Self {
        self.advertiser_id = Some(advertiser_id);
        self
    }

    pub fn is_owned_by(&self, advertiser_id: i64) -> bool {
        self.advertiser_id == Some(advertiser_id)
    }

    /// Case-insensitive substring match against brand or model.
    pub fn matches(&self, filter: &str) -> bool {
        let filter = filter.to_lowercase();
        self.brand.to_lowercase().contains(&filter) || self.model.to_lowercase().contains(&filter)
    }

    /// Multi-line description used by listings.
    pub fn describe(&self) -> String {
        let owner = self
            .advertiser_id
            .map(|id| format!("#{}", id))
            .unwrap_or_else(|| "none".to_string());
        format!(
            "ID: {}\nBrand: {}\nModel: {}\nYear: {}\nPrice: R${:.2}\nMileage: {} km\nAdvertiser: {}",
            self.id, self.brand, self.model, self.year, self.price, self.mileage, owner
        )
    }
}
