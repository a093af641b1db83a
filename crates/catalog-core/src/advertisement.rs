//! Advertisements and their approval lifecycle.
//!
//! ```text
//! Pending --approve--> Approved
//! Pending --reject---> Rejected
//! ```
//!
//! Approved and Rejected are terminal: nothing moves an advertisement back
//! to Pending. A direct status write through [`Advertisement::set_status`]
//! skips actor checks (callers enforce those) but not this rule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result, ValidationError};
use crate::vehicle::Vehicle;

/// Date format used for `publication_date`.
pub const PUBLICATION_DATE_FORMAT: &str = "%Y-%m-%d";

/// Approval status of an advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdStatus {
    Pending,
    Approved,
    Rejected,
}

impl AdStatus {
    pub const ALL: [AdStatus; 3] = [AdStatus::Pending, AdStatus::Approved, AdStatus::Rejected];

    /// Value stored in the `anuncios.status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdStatus::Pending => "Pendente",
            AdStatus::Approved => "Aprovado",
            AdStatus::Rejected => "Rejeitado",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AdStatus::Pending)
    }
}

impl fmt::Display for AdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendente" | "pending" => Ok(AdStatus::Pending),
            "aprovado" | "approved" => Ok(AdStatus::Approved),
            "rejeitado" | "rejected" => Ok(AdStatus::Rejected),
            other => Err(ValidationError::Invalid {
                field: "status".to_string(),
                reason: format!("unknown status '{}'", other),
            }),
        }
    }
}

/// Today's date in [`PUBLICATION_DATE_FORMAT`].
pub fn today() -> String {
    chrono::Local::now().format(PUBLICATION_DATE_FORMAT).to_string()
}

/// A listing wrapping exactly one vehicle, owned by exactly one advertiser.
///
/// The advertiser is kept as an identifier only, so loading an advertisement
/// never pulls its owner (and the owner's advertisements) back in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advertisement {
    /// Store-assigned identifier.
    pub id: i64,
    pub publication_date: String,
    status: AdStatus,
    pub vehicle: Vehicle,
    pub advertiser_id: i64,
}

impl Advertisement {
    /// A new pending advertisement.
    pub fn new(id: i64, vehicle: Vehicle, advertiser_id: i64, publication_date: String) -> Self {
        Self {
            id,
            publication_date,
            status: AdStatus::Pending,
            vehicle,
            advertiser_id,
        }
    }

    /// Rebuild an advertisement from stored values.
    pub fn restore(
        id: i64,
        publication_date: String,
        status: AdStatus,
        vehicle: Vehicle,
        advertiser_id: i64,
    ) -> Self {
        Self {
            id,
            publication_date,
            status,
            vehicle,
            advertiser_id,
        }
    }

    pub fn status(&self) -> AdStatus {
        self.status
    }

    pub fn approve(&mut self) -> Result<()> {
        self.transition(AdStatus::Approved)
    }

    pub fn reject(&mut self) -> Result<()> {
        self.transition(AdStatus::Rejected)
    }

    fn transition(&mut self, to: AdStatus) -> Result<()> {
        if self.status != AdStatus::Pending {
            return Err(CatalogError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Overwrite the status directly, bypassing approve/reject.
    ///
    /// Resubmission (a terminal status back to Pending) is refused.
    pub fn set_status(&mut self, status: AdStatus) -> Result<()> {
        if self.status.is_terminal() && status == AdStatus::Pending {
            return Err(CatalogError::InvalidTransition {
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        Ok(())
    }

    /// Apply an owner edit. Recognized fields are `status` and
    /// `publication_date` (`data_publicacao`); anything else is skipped.
    pub fn apply_edit<K, V>(&mut self, fields: &[(K, V)]) -> Result<()>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in fields {
            match key.as_ref() {
                "status" => self.set_status(value.as_ref().parse()?)?,
                "publication_date" | "data_publicacao" => {
                    let value = value.as_ref().trim();
                    if value.is_empty() {
                        return Err(ValidationError::Empty("publication_date".to_string()).into());
                    }
                    self.publication_date = value.to_string();
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Multi-line summary used by listings.
    pub fn summary(&self) -> String {
        format!(
            "=== Advertisement ===\nID: {}\nDate: {}\nStatus: {}\nVehicle: {} {} ({})\nAdvertiser: #{}\n",
            self.id,
            self.publication_date,
            self.status,
            self.vehicle.brand,
            self.vehicle.model,
            self.vehicle.year,
            self.advertiser_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> Advertisement {
        let vehicle = Vehicle::new("Toyota", "Corolla", 2020, 85000.0, 50000).owned_by(1);
        Advertisement::new(1, vehicle, 1, "2026-01-15".to_string())
    }

    #[test]
    fn test_new_advertisement_is_pending() {
        assert_eq!(pending().status(), AdStatus::Pending);
    }

    #[test]
    fn test_approve_and_reject_are_terminal() {
        let mut ad = pending();
        ad.approve().unwrap();
        assert_eq!(ad.status(), AdStatus::Approved);
        assert!(matches!(
            ad.reject(),
            Err(CatalogError::InvalidTransition {
                from: AdStatus::Approved,
                to: AdStatus::Rejected
            })
        ));

        let mut ad = pending();
        ad.reject().unwrap();
        assert!(ad.approve().is_err());
        assert_eq!(ad.status(), AdStatus::Rejected);
    }

    #[test]
    fn test_direct_status_write_refuses_resubmission() {
        let mut ad = pending();
        ad.set_status(AdStatus::Rejected).unwrap();
        assert!(ad.set_status(AdStatus::Pending).is_err());
        ad.set_status(AdStatus::Approved).unwrap();
        assert_eq!(ad.status(), AdStatus::Approved);
    }

    #[test]
    fn test_apply_edit_skips_unknown_fields() {
        let mut ad = pending();
        ad.apply_edit(&[("color", "red"), ("data_publicacao", "2026-02-01")])
            .unwrap();
        assert_eq!(ad.publication_date, "2026-02-01");

        assert!(ad.apply_edit(&[("status", "sold")]).is_err());
        assert_eq!(ad.status(), AdStatus::Pending);
    }

    #[test]
    fn test_status_parses_stored_and_english_names() {
        for status in AdStatus::ALL {
            assert_eq!(status.as_str().parse::<AdStatus>().unwrap(), status);
        }
        assert_eq!("approved".parse::<AdStatus>().unwrap(), AdStatus::Approved);
    }

    #[test]
    fn test_today_uses_iso_date() {
        let date = today();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
    }
}
