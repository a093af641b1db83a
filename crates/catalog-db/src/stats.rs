//! Catalog statistics.

use std::fmt;

use serde::Serialize;
use sqlx::SqlitePool;

use catalog_core::{AdStatus, Role};

use crate::{advertisement, user, vehicle, Result};

/// Row counts per role and per advertisement status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub admins: i64,
    pub advertisers: i64,
    pub clients: i64,
    pub vehicles: i64,
    pub approved_ads: i64,
    pub pending_ads: i64,
    pub rejected_ads: i64,
}

/// Collect the current counts.
pub async fn collect(pool: &SqlitePool) -> Result<CatalogStats> {
    let mut stats = CatalogStats {
        vehicles: vehicle::count(pool).await?,
        ..CatalogStats::default()
    };

    for (role, count) in user::count_by_role(pool).await? {
        match role {
            Role::Admin => stats.admins = count,
            Role::Advertiser => stats.advertisers = count,
            Role::Client => stats.clients = count,
        }
    }

    for (status, count) in advertisement::count_by_status(pool).await? {
        match status {
            AdStatus::Approved => stats.approved_ads = count,
            AdStatus::Pending => stats.pending_ads = count,
            AdStatus::Rejected => stats.rejected_ads = count,
        }
    }

    Ok(stats)
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Administrators:  {}", self.admins)?;
        writeln!(f, "Advertisers:     {}", self.advertisers)?;
        writeln!(f, "Clients:         {}", self.clients)?;
        writeln!(f, "Vehicles:        {}", self.vehicles)?;
        writeln!(f, "Approved ads:    {}", self.approved_ads)?;
        writeln!(f, "Pending ads:     {}", self.pending_ads)?;
        write!(f, "Rejected ads:    {}", self.rejected_ads)
    }
}
