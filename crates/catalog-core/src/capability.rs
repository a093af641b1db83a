//! Capability interfaces implemented by the role records.
//!
//! Callers probe a [`User`] for a capability (`as_approver`,
//! `as_ad_creator_mut`, ...) instead of branching on its role.

use crate::advertisement::Advertisement;
use crate::error::Result;
use crate::user::User;
use crate::vehicle::Vehicle;

/// Decides on pending advertisements.
pub trait Approver: Send + Sync {
    fn approve_ad(&self, ad: &mut Advertisement) -> Result<()>;

    fn reject_ad(&self, ad: &mut Advertisement) -> Result<()>;
}

/// An operation on a caller-provided user registry.
#[derive(Debug, Clone)]
pub enum UserAction {
    /// Append a new user.
    Create(User),
    /// Render the profile of the user with this id.
    Read(i64),
    /// Apply `update_info` to the user with this id.
    Update { id: i64, fields: Vec<(String, String)> },
    /// Remove the user with this id.
    Delete(i64),
}

/// Manages user records held in a registry.
pub trait UserManager: Send + Sync {
    /// Run `action` against `registry`, returning a message describing the result.
    ///
    /// Users are matched by id. Acting on a missing user yields `NotFound`.
    fn manage_user(&self, action: UserAction, registry: &mut Vec<User>) -> Result<String>;
}

/// Owns vehicles and publishes advertisements for them.
pub trait AdCreator: Send + Sync {
    /// Wrap `vehicle` in a new pending advertisement dated today and add it
    /// to this advertiser's list.
    fn create_ad(&mut self, vehicle: Vehicle) -> Advertisement;

    /// Edit one of this advertiser's advertisements. Returns `false` when the
    /// advertisement is not in the list or the edit is rejected.
    fn edit_ad(&mut self, id: i64, fields: &[(&str, &str)]) -> bool;

    /// Remove one of this advertiser's advertisements. Returns `false` when absent.
    fn delete_ad(&mut self, id: i64) -> bool;

    fn list_my_ads(&self) -> &[Advertisement];
}

/// Searches the catalog and keeps a search history.
pub trait Searcher: Send + Sync {
    /// Case-insensitive substring match on brand or model.
    ///
    /// Every call is recorded in the history, including calls with no match.
    fn search_vehicles(&mut self, filter: &str, candidates: &[Vehicle]) -> Vec<Vehicle>;

    fn view_details<'a>(&self, vehicle_id: i64, candidates: &'a [Vehicle]) -> Option<&'a Vehicle>;

    /// Past filters, oldest first.
    fn search_history(&self) -> &[String];
}
