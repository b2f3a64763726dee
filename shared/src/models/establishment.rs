//! Establishment Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Organization entity (owner of one or more establishments)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}

/// Create organization payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrganizationCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

/// Establishment entity (restaurant, bar, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Establishment {
    pub id: i64,
    pub organization_id: i64,
    pub name: String,
    /// Public URL identifier used by the booking flow
    pub slug: String,
    /// IANA timezone name, informational
    pub timezone: String,
    pub booking_enabled: bool,
    pub created_at: i64,
}

/// Create establishment payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EstablishmentCreate {
    pub organization_id: i64,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub slug: String,
    pub timezone: Option<String>,
    pub booking_enabled: Option<bool>,
}

/// Update establishment payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstablishmentUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub timezone: Option<String>,
    pub booking_enabled: Option<bool>,
}
