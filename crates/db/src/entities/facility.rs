//! Facility entity.
//!
//! Facilities authenticate on their own, parallel to users.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "facilities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// Login email, always stored lowercase.
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub address: String,

    pub city: String,

    pub state: String,

    pub zip_code: String,

    pub phone: String,

    #[sea_orm(nullable)]
    pub contact_name: Option<String>,

    /// e.g. hospital, clinic, nursing home
    #[sea_orm(nullable)]
    pub facility_type: Option<String>,

    /// Average rating given by nurses (0-5)
    #[sea_orm(nullable)]
    pub rating: Option<f64>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::shift::Entity")]
    Shifts,
}

impl Related<super::shift::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shifts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
