//! Nurse profile entity (role-specific extension of a nurse's user account).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::shift::ShiftType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "nurse_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// 1:1 with `users.id`.
    #[sea_orm(unique)]
    pub user_id: String,

    pub specialty: String,

    pub years_experience: i32,

    /// NULL = no preference
    #[sea_orm(nullable)]
    pub preferred_shift_type: Option<ShiftType>,

    /// Miles
    pub preferred_distance: i32,

    pub min_hourly_rate: f64,

    pub max_hourly_rate: f64,

    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "super::license::Entity")]
    Licenses,

    #[sea_orm(has_many = "super::certification::Entity")]
    Certifications,

    #[sea_orm(has_many = "super::application::Entity")]
    Applications,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::license::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Licenses.def()
    }
}

impl Related<super::certification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Certifications.def()
    }
}

impl Related<super::application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
