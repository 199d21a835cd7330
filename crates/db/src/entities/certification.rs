//! Certification entity (BLS, ACLS, PALS, ...).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::license::CredentialStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "certifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// `nurse_profiles.id`
    pub nurse_id: String,

    pub certification_name: String,

    pub issuing_organization: String,

    #[sea_orm(nullable)]
    pub certification_number: Option<String>,

    #[sea_orm(nullable)]
    pub issue_date: Option<Date>,

    pub expiry_date: Date,

    pub status: CredentialStatus,

    #[sea_orm(default_value = false)]
    pub is_verified: bool,

    #[sea_orm(nullable)]
    pub document_url: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::nurse_profile::Entity",
        from = "Column::NurseId",
        to = "super::nurse_profile::Column::Id",
        on_delete = "Cascade"
    )]
    NurseProfile,
}

impl Related<super::nurse_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NurseProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
