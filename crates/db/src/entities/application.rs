//! Shift application entity.

use std::{fmt, str::FromStr};

use nurseshift_common::AppError;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Application lifecycle status.
///
/// `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "withdrawn")]
    Withdrawn,
}

impl ApplicationStatus {
    /// Wire/database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Whether the state machine has an edge from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved | Self::Rejected | Self::Withdrawn)
        )
    }

    /// Statuses that block a nurse from applying to the same shift again.
    #[must_use]
    pub const fn blocking() -> [Self; 2] {
        [Self::Pending, Self::Approved]
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "withdrawn" => Ok(Self::Withdrawn),
            other => Err(AppError::Validation(format!("Invalid application status: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub shift_id: String,

    /// `nurse_profiles.id`
    pub nurse_id: String,

    pub status: ApplicationStatus,

    #[sea_orm(column_type = "Text", nullable)]
    pub special_notes: Option<String>,

    #[sea_orm(default_value = false)]
    pub availability_confirmed: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shift::Entity",
        from = "Column::ShiftId",
        to = "super::shift::Column::Id",
        on_delete = "Cascade"
    )]
    Shift,

    #[sea_orm(
        belongs_to = "super::nurse_profile::Entity",
        from = "Column::NurseId",
        to = "super::nurse_profile::Column::Id",
        on_delete = "Cascade"
    )]
    NurseProfile,
}

impl Related<super::shift::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shift.def()
    }
}

impl Related<super::nurse_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NurseProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_moves_to_every_terminal_state() {
        use ApplicationStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Pending.can_transition_to(Withdrawn));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        use ApplicationStatus::*;
        for from in [Approved, Rejected, Withdrawn] {
            for to in [Pending, Approved, Rejected, Withdrawn] {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be rejected");
            }
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!("cancelled".parse::<ApplicationStatus>().is_err());
        assert_eq!(
            "withdrawn".parse::<ApplicationStatus>().ok(),
            Some(ApplicationStatus::Withdrawn)
        );
    }
}
