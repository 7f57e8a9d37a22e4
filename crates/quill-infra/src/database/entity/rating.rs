//! Rating entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{FromQueryResult, NotSet, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ratings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub value: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl crate::database::DomainEntity for Entity {
    type Domain = quill_core::domain::Rating;
    type New = quill_core::domain::NewRating;
}

/// `COUNT(id)` and `SUM(value)` over a post's ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromQueryResult)]
pub struct TotalsRow {
    pub count: i64,
    pub sum: Option<i64>,
}

impl From<TotalsRow> for quill_core::domain::RatingTotals {
    fn from(row: TotalsRow) -> Self {
        Self {
            count: row.count,
            sum: row.sum.unwrap_or(0),
        }
    }
}

/// Conversion from SeaORM Model to Domain Rating.
impl From<Model> for quill_core::domain::Rating {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            user_id: model.user_id,
            value: model.value,
            created_at: model.created_at.into(),
        }
    }
}

/// Conversion from an unsaved Domain Rating to SeaORM ActiveModel.
impl From<quill_core::domain::NewRating> for ActiveModel {
    fn from(rating: quill_core::domain::NewRating) -> Self {
        Self {
            id: NotSet,
            post_id: Set(rating.post_id),
            user_id: Set(rating.user_id),
            value: Set(rating.value),
            created_at: Set(rating.created_at.into()),
        }
    }
}
