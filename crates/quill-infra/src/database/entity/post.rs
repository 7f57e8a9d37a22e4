//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{FromQueryResult, NotSet, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    #[sea_orm(indexed)]
    pub ip: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::rating::Entity")]
    Ratings,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl crate::database::DomainEntity for Entity {
    type Domain = quill_core::domain::Post;
    type New = quill_core::domain::NewPost;
}

/// Projection used by the top-posts ranking.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct RankedRow {
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// One distinct `(ip, login)` pair of the shared-address report.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct IpLoginRow {
    pub ip: String,
    pub login: String,
}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for quill_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            body: model.body,
            ip: model.ip,
            created_at: model.created_at.into(),
        }
    }
}

/// Conversion from an unsaved Domain Post to SeaORM ActiveModel.
impl From<quill_core::domain::NewPost> for ActiveModel {
    fn from(post: quill_core::domain::NewPost) -> Self {
        Self {
            id: NotSet,
            user_id: Set(post.user_id),
            title: Set(post.title),
            body: Set(post.body),
            ip: Set(post.ip),
            created_at: Set(post.created_at.into()),
        }
    }
}

impl From<RankedRow> for quill_core::domain::TopPost {
    fn from(row: RankedRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            body: row.body,
        }
    }
}
