//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, Order, SimpleExpr};
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    QueryTrait, RelationTrait,
};

use quill_core::domain::{RatingTotals, SharedIp, TopPost, User};
use quill_core::error::RepoError;
use quill_core::ports::{PostRepository, RatingRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity, IpLoginRow, RankedRow};
use super::entity::rating::{self, Entity as RatingEntity, TotalsRow};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

const MAX_LIMIT: u64 = i64::MAX as u64;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL rating repository.
pub type PostgresRatingRepository = PostgresBaseRepository<RatingEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(login, "Finding user by login");

        let result = UserEntity::find()
            .filter(user::Column::Login.eq(login))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn top_rated(&self, limit: u64) -> Result<Vec<TopPost>, RepoError> {
        // INNER JOIN: posts without ratings have no mean and are left out.
        let rows = PostEntity::find()
            .select_only()
            .columns([post::Column::Id, post::Column::Title, post::Column::Body])
            .join(JoinType::InnerJoin, post::Relation::Ratings.def())
            .group_by(post::Column::Id)
            .order_by(
                SimpleExpr::from(Func::avg(Expr::col((RatingEntity, rating::Column::Value)))),
                Order::Desc,
            )
            .order_by_asc(post::Column::Id)
            // Postgres binds LIMIT as a signed BIGINT.
            .limit(limit.min(MAX_LIMIT))
            .into_model::<RankedRow>()
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn shared_ips(&self) -> Result<Vec<SharedIp>, RepoError> {
        let shared = PostEntity::find()
            .select_only()
            .column(post::Column::Ip)
            .filter(post::Column::Ip.is_not_null())
            .group_by(post::Column::Ip)
            .having(
                Expr::expr(Expr::col((PostEntity, post::Column::UserId)).count_distinct()).gt(1),
            )
            .into_query();

        let rows = PostEntity::find()
            .select_only()
            .distinct()
            .column(post::Column::Ip)
            .column_as(user::Column::Login, "login")
            .join(JoinType::InnerJoin, post::Relation::User.def())
            .filter(post::Column::Ip.in_subquery(shared))
            .order_by_asc(post::Column::Ip)
            .order_by_asc(user::Column::Login)
            .into_model::<IpLoginRow>()
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        // Rows arrive sorted by ip, then login.
        Ok(SharedIp::group_sorted(rows.into_iter().map(|row| (row.ip, row.login))))
    }
}

#[async_trait]
impl RatingRepository for PostgresRatingRepository {
    async fn exists_for(&self, user_id: i64, post_id: i64) -> Result<bool, RepoError> {
        let count = RatingEntity::find()
            .filter(rating::Column::UserId.eq(user_id))
            .filter(rating::Column::PostId.eq(post_id))
            .count(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn totals_for_post(&self, post_id: i64) -> Result<RatingTotals, RepoError> {
        let totals = RatingEntity::find()
            .select_only()
            .column_as(rating::Column::Id.count(), "count")
            .column_as(rating::Column::Value.sum(), "sum")
            .filter(rating::Column::PostId.eq(post_id))
            .into_model::<TotalsRow>()
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(totals.map(Into::into).unwrap_or_default())
    }
}
