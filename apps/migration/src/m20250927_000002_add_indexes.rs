use sea_orm_migration::prelude::*;

use crate::m20250927_000001_create_tables::{Posts, Ratings};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One rating per (user, post); concurrent duplicates are rejected here.
        manager
            .create_index(
                Index::create()
                    .name("idx_ratings_user_id_post_id")
                    .table(Ratings::Table)
                    .col(Ratings::UserId)
                    .col(Ratings::PostId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ratings_post_id")
                    .table(Ratings::Table)
                    .col(Ratings::PostId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_ip")
                    .table(Posts::Table)
                    .col(Posts::Ip)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in ["idx_posts_ip", "idx_ratings_post_id", "idx_ratings_user_id_post_id"] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}
