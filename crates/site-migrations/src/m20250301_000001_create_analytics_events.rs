//! Migration: Create analytics_events table
//!
//! One row per behavioral event, with secondary indexes on category and
//! timestamp for the scans the aggregation queries perform, plus one on
//! session_id for journey lookups.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AnalyticsEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AnalyticsEvents::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AnalyticsEvents::Category)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AnalyticsEvents::Path).string())
                    .col(ColumnDef::new(AnalyticsEvents::Referrer).string())
                    .col(ColumnDef::new(AnalyticsEvents::UserAgent).string())
                    .col(ColumnDef::new(AnalyticsEvents::IpAddress).string())
                    .col(ColumnDef::new(AnalyticsEvents::SessionId).string())
                    .col(ColumnDef::new(AnalyticsEvents::Metadata).text())
                    .col(
                        ColumnDef::new(AnalyticsEvents::Timestamp)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_analytics_events_category")
                    .table(AnalyticsEvents::Table)
                    .col(AnalyticsEvents::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_analytics_events_timestamp")
                    .table(AnalyticsEvents::Table)
                    .col(AnalyticsEvents::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_analytics_events_session_id")
                    .table(AnalyticsEvents::Table)
                    .col(AnalyticsEvents::SessionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AnalyticsEvents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AnalyticsEvents {
    Table,
    Id,
    Category,
    Path,
    Referrer,
    UserAgent,
    IpAddress,
    SessionId,
    Metadata,
    Timestamp,
}
