use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 短码即主键，唯一性由数据库保证
        manager
            .create_table(
                Table::create()
                    .table(UrlRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UrlRecord::Code)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UrlRecord::Url).text().not_null())
                    .col(
                        ColumnDef::new(UrlRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UrlRecord::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(UrlRecord::LastAccessed)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(UrlRecord::Clicks)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // load_all 按创建时间排序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_url_records_created_at")
                    .table(UrlRecord::Table)
                    .col(UrlRecord::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_url_records_created_at")
                    .table(UrlRecord::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UrlRecord::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UrlRecord {
    #[sea_orm(iden = "url_records")]
    Table,
    Code,
    Url,
    CreatedAt,
    UpdatedAt,
    LastAccessed,
    Clicks,
}
