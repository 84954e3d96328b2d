use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 links 表
        manager
            .create_table(
                Table::create()
                    .table(Link::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Link::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Link::OwnerId).string_len(36).not_null())
                    .col(ColumnDef::new(Link::Namespace).string_len(300).not_null())
                    .col(ColumnDef::new(Link::OriginalUrl).text().not_null())
                    .col(ColumnDef::new(Link::ShortCode).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Link::VisitCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Link::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Link::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一命名空间内短码唯一，分配器的预检查只是快速失败
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_links_namespace_code")
                    .table(Link::Table)
                    .col(Link::Namespace)
                    .col(Link::ShortCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 公共跳转按短码全局查找
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_code_created")
                    .table(Link::Table)
                    .col(Link::ShortCode)
                    .col(Link::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 所有者列表 / 去重查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_owner_created")
                    .table(Link::Table)
                    .col(Link::OwnerId)
                    .col(Link::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 统计查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_namespace_created")
                    .table(Link::Table)
                    .col(Link::Namespace)
                    .col(Link::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_links_namespace_created",
            "idx_links_owner_created",
            "idx_links_code_created",
            "uq_links_namespace_code",
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Link::Table).to_owned())
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Link::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Link {
    #[sea_orm(iden = "links")]
    Table,
    Id,
    OwnerId,
    Namespace,
    OriginalUrl,
    ShortCode,
    VisitCount,
    CreatedAt,
    UpdatedAt,
}
