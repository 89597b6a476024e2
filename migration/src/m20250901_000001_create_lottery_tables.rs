use sea_orm_migration::prelude::*;

/// Prize plans (named prize configurations shared by draws)
#[derive(DeriveIden)]
enum Plans {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

/// Prize tiers of a plan
#[derive(DeriveIden)]
enum Prizes {
    Table,
    Id,
    PlanId,
    Title,
    DisplayValue,
    BallCount,
    CreatedAt,
    UpdatedAt,
}

/// Draws (one run of the lottery, bound to one plan)
#[derive(DeriveIden)]
enum Draws {
    Table,
    Id,
    DrawNumber,
    DrawDate,
    PlanId,
    CreatedAt,
    UpdatedAt,
}

/// Winning numbers recorded for one prize of one draw
#[derive(DeriveIden)]
enum Results {
    Table,
    Id,
    DrawId,
    PrizeId,
    WinningNumbers,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Foreign keys are created without ON DELETE CASCADE. Plan -> prizes and
/// draw -> results cascades are performed explicitly by the integrity guard,
/// so the database only ever rejects orphaning deletes.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Plans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Plans::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Plans::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Plans::Description).text().null())
                    .col(
                        ColumnDef::new(Plans::CreatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Plans::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_plans_name")
                    .table(Plans::Table)
                    .col(Plans::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Prizes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prizes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prizes::PlanId).big_integer().not_null())
                    .col(ColumnDef::new(Prizes::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Prizes::DisplayValue)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Prizes::BallCount).integer().not_null())
                    .col(
                        ColumnDef::new(Prizes::CreatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Prizes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prizes_plan")
                            .from(Prizes::Table, Prizes::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一计划内奖项标题唯一 (结果录入按标题解析奖项)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_prizes_plan_title_unique")
                    .table(Prizes::Table)
                    .col(Prizes::PlanId)
                    .col(Prizes::Title)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Draws::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Draws::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Draws::DrawNumber).string_len(64).not_null())
                    .col(ColumnDef::new(Draws::DrawDate).date().not_null())
                    .col(ColumnDef::new(Draws::PlanId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Draws::CreatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Draws::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_draws_plan")
                            .from(Draws::Table, Draws::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // 开奖期号全局唯一 (不按计划区分)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_draws_draw_number_unique")
                    .table(Draws::Table)
                    .col(Draws::DrawNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_draws_plan")
                    .table(Draws::Table)
                    .col(Draws::PlanId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Results::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Results::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Results::DrawId).big_integer().not_null())
                    .col(ColumnDef::new(Results::PrizeId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Results::WinningNumbers)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Results::CreatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Results::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_results_draw")
                            .from(Results::Table, Results::DrawId)
                            .to(Draws::Table, Draws::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_results_prize")
                            .from(Results::Table, Results::PrizeId)
                            .to(Prizes::Table, Prizes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个 (开奖, 奖项) 最多一条结果; 并发重复录入时由该索引兜底
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_results_draw_prize_unique")
                    .table(Results::Table)
                    .col(Results::DrawId)
                    .col(Results::PrizeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_results_prize")
                    .table(Results::Table)
                    .col(Results::PrizeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序：结果 -> 开奖 -> 奖项 -> 计划
        manager
            .drop_table(Table::drop().if_exists().table(Results::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Draws::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Prizes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Plans::Table).to_owned())
            .await?;

        Ok(())
    }
}
