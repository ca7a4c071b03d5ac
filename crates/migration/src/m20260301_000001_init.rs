//! Initial schema migration - creates all tables from scratch.
//!
//! Complete schema for the family budget ledger:
//!
//! - `users`: token auth + notification preferences
//! - `currencies`: currency registry doubling as the equity ledger
//! - `cost_categories`: shared cost taxonomy
//! - `costs` / `incomes` / `exchanges`: the three operation tables
//! - `cost_shortcuts`: per-user one-tap cost templates
//! - `imported_transactions`: dedup set for bank statement imports

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Token,
    BigCostThreshold,
}

#[derive(Iden)]
enum Currencies {
    Table,
    Id,
    Name,
    Sign,
    Equity,
}

#[derive(Iden)]
enum CostCategories {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Costs {
    Table,
    Id,
    Name,
    Value,
    Timestamp,
    UserId,
    CurrencyId,
    CategoryId,
}

#[derive(Iden)]
enum Incomes {
    Table,
    Id,
    Name,
    Value,
    Timestamp,
    Source,
    UserId,
    CurrencyId,
}

#[derive(Iden)]
enum Exchanges {
    Table,
    Id,
    FromValue,
    ToValue,
    Timestamp,
    UserId,
    FromCurrencyId,
    ToCurrencyId,
}

#[derive(Iden)]
enum CostShortcuts {
    Table,
    Id,
    Name,
    Value,
    UserId,
    CurrencyId,
    CategoryId,
    UiPositionIndex,
}

#[derive(Iden)]
enum ImportedTransactions {
    Table,
    Id,
    UserId,
    ExternalId,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Token).string().not_null())
                    .col(ColumnDef::new(Users::BigCostThreshold).big_integer())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-token")
                    .table(Users::Table)
                    .col(Users::Token)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Currencies (the equity ledger)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Currencies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Currencies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Currencies::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Currencies::Sign)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Currencies::Equity)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Cost Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CostCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CostCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CostCategories::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Costs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Costs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Costs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Costs::Name).string().not_null())
                    .col(ColumnDef::new(Costs::Value).big_integer().not_null())
                    .col(ColumnDef::new(Costs::Timestamp).date().not_null())
                    .col(ColumnDef::new(Costs::UserId).integer().not_null())
                    .col(ColumnDef::new(Costs::CurrencyId).integer().not_null())
                    .col(ColumnDef::new(Costs::CategoryId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-costs-user_id")
                            .from(Costs::Table, Costs::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-costs-currency_id")
                            .from(Costs::Table, Costs::CurrencyId)
                            .to(Currencies::Table, Currencies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-costs-category_id")
                            .from(Costs::Table, Costs::CategoryId)
                            .to(CostCategories::Table, CostCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-costs-timestamp")
                    .table(Costs::Table)
                    .col(Costs::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-costs-user_id")
                    .table(Costs::Table)
                    .col(Costs::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Incomes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Incomes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Incomes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Incomes::Name).string().not_null())
                    .col(ColumnDef::new(Incomes::Value).big_integer().not_null())
                    .col(ColumnDef::new(Incomes::Timestamp).date().not_null())
                    .col(ColumnDef::new(Incomes::Source).string().not_null())
                    .col(ColumnDef::new(Incomes::UserId).integer().not_null())
                    .col(ColumnDef::new(Incomes::CurrencyId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-incomes-user_id")
                            .from(Incomes::Table, Incomes::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-incomes-currency_id")
                            .from(Incomes::Table, Incomes::CurrencyId)
                            .to(Currencies::Table, Currencies::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-incomes-timestamp")
                    .table(Incomes::Table)
                    .col(Incomes::Timestamp)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Exchanges
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Exchanges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Exchanges::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Exchanges::FromValue).big_integer().not_null())
                    .col(ColumnDef::new(Exchanges::ToValue).big_integer().not_null())
                    .col(ColumnDef::new(Exchanges::Timestamp).date().not_null())
                    .col(ColumnDef::new(Exchanges::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Exchanges::FromCurrencyId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Exchanges::ToCurrencyId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-exchanges-user_id")
                            .from(Exchanges::Table, Exchanges::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-exchanges-from_currency_id")
                            .from(Exchanges::Table, Exchanges::FromCurrencyId)
                            .to(Currencies::Table, Currencies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-exchanges-to_currency_id")
                            .from(Exchanges::Table, Exchanges::ToCurrencyId)
                            .to(Currencies::Table, Currencies::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-exchanges-timestamp")
                    .table(Exchanges::Table)
                    .col(Exchanges::Timestamp)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Cost Shortcuts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CostShortcuts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CostShortcuts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CostShortcuts::Name).string().not_null())
                    .col(ColumnDef::new(CostShortcuts::Value).big_integer())
                    .col(ColumnDef::new(CostShortcuts::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(CostShortcuts::CurrencyId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostShortcuts::CategoryId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostShortcuts::UiPositionIndex)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cost_shortcuts-user_id")
                            .from(CostShortcuts::Table, CostShortcuts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cost_shortcuts-currency_id")
                            .from(CostShortcuts::Table, CostShortcuts::CurrencyId)
                            .to(Currencies::Table, Currencies::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cost_shortcuts-category_id")
                            .from(CostShortcuts::Table, CostShortcuts::CategoryId)
                            .to(CostCategories::Table, CostCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cost_shortcuts-user_id")
                    .table(CostShortcuts::Table)
                    .col(CostShortcuts::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Imported Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ImportedTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ImportedTransactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ImportedTransactions::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ImportedTransactions::ExternalId)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-imported_transactions-user_id")
                            .from(ImportedTransactions::Table, ImportedTransactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-imported_transactions-user_external")
                    .table(ImportedTransactions::Table)
                    .col(ImportedTransactions::UserId)
                    .col(ImportedTransactions::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(ImportedTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CostShortcuts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Exchanges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Incomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Costs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CostCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Currencies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
