use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20241220_000001_create_socks_table::Migration)]
    }
}

mod m20241220_000001_create_socks_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20241220_000001_create_socks_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Socks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Socks::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Socks::Color).string().not_null())
                        .col(
                            ColumnDef::new(Socks::CottonPercentage)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Socks::Amount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;

            // One row per (color, cotton_percentage) pair
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_socks_color_cotton_percentage")
                        .table(Socks::Table)
                        .col(Socks::Color)
                        .col(Socks::CottonPercentage)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Socks::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Socks {
        Table,
        Id,
        Color,
        CottonPercentage,
        Amount,
    }
}
