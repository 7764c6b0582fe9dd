use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
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
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CoatingCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CoatingCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CoatingCategories::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Coatings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Coatings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Coatings::SubCategory).string().not_null())
                    .col(ColumnDef::new(Coatings::Thickness).string().not_null())
                    .col(ColumnDef::new(Coatings::Color).string().not_null())
                    .col(ColumnDef::new(Coatings::CategoryId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_coatings_category_id")
                            .from(Coatings::Table, Coatings::CategoryId)
                            .to(CoatingCategories::Table, CoatingCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Shapes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shapes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Shapes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Images::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Images::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Images::Name).string().not_null())
                    .col(ColumnDef::new(Images::Base64Data).text().not_null())
                    .col(ColumnDef::new(Images::ShapeId).integer())
                    .col(ColumnDef::new(Images::CategoryId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_images_shape_id")
                            .from(Images::Table, Images::ShapeId)
                            .to(Shapes::Table, Shapes::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_images_category_id")
                            .from(Images::Table, Images::CategoryId)
                            .to(CoatingCategories::Table, CoatingCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MaterialCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MaterialCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MaterialCategories::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(MaterialCategories::IsRareEarth)
                            .boolean()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Materials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Materials::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Materials::Grade).string().not_null())
                    .col(ColumnDef::new(Materials::BrT).integer().not_null())
                    .col(ColumnDef::new(Materials::HcbKaM).integer().not_null())
                    .col(ColumnDef::new(Materials::BhMaxKjM3).integer().not_null())
                    .col(ColumnDef::new(Materials::CategoryId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_materials_category_id")
                            .from(Materials::Table, Materials::CategoryId)
                            .to(MaterialCategories::Table, MaterialCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Materials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MaterialCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Images::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shapes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Coatings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CoatingCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Password,
}

#[derive(DeriveIden)]
enum CoatingCategories {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Coatings {
    Table,
    Id,
    SubCategory,
    Thickness,
    Color,
    CategoryId,
}

#[derive(DeriveIden)]
enum Shapes {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Images {
    Table,
    Id,
    Name,
    Base64Data,
    ShapeId,
    CategoryId,
}

#[derive(DeriveIden)]
enum MaterialCategories {
    Table,
    Id,
    Name,
    IsRareEarth,
}

#[derive(DeriveIden)]
enum Materials {
    Table,
    Id,
    Grade,
    BrT,
    HcbKaM,
    BhMaxKjM3,
    CategoryId,
}
