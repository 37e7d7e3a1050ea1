use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::CourseId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::Subject).string().not_null())
                    .col(ColumnDef::new(Courses::Number).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create prereq_groups table, one row per AND-group per term
        manager
            .create_table(
                Table::create()
                    .table(PrereqGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PrereqGroups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PrereqGroups::CourseId).string().not_null())
                    .col(ColumnDef::new(PrereqGroups::Sequence).integer().not_null())
                    .col(ColumnDef::new(PrereqGroups::Term).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-prereq_groups-course_id")
                            .from(PrereqGroups::Table, PrereqGroups::CourseId)
                            .to(Courses::Table, Courses::CourseId),
                    )
                    .to_owned(),
            )
            .await?;

        // Create prereq_options table. The option's course_id may reference a
        // course that has not been ingested yet, so it has no foreign key.
        manager
            .create_table(
                Table::create()
                    .table(PrereqOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PrereqOptions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PrereqOptions::GroupId).integer().not_null())
                    .col(ColumnDef::new(PrereqOptions::CourseId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-prereq_options-group_id")
                            .from(PrereqOptions::Table, PrereqOptions::GroupId)
                            .to(PrereqGroups::Table, PrereqGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(PrereqOptions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PrereqGroups::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Courses {
    Table,
    CourseId,
    Subject,
    Number,
}

#[derive(Iden)]
enum PrereqGroups {
    Table,
    Id,
    CourseId,
    Sequence,
    Term,
}

#[derive(Iden)]
enum PrereqOptions {
    Table,
    Id,
    GroupId,
    CourseId,
}
