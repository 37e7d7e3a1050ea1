use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Sequence numbers are unique within a (course, term); this also
        // serves lookups by course and by (course, term)
        manager
            .create_index(
                Index::create()
                    .name("idx_prereq_groups_course_term_sequence")
                    .table(PrereqGroups::Table)
                    .col(PrereqGroups::CourseId)
                    .col(PrereqGroups::Term)
                    .col(PrereqGroups::Sequence)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index on prereq_options.group_id for faster joins
        manager
            .create_index(
                Index::create()
                    .name("idx_prereq_options_group_id")
                    .table(PrereqOptions::Table)
                    .col(PrereqOptions::GroupId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes in reverse order
        manager
            .drop_index(Index::drop().name("idx_prereq_options_group_id").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_prereq_groups_course_term_sequence")
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum PrereqGroups {
    Table,
    CourseId,
    Sequence,
    Term,
}

#[derive(Iden)]
enum PrereqOptions {
    Table,
    GroupId,
}
