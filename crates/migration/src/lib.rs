pub use sea_orm_migration::prelude::*;

mod m20260110_add_prereq_indexes;
mod m20260110_create_prereq_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260110_create_prereq_tables::Migration),
            Box::new(m20260110_add_prereq_indexes::Migration),
        ]
    }
}
