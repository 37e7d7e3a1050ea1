use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub course_id: String, // e.g. CSE100
    pub subject: String,   // e.g. CSE
    pub number: String,    // e.g. 100
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::prereq_group::Entity")]
    PrereqGroups,
}

impl Related<super::prereq_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrereqGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
