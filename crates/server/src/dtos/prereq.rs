use models::{PrereqGroup, PrereqTree, TreeGroup};
use serde::Serialize;
use utoipa::ToSchema;

/// One AND-group: any of `options` satisfies it
#[derive(Debug, Serialize, ToSchema)]
pub struct PrereqGroupResponse {
    pub sequence: i32,
    pub options: Vec<String>,
}

impl From<PrereqGroup> for PrereqGroupResponse {
    fn from(group: PrereqGroup) -> Self {
        Self {
            sequence: group.sequence,
            options: group.options,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PrereqTreeResponse {
    pub course_id: String,
    /// Set when the course already appears among its own ancestors
    pub is_cycle: bool,
    pub groups: Vec<TreeGroupResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TreeGroupResponse {
    pub sequence: i32,
    #[schema(no_recursion)]
    pub options: Vec<PrereqTreeResponse>,
}

impl From<PrereqTree> for PrereqTreeResponse {
    fn from(tree: PrereqTree) -> Self {
        Self {
            course_id: tree.course_id,
            is_cycle: tree.is_cycle,
            groups: tree.groups.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<TreeGroup> for TreeGroupResponse {
    fn from(group: TreeGroup) -> Self {
        Self {
            sequence: group.sequence,
            options: group.options.into_iter().map(Into::into).collect(),
        }
    }
}
