use crate::{
    entities::{courses, prereq_groups, prereq_options},
    error::StoreError,
};
use log::{debug, info};
use models::{
    CourseId, CourseRecord, PrereqGroup, PrereqGroupInput, PrereqTable, Term, TermGroup,
    prereq::{resolve_groups, validate_groups},
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::OnConflict,
};
use std::collections::VecDeque;

/// Row counts for each relation, reported after a load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub courses: u64,
    pub groups: u64,
    pub options: u64,
}

pub struct PrereqService;

impl PrereqService {
    /// Records a course, deriving its subject and number from the id
    ///
    /// Inserting a course that already exists is a no-op.
    pub async fn upsert_course<C>(db: &C, course_id: &str) -> Result<(), StoreError>
    where
        C: ConnectionTrait,
    {
        let course_id: CourseId = course_id.parse()?;
        Self::insert_course(db, &course_id).await?;
        Ok(())
    }

    async fn insert_course<C>(db: &C, course_id: &CourseId) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let model = courses::ActiveModel {
            course_id: Set(course_id.to_string()),
            subject: Set(course_id.subject().to_owned()),
            number: Set(course_id.number().to_owned()),
        };

        courses::Entity::insert(model)
            .on_conflict(
                OnConflict::column(courses::Column::CourseId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        Ok(())
    }

    /// Replaces every group stored for `(course_id, term)` with `groups`
    ///
    /// The input is validated before anything is touched. The delete and the
    /// inserts run in one transaction, so readers see either the old groups or
    /// the new ones. Other terms of the same course are left alone.
    pub async fn replace_prereqs(
        db: &DatabaseConnection,
        course_id: &str,
        term: &str,
        groups: &[PrereqGroupInput],
    ) -> Result<(), StoreError> {
        let course: CourseId = course_id.parse()?;
        let groups = validate_groups(groups)?;

        let txn = db.begin().await?;

        let written = async {
            Self::insert_course(&txn, &course).await?;
            Self::write_groups(&txn, course_id, term, groups).await
        }
        .await;

        match written {
            Ok(count) => {
                txn.commit().await?;
                debug!("Stored {count} prerequisite groups for {course_id} ({term})");
                Ok(())
            }
            Err(e) => {
                txn.rollback().await?;
                Err(e.into())
            }
        }
    }

    async fn write_groups<C>(
        txn: &C,
        course_id: &str,
        term: &str,
        groups: Vec<PrereqGroup>,
    ) -> Result<usize, DbErr>
    where
        C: ConnectionTrait,
    {
        let stale: Vec<i32> = prereq_groups::Entity::find()
            .select_only()
            .column(prereq_groups::Column::Id)
            .filter(prereq_groups::Column::CourseId.eq(course_id))
            .filter(prereq_groups::Column::Term.eq(term))
            .into_tuple()
            .all(txn)
            .await?;

        if !stale.is_empty() {
            prereq_options::Entity::delete_many()
                .filter(prereq_options::Column::GroupId.is_in(stale.clone()))
                .exec(txn)
                .await?;
            prereq_groups::Entity::delete_many()
                .filter(prereq_groups::Column::Id.is_in(stale))
                .exec(txn)
                .await?;
        }

        let count = groups.len();
        for group in groups {
            let inserted = prereq_groups::Entity::insert(prereq_groups::ActiveModel {
                course_id: Set(course_id.to_owned()),
                sequence: Set(group.sequence),
                term: Set(term.to_owned()),
                ..Default::default()
            })
            .exec(txn)
            .await?;

            // Validation guarantees at least one option per group
            let options = group
                .options
                .into_iter()
                .map(|option| prereq_options::ActiveModel {
                    group_id: Set(inserted.last_insert_id),
                    course_id: Set(option),
                    ..Default::default()
                });
            prereq_options::Entity::insert_many(options)
                .exec(txn)
                .await?;
        }

        Ok(count)
    }

    /// Returns the term-resolved prerequisites of a course
    ///
    /// For every sequence number the group from the newest term wins; the
    /// result is sorted by sequence. Unknown courses resolve to an empty list.
    pub async fn resolve_prereqs<C>(
        db: &C,
        course_id: &str,
    ) -> Result<Vec<PrereqGroup>, StoreError>
    where
        C: ConnectionTrait,
    {
        // A single statement, so the view comes from one committed snapshot
        let rows: Vec<(i32, String, i32, String)> = prereq_options::Entity::find()
            .select_only()
            .column(prereq_options::Column::GroupId)
            .column(prereq_groups::Column::Term)
            .column(prereq_groups::Column::Sequence)
            .column(prereq_options::Column::CourseId)
            .inner_join(prereq_groups::Entity)
            .filter(prereq_groups::Column::CourseId.eq(course_id))
            .order_by_asc(prereq_options::Column::GroupId)
            .order_by_asc(prereq_options::Column::Id)
            .into_tuple()
            .all(db)
            .await?;

        let mut tagged: Vec<TermGroup> = Vec::new();
        let mut current_group = None;

        for (group_id, term, sequence, option) in rows {
            match tagged.last_mut() {
                Some(last) if current_group == Some(group_id) => last.group.options.push(option),
                _ => {
                    current_group = Some(group_id);
                    tagged.push(TermGroup {
                        term: Term::new(term),
                        group: PrereqGroup::new(sequence, [option]),
                    });
                }
            }
        }

        Ok(resolve_groups(tagged))
    }

    /// Validates and stores one scraped record
    pub async fn ingest_record(
        db: &DatabaseConnection,
        record: &CourseRecord,
    ) -> Result<(), StoreError> {
        // Reject the whole record before the course row is written
        record.validate()?;

        Self::upsert_course(db, &record.course_id).await?;
        Self::replace_prereqs(db, &record.course_id, &record.term, &record.prereqs).await
    }

    /// Resolves `root` and every course reachable from it into a lookup table
    ///
    /// Each course is queried once, even when it is reachable along several
    /// paths or through a cycle.
    pub async fn reachable_table<C>(db: &C, root: &str) -> Result<PrereqTable, StoreError>
    where
        C: ConnectionTrait,
    {
        let mut table = PrereqTable::new();
        let mut queue = VecDeque::from([root.to_owned()]);

        while let Some(course_id) = queue.pop_front() {
            if table.contains(&course_id) {
                continue;
            }

            let groups = Self::resolve_prereqs(db, &course_id).await?;
            queue.extend(
                groups
                    .iter()
                    .flat_map(|group| group.options.iter())
                    .filter(|option| !table.contains(option))
                    .cloned(),
            );
            table.insert(course_id, groups);
        }

        info!("Resolved {} courses reachable from {root}", table.len());
        Ok(table)
    }

    /// Counts the rows in each relation
    pub async fn counts<C>(db: &C) -> Result<StoreCounts, StoreError>
    where
        C: ConnectionTrait,
    {
        Ok(StoreCounts {
            courses: courses::Entity::find().count(db).await?,
            groups: prereq_groups::Entity::find().count(db).await?,
            options: prereq_options::Entity::find().count(db).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use models::{PrereqOptionInput, ValidationError, expand};
    use sea_orm::{ConnectOptions, Database};

    async fn setup() -> DatabaseConnection {
        // One connection, so every query sees the same in-memory database
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);

        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    fn group(sequence: i64, options: &[&str]) -> PrereqGroupInput {
        PrereqGroupInput::new(sequence, options.iter().copied())
    }

    fn resolved(sequence: i32, options: &[&str]) -> PrereqGroup {
        PrereqGroup::new(sequence, options.iter().copied())
    }

    #[tokio::test]
    async fn test_upsert_course_is_idempotent() {
        let db = setup().await;

        PrereqService::upsert_course(&db, "CSE8A").await.unwrap();
        PrereqService::upsert_course(&db, "CSE8A").await.unwrap();

        let course = courses::Entity::find_by_id("CSE8A".to_string())
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(course.subject, "CSE");
        assert_eq!(course.number, "8A");
        assert_eq!(PrereqService::counts(&db).await.unwrap().courses, 1);
    }

    #[tokio::test]
    async fn test_upsert_course_rejects_bad_id() {
        let db = setup().await;

        let err = PrereqService::upsert_course(&db, "100").await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::InvalidCourseId(_))
        ));
    }

    #[tokio::test]
    async fn test_replace_is_idempotent() {
        let db = setup().await;
        let groups = vec![group(1, &["CSE21", "MATH154"]), group(2, &["CSE12"])];

        PrereqService::replace_prereqs(&db, "CSE100", "WI26", &groups)
            .await
            .unwrap();
        let first = PrereqService::resolve_prereqs(&db, "CSE100").await.unwrap();

        PrereqService::replace_prereqs(&db, "CSE100", "WI26", &groups)
            .await
            .unwrap();
        let second = PrereqService::resolve_prereqs(&db, "CSE100").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            second,
            vec![resolved(1, &["CSE21", "MATH154"]), resolved(2, &["CSE12"])]
        );

        let counts = PrereqService::counts(&db).await.unwrap();
        assert_eq!(
            counts,
            StoreCounts {
                courses: 1,
                groups: 2,
                options: 3
            }
        );
    }

    #[tokio::test]
    async fn test_newest_term_takes_precedence() {
        let db = setup().await;

        PrereqService::replace_prereqs(&db, "CSE100", "FA25", &[group(1, &["A"])])
            .await
            .unwrap();
        PrereqService::replace_prereqs(&db, "CSE100", "WI26", &[group(1, &["B"])])
            .await
            .unwrap();

        let groups = PrereqService::resolve_prereqs(&db, "CSE100").await.unwrap();
        assert_eq!(groups, vec![resolved(1, &["B"])]);
    }

    #[tokio::test]
    async fn test_disjoint_sequences_are_unioned() {
        let db = setup().await;

        // Newer term ingested first
        PrereqService::replace_prereqs(&db, "CSE100", "WI26", &[group(2, &["B"])])
            .await
            .unwrap();
        PrereqService::replace_prereqs(&db, "CSE100", "FA25", &[group(1, &["A"])])
            .await
            .unwrap();

        let groups = PrereqService::resolve_prereqs(&db, "CSE100").await.unwrap();
        assert_eq!(groups, vec![resolved(1, &["A"]), resolved(2, &["B"])]);
    }

    #[tokio::test]
    async fn test_replace_only_touches_its_term() {
        let db = setup().await;

        PrereqService::replace_prereqs(&db, "CSE100", "FA25", &[group(2, &["OLD2"])])
            .await
            .unwrap();
        PrereqService::replace_prereqs(&db, "CSE100", "WI26", &[group(1, &["X"])])
            .await
            .unwrap();
        PrereqService::replace_prereqs(&db, "CSE100", "WI26", &[group(1, &["Y"])])
            .await
            .unwrap();

        let groups = PrereqService::resolve_prereqs(&db, "CSE100").await.unwrap();
        assert_eq!(groups, vec![resolved(1, &["Y"]), resolved(2, &["OLD2"])]);
    }

    #[tokio::test]
    async fn test_unknown_course_is_empty() {
        let db = setup().await;

        let groups = PrereqService::resolve_prereqs(&db, "UNKNOWN123").await.unwrap();
        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn test_validation_leaves_prior_data() {
        let db = setup().await;

        PrereqService::replace_prereqs(&db, "CSE100", "WI26", &[group(1, &["CSE21"])])
            .await
            .unwrap();

        let err = PrereqService::replace_prereqs(&db, "CSE100", "WI26", &[group(1, &[])])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::EmptyGroup { sequence: 1 })
        ));

        let err = PrereqService::replace_prereqs(&db, "CSE100", "WI26", &[group(-1, &["X"])])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::InvalidSequence(-1))
        ));

        let groups = PrereqService::resolve_prereqs(&db, "CSE100").await.unwrap();
        assert_eq!(groups, vec![resolved(1, &["CSE21"])]);
    }

    #[tokio::test]
    async fn test_storage_failure_rolls_back() {
        let db = setup().await;

        PrereqService::replace_prereqs(&db, "CSE100", "WI26", &[group(1, &["CSE21"])])
            .await
            .unwrap();

        db.execute_unprepared(
            "CREATE TRIGGER reject_boom BEFORE INSERT ON prereq_options \
             WHEN NEW.course_id = 'BOOM' BEGIN SELECT RAISE(ABORT, 'boom'); END;",
        )
        .await
        .unwrap();

        let err = PrereqService::replace_prereqs(
            &db,
            "CSE100",
            "WI26",
            &[group(1, &["CSE12"]), group(2, &["BOOM"])],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));

        let groups = PrereqService::resolve_prereqs(&db, "CSE100").await.unwrap();
        assert_eq!(groups, vec![resolved(1, &["CSE21"])]);
    }

    #[tokio::test]
    async fn test_ingest_record() {
        let db = setup().await;

        let record = CourseRecord {
            course_id: "CSE100".into(),
            term: "WI26".into(),
            prereqs: vec![PrereqGroupInput {
                sequence: 1,
                options: vec![PrereqOptionInput {
                    course_id: "CSE21".into(),
                    title: Some("Discrete Math".into()),
                }],
            }],
        };
        PrereqService::ingest_record(&db, &record).await.unwrap();

        let groups = PrereqService::resolve_prereqs(&db, "CSE100").await.unwrap();
        assert_eq!(groups, vec![resolved(1, &["CSE21"])]);

        // An invalid record writes nothing, not even the course row
        let bad = CourseRecord {
            course_id: "MATH20C".into(),
            term: "WI26".into(),
            prereqs: vec![group(1, &[])],
        };
        assert!(PrereqService::ingest_record(&db, &bad).await.is_err());
        assert_eq!(PrereqService::counts(&db).await.unwrap().courses, 1);
    }

    #[tokio::test]
    async fn test_reachable_table_handles_cycles() {
        let db = setup().await;

        PrereqService::replace_prereqs(&db, "A", "WI26", &[group(1, &["B", "C"])])
            .await
            .unwrap();
        PrereqService::replace_prereqs(&db, "B", "WI26", &[group(1, &["A"])])
            .await
            .unwrap();

        let table = PrereqService::reachable_table(&db, "A").await.unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.contains("C"));

        let tree = expand("A", &table);
        let b = &tree.groups[0].options[0];
        assert_eq!(b.course_id, "B");
        assert!(b.groups[0].options[0].is_cycle);
        assert!(!tree.groups[0].options[1].is_cycle);
    }
}
