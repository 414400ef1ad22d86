use super::backend::StorageBackend;
use crate::error::{CampusError, Result};
use crate::model::{Collection, Course, Entity, User};
use chrono::{DateTime, Utc};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub type CourseRepository<B> = Repository<Course, B>;
pub type UserRepository<B> = Repository<User, B>;

/// Owns one collection file and the CRUD semantics on top of it.
///
/// Every operation re-reads the whole document, so there is no cache to go stale.
/// Mutations rewrite the whole document.
pub struct Repository<E: Entity, B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    base_path: PathBuf,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, B: StorageBackend> Repository<E, B> {
    /// Opens the collection at `base_path`, writing an empty one if nothing is there.
    ///
    /// The existence check and the write are not synchronized: two processes opening
    /// the same missing path at once both write an empty collection, and the later
    /// write wins. Harmless for an empty file, but do not point two processes at a
    /// path that one of them is still populating.
    pub fn open(backend: B, base_path: impl Into<PathBuf>) -> Result<Self> {
        let repo = Self {
            backend,
            base_path: base_path.into(),
            _entity: PhantomData,
        };
        repo.init()?;
        Ok(repo)
    }

    /// Opens the collection at [`Entity::DEFAULT_FILE`] inside `dir`.
    pub fn open_in(backend: B, dir: &Path) -> Result<Self> {
        Self::open(backend, dir.join(E::DEFAULT_FILE))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn init(&self) -> Result<()> {
        if self.backend.exists(&self.base_path) {
            return Ok(());
        }
        tracing::warn!(
            collection = E::COLLECTION,
            path = %self.base_path.display(),
            "collection file missing, creating an empty one"
        );
        self.persist(&Collection::<E>::default())
    }

    fn persist(&self, collection: &Collection<E>) -> Result<()> {
        self.backend.write(collection, &self.base_path)
    }

    /// The full collection, in insertion order.
    pub fn get_all(&self) -> Result<Collection<E>> {
        let document: Option<Collection<E>> = match self.backend.read(&self.base_path) {
            Ok(document) => document,
            Err(CampusError::Missing { .. }) => None,
            Err(e) => return Err(e),
        };
        document.ok_or_else(|| CampusError::CollectionNotFound {
            collection: E::COLLECTION,
            path: self.base_path.clone(),
        })
    }

    pub fn get_one(&self, id: &str) -> Result<E> {
        self.get_all()?
            .find(id)
            .cloned()
            .ok_or_else(|| CampusError::not_found(E::KIND, id))
    }

    /// Stores a new entity built from `draft` and returns it.
    ///
    /// The id and both timestamps are assigned here; drafts cannot carry them.
    pub fn create(&self, draft: E::Draft) -> Result<E> {
        let mut collection = self.get_all()?;
        let id = fresh_id(&collection);
        let entity = E::from_draft(draft, id, Utc::now());

        collection.entities.push(entity.clone());
        self.persist(&collection)?;

        tracing::info!(kind = E::KIND, id = entity.id(), "created");
        Ok(entity)
    }

    /// Merges `patch` into the stored entity with the same id and returns the result.
    ///
    /// `id` and `createdAt` are kept; `updateAt` moves to now, and never backwards.
    pub fn update(&self, patch: E::Patch) -> Result<E> {
        let mut collection = self.get_all()?;
        let id = E::patch_id(&patch).to_string();
        let index = collection
            .position(&id)
            .ok_or_else(|| CampusError::not_found(E::KIND, id.as_str()))?;

        let entity = &mut collection.entities[index];
        entity.apply_patch(patch);
        let at = next_update_at(entity.created_at(), entity.update_at());
        entity.set_update_at(at);
        let updated = entity.clone();

        self.persist(&collection)?;

        tracing::info!(kind = E::KIND, id = %id, "updated");
        Ok(updated)
    }

    /// Removes the entity with `id` and returns it. Nothing is written if it is absent.
    pub fn delete(&self, id: &str) -> Result<E> {
        let mut collection = self.get_all()?;
        let index = collection
            .position(id)
            .ok_or_else(|| CampusError::not_found(E::KIND, id))?;

        let removed = collection.entities.remove(index);
        self.persist(&collection)?;

        tracing::info!(kind = E::KIND, id = %id, "deleted");
        Ok(removed)
    }
}

fn fresh_id<E: Entity>(collection: &Collection<E>) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !collection.contains(&id) {
            return id;
        }
    }
}

fn next_update_at(created_at: DateTime<Utc>, previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let floor = previous.map_or(created_at, |p| p.max(created_at));
    Utc::now().max(floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CourseDraft, CoursePatch, Role, UserDraft, UserPatch};
    use crate::store::mem_backend::MemBackend;
    use chrono::Duration;
    use std::thread::sleep;

    const PATH: &str = "courseData.json";

    fn make_repo() -> CourseRepository<MemBackend> {
        Repository::open(MemBackend::new(), PATH).unwrap()
    }

    fn draft(name: &str) -> CourseDraft {
        CourseDraft {
            name: name.to_string(),
            description: "d".to_string(),
            price: 2.0,
            tags: vec!["x".to_string()],
            author: "A".to_string(),
        }
    }

    // --- Initialization ---

    #[test]
    fn test_open_creates_empty_collection() {
        let repo = make_repo();
        let raw = repo.backend.document(Path::new(PATH)).unwrap();
        assert_eq!(raw, "{\n  \"courses\": []\n}");
        assert!(repo.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_open_keeps_existing_collection() {
        let backend = MemBackend::new();
        {
            let repo = CourseRepository::open(&backend, PATH).unwrap();
            repo.create(draft("Kept")).unwrap();
        }
        let writes = backend.write_count();

        let repo = CourseRepository::open(&backend, PATH).unwrap();
        assert_eq!(backend.write_count(), writes);
        assert_eq!(repo.get_all().unwrap().len(), 1);
    }

    #[test]
    fn test_open_in_uses_default_file_name() {
        let repo = UserRepository::open_in(MemBackend::new(), Path::new("data")).unwrap();
        assert_eq!(repo.base_path(), Path::new("data/userData.json"));
    }

    #[test]
    fn test_open_propagates_write_failure() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        let result = CourseRepository::open(backend, PATH);
        assert!(matches!(result, Err(CampusError::Store(_))));
    }

    // --- Reads ---

    #[test]
    fn test_get_all_is_idempotent() {
        let repo = make_repo();
        repo.create(draft("One")).unwrap();
        repo.create(draft("Two")).unwrap();
        assert_eq!(repo.get_all().unwrap(), repo.get_all().unwrap());
    }

    #[test]
    fn test_get_all_keeps_insertion_order() {
        let repo = make_repo();
        for name in ["a", "b", "c"] {
            repo.create(draft(name)).unwrap();
        }
        let names: Vec<_> = repo
            .get_all()
            .unwrap()
            .entities
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_get_all_fails_when_file_vanishes() {
        let repo = make_repo();
        repo.backend.remove(Path::new(PATH));
        let err = repo.get_all().unwrap_err();
        assert!(matches!(
            err,
            CampusError::CollectionNotFound {
                collection: "courses",
                ..
            }
        ));
    }

    #[test]
    fn test_get_all_fails_on_null_document() {
        let repo = make_repo();
        repo.backend.write_raw(Path::new(PATH), "null").unwrap();
        assert!(matches!(
            repo.get_all(),
            Err(CampusError::CollectionNotFound { .. })
        ));
    }

    #[test]
    fn test_get_all_reports_corrupt_document() {
        let repo = make_repo();
        repo.backend.write_raw(Path::new(PATH), "{ broken").unwrap();
        assert!(matches!(
            repo.get_all(),
            Err(CampusError::Serialization { .. })
        ));
    }

    #[test]
    fn test_get_one_finds_by_id() {
        let repo = make_repo();
        repo.create(draft("First")).unwrap();
        let second = repo.create(draft("Second")).unwrap();
        assert_eq!(repo.get_one(&second.id).unwrap().name, "Second");
    }

    #[test]
    fn test_get_one_unknown_id_is_not_found() {
        let repo = make_repo();
        repo.create(draft("Only")).unwrap();
        let err = repo.get_one("missing").unwrap_err();
        assert!(matches!(err, CampusError::NotFound { kind: "course", .. }));
    }

    // --- Create ---

    #[test]
    fn test_create_assigns_identity_and_timestamps() {
        let repo = make_repo();
        let existing = repo.create(draft("Existing")).unwrap();
        let created = repo.create(draft("New")).unwrap();

        assert!(!created.id.is_empty());
        assert_ne!(created.id, existing.id);
        assert_eq!(created.update_at, Some(created.created_at));

        let stored = repo.get_one(&created.id).unwrap();
        assert_eq!(stored, created);
    }

    #[test]
    fn test_create_propagates_write_failure() {
        let repo = make_repo();
        repo.backend.set_simulate_write_error(true);
        assert!(repo.create(draft("Lost")).is_err());

        repo.backend.set_simulate_write_error(false);
        assert!(repo.get_all().unwrap().is_empty());
    }

    // --- Update ---

    #[test]
    fn test_update_preserves_identity_and_history() {
        let repo = make_repo();
        let created = repo.create(draft("Intro")).unwrap();
        sleep(std::time::Duration::from_millis(5));

        let updated = repo
            .update(CoursePatch {
                id: created.id.clone(),
                price: Some(5.0),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.price, 5.0);
        assert_eq!(updated.name, "Intro");
        assert!(updated.update_at.unwrap() > created.update_at.unwrap());
        assert_eq!(repo.get_one(&created.id).unwrap(), updated);
    }

    #[test]
    fn test_update_never_moves_update_at_backwards() {
        let repo = make_repo();
        let mut course = repo.create(draft("Future")).unwrap();
        let future = Utc::now() + Duration::hours(1);
        course.created_at = future;
        course.update_at = Some(future);
        repo.backend
            .write(&Collection::new(vec![course.clone()]), Path::new(PATH))
            .unwrap();

        let updated = repo
            .update(CoursePatch {
                id: course.id.clone(),
                name: Some("Renamed".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(updated.update_at.unwrap() >= future);
        assert!(updated.created_at <= updated.update_at.unwrap());
    }

    #[test]
    fn test_update_fills_missing_update_at() {
        let repo = make_repo();
        let mut course = repo.create(draft("Legacy")).unwrap();
        course.update_at = None;
        repo.backend
            .write(&Collection::new(vec![course.clone()]), Path::new(PATH))
            .unwrap();

        let updated = repo
            .update(CoursePatch {
                id: course.id.clone(),
                ..Default::default()
            })
            .unwrap();
        assert!(updated.update_at.unwrap() >= updated.created_at);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let repo = make_repo();
        repo.create(draft("Only")).unwrap();
        let writes = repo.backend.write_count();

        let err = repo
            .update(CoursePatch {
                id: "missing".into(),
                price: Some(1.0),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, CampusError::NotFound { .. }));
        assert_eq!(repo.backend.write_count(), writes);
    }

    #[test]
    fn test_update_leaves_other_records_alone() {
        let repo = make_repo();
        let a = repo.create(draft("A")).unwrap();
        let b = repo.create(draft("B")).unwrap();

        repo.update(CoursePatch {
            id: a.id.clone(),
            tags: Some(vec!["new".into()]),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(repo.get_one(&b.id).unwrap(), b);
        assert_eq!(repo.get_all().unwrap().len(), 2);
    }

    #[test]
    fn test_update_propagates_write_failure() {
        let repo = make_repo();
        let course = repo.create(draft("Frozen")).unwrap();
        repo.backend.set_simulate_write_error(true);

        let result = repo.update(CoursePatch {
            id: course.id.clone(),
            price: Some(7.0),
            ..Default::default()
        });
        assert!(matches!(result, Err(CampusError::Store(_))));

        repo.backend.set_simulate_write_error(false);
        assert_eq!(repo.get_one(&course.id).unwrap(), course);
    }

    #[test]
    fn test_update_user_fields() {
        let repo = UserRepository::open(MemBackend::new(), "userData.json").unwrap();
        let user = repo
            .create(UserDraft {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                role: Role::Member,
            })
            .unwrap();

        let updated = repo
            .update(UserPatch {
                id: user.id.clone(),
                email: Some("ada@lovelace.dev".into()),
                role: Some(Role::Admin),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.email, "ada@lovelace.dev");
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.name, "Ada");
    }

    // --- Delete ---

    #[test]
    fn test_delete_removes_exactly_one() {
        let repo = make_repo();
        let a = repo.create(draft("A")).unwrap();
        let b = repo.create(draft("B")).unwrap();
        let c = repo.create(draft("C")).unwrap();

        let removed = repo.delete(&b.id).unwrap();
        assert_eq!(removed.id, b.id);

        let remaining = repo.get_all().unwrap();
        assert_eq!(remaining.entities, vec![a, c]);
        assert!(matches!(
            repo.get_one(&b.id),
            Err(CampusError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete_unknown_id_writes_nothing() {
        let repo = make_repo();
        repo.create(draft("Only")).unwrap();
        let before = repo.backend.document(Path::new(PATH));
        let writes = repo.backend.write_count();

        let err = repo.delete("missing").unwrap_err();
        assert!(matches!(err, CampusError::NotFound { .. }));
        assert_eq!(repo.backend.write_count(), writes);
        assert_eq!(repo.backend.document(Path::new(PATH)), before);
    }

    #[test]
    fn test_delete_propagates_write_failure() {
        let repo = make_repo();
        let course = repo.create(draft("Sticky")).unwrap();
        repo.backend.set_simulate_write_error(true);

        assert!(repo.delete(&course.id).is_err());
        repo.backend.set_simulate_write_error(false);
        assert!(repo.get_one(&course.id).is_ok());
    }

    // --- Concurrency model ---

    #[test]
    fn test_stale_read_then_persist_is_last_writer_wins() {
        let backend = MemBackend::new();
        let first = CourseRepository::open(&backend, PATH).unwrap();
        let second = CourseRepository::open(&backend, PATH).unwrap();
        let course = first.create(draft("Shared")).unwrap();

        // second reads, first updates, second writes back what it read.
        let snapshot = second.get_all().unwrap();
        first
            .update(CoursePatch {
                id: course.id.clone(),
                price: Some(9.0),
                ..Default::default()
            })
            .unwrap();
        second.persist(&snapshot).unwrap();

        assert_eq!(first.get_one(&course.id).unwrap().price, 2.0);
        assert_eq!(second.get_one(&course.id).unwrap().price, 2.0);
    }
}
