//! # API Facade
//!
//! The API layer is a **thin facade** over the validation gate and the repositories.
//! It is the single entry point for every boundary (the bundled CLI, an HTTP adapter,
//! tests), and it is constructed explicitly and passed around; there are no
//! process-wide instances.
//!
//! ## Boundary Contract
//!
//! | Operation | Input | Success | Failures |
//! |-----------|-------|---------|----------|
//! | `list_*` | – | `{ "<collection>": [...] }` | NotFound, StorageFailure |
//! | `get_*` | id | entity | NotFound |
//! | `create_*` | JSON body | [`Ack`] with the new id | ValidationFailure |
//! | `update_*` | JSON body with `id` | updated entity | ValidationFailure, NotFound |
//! | `delete_*` | id | [`Ack`] | NotFound |
//!
//! Bodies are untyped `serde_json::Value`s. They always pass the validation gate
//! before a repository sees them.
//!
//! ## Generic Over StorageBackend
//!
//! `CampusApi<B: StorageBackend>`:
//! - Production: `CampusApi<FsBackend>`
//! - Testing: `CampusApi<&MemBackend>`

use crate::error::Result;
use crate::model::{Collection, Course, Entity, User};
use crate::store::{CourseRepository, Repository, StorageBackend, UserRepository};
use crate::validation;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// Where each collection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampusPaths {
    pub courses: PathBuf,
    pub users: PathBuf,
}

impl CampusPaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            courses: dir.join(Course::DEFAULT_FILE),
            users: dir.join(User::DEFAULT_FILE),
        }
    }
}

impl Default for CampusPaths {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

/// Acknowledgement returned by create and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub msg: &'static str,
    pub id: String,
}

impl Ack {
    fn ok(id: impl Into<String>) -> Self {
        Self {
            msg: "ok",
            id: id.into(),
        }
    }
}

pub struct CampusApi<B: StorageBackend> {
    courses: CourseRepository<B>,
    users: UserRepository<B>,
}

impl<B: StorageBackend + Clone> CampusApi<B> {
    /// Opens both collections, creating empty files where needed.
    pub fn open(backend: B, paths: &CampusPaths) -> Result<Self> {
        let courses = Repository::open(backend.clone(), paths.courses.clone())?;
        let users = Repository::open(backend, paths.users.clone())?;
        Ok(Self::new(courses, users))
    }
}

impl<B: StorageBackend> CampusApi<B> {
    pub fn new(courses: CourseRepository<B>, users: UserRepository<B>) -> Self {
        Self { courses, users }
    }

    pub fn paths(&self) -> CampusPaths {
        CampusPaths {
            courses: self.courses.base_path().to_path_buf(),
            users: self.users.base_path().to_path_buf(),
        }
    }

    pub fn courses(&self) -> &CourseRepository<B> {
        &self.courses
    }

    pub fn users(&self) -> &UserRepository<B> {
        &self.users
    }

    // --- Courses ---

    pub fn list_courses(&self) -> Result<Collection<Course>> {
        self.courses.get_all()
    }

    pub fn get_course(&self, id: &str) -> Result<Course> {
        self.courses.get_one(id)
    }

    pub fn create_course(&self, body: &Value) -> Result<Ack> {
        create(&self.courses, body)
    }

    pub fn update_course(&self, body: &Value) -> Result<Course> {
        update(&self.courses, body)
    }

    pub fn delete_course(&self, id: &str) -> Result<Ack> {
        self.courses.delete(id).map(|c| Ack::ok(c.id))
    }

    // --- Users ---

    pub fn list_users(&self) -> Result<Collection<User>> {
        self.users.get_all()
    }

    pub fn get_user(&self, id: &str) -> Result<User> {
        self.users.get_one(id)
    }

    pub fn create_user(&self, body: &Value) -> Result<Ack> {
        create(&self.users, body)
    }

    pub fn update_user(&self, body: &Value) -> Result<User> {
        update(&self.users, body)
    }

    pub fn delete_user(&self, id: &str) -> Result<Ack> {
        self.users.delete(id).map(|u| Ack::ok(u.id))
    }
}

fn create<E: Entity, B: StorageBackend>(repo: &Repository<E, B>, body: &Value) -> Result<Ack> {
    let draft: E::Draft = validation::decode(body, E::create_schema())?;
    let entity = repo.create(draft)?;
    Ok(Ack::ok(entity.id()))
}

fn update<E: Entity, B: StorageBackend>(repo: &Repository<E, B>, body: &Value) -> Result<E> {
    let patch: E::Patch = validation::decode(body, E::update_schema())?;
    repo.update(patch)
}
