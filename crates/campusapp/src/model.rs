//! # Domain Model: Entities and Their Collections
//!
//! Campus manages two kinds of records, [`Course`] and [`User`]. Both are *entities*:
//! uniquely identified, timestamped, and persisted as members of a single JSON
//! document per kind.
//!
//! ## Identity and History
//!
//! - `id` is assigned by the repository on create and never changes afterwards.
//! - `createdAt` is set once, on create.
//! - `updateAt` is set on create (equal to `createdAt`) and refreshed on every update.
//!   It is optional on disk so that hand-written files without it still load.
//!
//! ## Candidates
//!
//! Callers never build entities directly. They submit a *draft* (create) or a *patch*
//! (update), which the validation gate produces from untyped input using the schema
//! tables in this module:
//!
//! | Kind | Draft | Patch |
//! |------|-------|-------|
//! | course | [`CourseDraft`] / [`COURSE_CREATE`] | [`CoursePatch`] / [`COURSE_UPDATE`] |
//! | user | [`UserDraft`] / [`USER_CREATE`] | [`UserPatch`] / [`USER_UPDATE`] |
//!
//! Create schemas still *type-check* `id`, `createdAt` and `updateAt` when a caller
//! sends them, but drafts have no such fields, so the values never reach the
//! repository.
//!
//! ## On-Disk Shape
//!
//! ```text
//! courseData.json                 userData.json
//! {                               {
//!   "courses": [                    "users": [
//!     { "id": "...",                  { "id": "...",
//!       "name": "Intro",                "name": "Ada",
//!       "description": "...",           "email": "ada@example.com",
//!       "price": 2.0,                   "role": "admin",
//!       "tags": ["x"],                  "createdAt": "...",
//!       "author": "A",                  "updateAt": "..." }
//!       "createdAt": "...",           ]
//!       "updateAt": "..." }         }
//!   ]
//! }
//! ```

use crate::validation::{Constraint, FieldRule, Schema};
use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A record kind that can live in a [`crate::store::Repository`].
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// Singular name used in messages ("course").
    const KIND: &'static str;
    /// Key of the array inside the collection document ("courses").
    const COLLECTION: &'static str;
    /// File name used when no explicit path is configured.
    const DEFAULT_FILE: &'static str;

    type Draft: fmt::Debug + DeserializeOwned;
    type Patch: fmt::Debug + DeserializeOwned;

    fn create_schema() -> &'static Schema;
    fn update_schema() -> &'static Schema;

    /// Builds a new entity. `id` and `now` come from the repository.
    fn from_draft(draft: Self::Draft, id: String, now: DateTime<Utc>) -> Self;

    /// Merges the fields present in `patch`. Must not touch identity or timestamps.
    fn apply_patch(&mut self, patch: Self::Patch);

    fn patch_id(patch: &Self::Patch) -> &str;

    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn update_at(&self) -> Option<DateTime<Utc>>;
    fn set_update_at(&mut self, at: DateTime<Utc>);
}

// --- Course ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub update_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub tags: Vec<String>,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePatch {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub author: Option<String>,
}

const ID: &[Constraint] = &[Constraint::String, Constraint::NonEmpty];
const NAME: &[Constraint] = &[Constraint::String, Constraint::NonEmpty];
const TEXT: &[Constraint] = &[Constraint::String];
const PRICE: &[Constraint] = &[Constraint::Number, Constraint::NonNegative];
const TAGS: &[Constraint] = &[Constraint::EachString];
const DATE: &[Constraint] = &[Constraint::Date];
const EMAIL: &[Constraint] = &[Constraint::String, Constraint::Email];
const ROLE: &[Constraint] = &[Constraint::String, Constraint::OneOf(Role::NAMES)];

pub static COURSE_CREATE: Schema = Schema {
    name: "course.create",
    rules: &[
        FieldRule::optional("id", TEXT),
        FieldRule::required("name", NAME),
        FieldRule::required("description", TEXT),
        FieldRule::required("price", PRICE),
        FieldRule::required("tags", TAGS),
        FieldRule::required("author", TEXT),
        FieldRule::optional("createdAt", DATE),
        FieldRule::optional("updateAt", DATE),
    ],
};

pub static COURSE_UPDATE: Schema = Schema {
    name: "course.update",
    rules: &[
        FieldRule::required("id", ID),
        FieldRule::optional("name", NAME),
        FieldRule::optional("description", TEXT),
        FieldRule::optional("price", PRICE),
        FieldRule::optional("tags", TAGS),
        FieldRule::optional("author", TEXT),
        FieldRule::optional("createdAt", DATE),
        FieldRule::optional("updateAt", DATE),
    ],
};

impl Entity for Course {
    const KIND: &'static str = "course";
    const COLLECTION: &'static str = "courses";
    const DEFAULT_FILE: &'static str = "courseData.json";

    type Draft = CourseDraft;
    type Patch = CoursePatch;

    fn create_schema() -> &'static Schema {
        &COURSE_CREATE
    }

    fn update_schema() -> &'static Schema {
        &COURSE_UPDATE
    }

    fn from_draft(draft: CourseDraft, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            tags: draft.tags,
            author: draft.author,
            created_at: now,
            update_at: Some(now),
        }
    }

    fn apply_patch(&mut self, patch: CoursePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
    }

    fn patch_id(patch: &CoursePatch) -> &str {
        &patch.id
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn update_at(&self) -> Option<DateTime<Utc>> {
        self.update_at
    }

    fn set_update_at(&mut self, at: DateTime<Utc>) {
        self.update_at = Some(at);
    }
}

// --- User ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
    Guest,
}

impl Role {
    /// Wire names, in declaration order.
    pub const NAMES: &'static [&'static str] = &["admin", "member", "guest"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
            Role::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub update_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct UserPatch {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

pub static USER_CREATE: Schema = Schema {
    name: "user.create",
    rules: &[
        FieldRule::optional("id", TEXT),
        FieldRule::required("name", NAME),
        FieldRule::required("email", EMAIL),
        FieldRule::required("role", ROLE),
        FieldRule::optional("createdAt", DATE),
        FieldRule::optional("updateAt", DATE),
    ],
};

pub static USER_UPDATE: Schema = Schema {
    name: "user.update",
    rules: &[
        FieldRule::required("id", ID),
        FieldRule::optional("name", NAME),
        FieldRule::optional("email", EMAIL),
        FieldRule::optional("role", ROLE),
        FieldRule::optional("createdAt", DATE),
        FieldRule::optional("updateAt", DATE),
    ],
};

impl Entity for User {
    const KIND: &'static str = "user";
    const COLLECTION: &'static str = "users";
    const DEFAULT_FILE: &'static str = "userData.json";

    type Draft = UserDraft;
    type Patch = UserPatch;

    fn create_schema() -> &'static Schema {
        &USER_CREATE
    }

    fn update_schema() -> &'static Schema {
        &USER_UPDATE
    }

    fn from_draft(draft: UserDraft, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            role: draft.role,
            created_at: now,
            update_at: Some(now),
        }
    }

    fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }

    fn patch_id(patch: &UserPatch) -> &str {
        &patch.id
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn update_at(&self) -> Option<DateTime<Utc>> {
        self.update_at
    }

    fn set_update_at(&mut self, at: DateTime<Utc>) {
        self.update_at = Some(at);
    }
}

// --- Collection ---

/// All entities of one kind, in insertion order.
///
/// Serialized as a single-key object whose key is [`Entity::COLLECTION`], e.g.
/// `{ "courses": [...] }`. Other top-level keys are ignored when reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<E> {
    pub entities: Vec<E>,
}

impl<E> Default for Collection<E> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
        }
    }
}

impl<E: Entity> Collection<E> {
    pub fn new(entities: Vec<E>) -> Self {
        Self { entities }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entities.iter().position(|e| e.id() == id)
    }

    pub fn find(&self, id: &str) -> Option<&E> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }
}

impl<E: Entity> Serialize for Collection<E> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(E::COLLECTION, &self.entities)?;
        map.end()
    }
}

impl<'de, E: Entity> Deserialize<'de> for Collection<E> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut document = serde_json::Map::deserialize(deserializer)?;
        let entities = document
            .remove(E::COLLECTION)
            .ok_or_else(|| de::Error::missing_field(E::COLLECTION))?;
        let entities: Vec<E> = serde_json::from_value(entities).map_err(de::Error::custom)?;
        Ok(Self { entities })
    }
}
