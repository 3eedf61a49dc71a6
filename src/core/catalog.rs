//! The catalog: canonical in-memory lists of every entity
//!
//! A catalog is never mutated in place. Every update returns a new
//! catalog, leaving the original untouched. Relations between entities are
//! plain id back-references; nothing cascades.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::shortid::ShortIdIndex;
use crate::entities::{Part, PartRow, Photo, Project, SubProject};
use crate::yaml::{self, YamlError};

/// Title shown for parts whose project no longer exists
pub const UNKNOWN_PROJECT: &str = "Unknown project";

const SAMPLE_CATALOG: &str = include_str!("sample_catalog.yaml");

/// Catalog lookup and loading errors
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("{kind} not found: {reference}")]
    #[diagnostic(
        code(velo::catalog::not_found),
        help("Use `velo {kind} list` to see what exists")
    )]
    NotFound { kind: &'static str, reference: String },

    #[error("'{query}' matches more than one {kind}: {}", .matches.join(", "))]
    #[diagnostic(
        code(velo::catalog::ambiguous),
        help("Use the full ID or a short reference such as {prefix}@1")
    )]
    Ambiguous {
        kind: &'static str,
        prefix: &'static str,
        query: String,
        matches: Vec<String>,
    },

    #[error("Duplicate {kind} id '{id}' in catalog")]
    #[diagnostic(code(velo::catalog::duplicate_id))]
    DuplicateId { kind: &'static str, id: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Every project, part, sub-project and photo
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub sub_projects: Vec<SubProject>,
    /// Project gallery photos and, without a project, inspiration photos
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// Display name per entity kind, used in messages and `velo <kind> list` hints
trait Kind: Entity + Clone {
    const KIND: &'static str;
    const ID_PREFIX: EntityPrefix;
}

impl Kind for Project {
    const KIND: &'static str = "project";
    const ID_PREFIX: EntityPrefix = EntityPrefix::Proj;
}

impl Kind for Part {
    const KIND: &'static str = "part";
    const ID_PREFIX: EntityPrefix = EntityPrefix::Part;
}

impl Kind for SubProject {
    const KIND: &'static str = "sub";
    const ID_PREFIX: EntityPrefix = EntityPrefix::Sub;
}

impl Kind for Photo {
    const KIND: &'static str = "photo";
    const ID_PREFIX: EntityPrefix = EntityPrefix::Photo;
}

impl Catalog {
    /// The built-in sample catalog
    pub fn sample() -> Result<Self> {
        let catalog: Catalog = yaml::parse_yaml_str(SAMPLE_CATALOG, "sample_catalog.yaml")?;
        catalog.check_unique_ids()?;
        Ok(catalog)
    }

    /// Load a catalog file (read-only; never written back)
    pub fn load(path: &Path) -> Result<Self> {
        let catalog: Catalog = yaml::parse_yaml_file(path)?;
        catalog.check_unique_ids()?;
        tracing::debug!(
            path = %path.display(),
            projects = catalog.projects.len(),
            parts = catalog.parts.len(),
            sub_projects = catalog.sub_projects.len(),
            photos = catalog.photos.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Load `path` when given, otherwise the sample catalog
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::sample(),
        }
    }

    fn check_unique_ids(&self) -> Result<()> {
        unique_ids(&self.projects)?;
        unique_ids(&self.parts)?;
        unique_ids(&self.sub_projects)?;
        unique_ids(&self.photos)
    }

    // Lookups

    pub fn project(&self, id: &EntityId) -> Result<&Project> {
        by_id(&self.projects, id)
    }

    pub fn part(&self, id: &EntityId) -> Result<&Part> {
        by_id(&self.parts, id)
    }

    pub fn sub_project(&self, id: &EntityId) -> Result<&SubProject> {
        by_id(&self.sub_projects, id)
    }

    pub fn photo(&self, id: &EntityId) -> Result<&Photo> {
        by_id(&self.photos, id)
    }

    /// Find a project by exact id, short reference (`PROJ@2`), or a unique
    /// case-insensitive title fragment
    pub fn find_project(&self, query: &str) -> Result<&Project> {
        find(&self.projects, query)
    }

    pub fn find_part(&self, query: &str) -> Result<&Part> {
        find(&self.parts, query)
    }

    pub fn find_sub_project(&self, query: &str) -> Result<&SubProject> {
        find(&self.sub_projects, query)
    }

    pub fn find_photo(&self, query: &str) -> Result<&Photo> {
        find(&self.photos, query)
    }

    // Short references, numbered in catalog order

    pub fn project_refs(&self) -> ShortIdIndex {
        ShortIdIndex::from_ids(EntityPrefix::Proj, self.projects.iter().map(|p| &p.id))
    }

    pub fn part_refs(&self) -> ShortIdIndex {
        ShortIdIndex::from_ids(EntityPrefix::Part, self.parts.iter().map(|p| &p.id))
    }

    pub fn sub_project_refs(&self) -> ShortIdIndex {
        ShortIdIndex::from_ids(EntityPrefix::Sub, self.sub_projects.iter().map(|s| &s.id))
    }

    pub fn photo_refs(&self) -> ShortIdIndex {
        ShortIdIndex::from_ids(EntityPrefix::Photo, self.photos.iter().map(|p| &p.id))
    }

    // Views

    pub fn parts_for(&self, project_id: &EntityId) -> Vec<&Part> {
        self.parts
            .iter()
            .filter(|part| &part.project_id == project_id)
            .collect()
    }

    pub fn sub_projects_for(&self, project_id: &EntityId) -> Vec<&SubProject> {
        self.sub_projects
            .iter()
            .filter(|sub| &sub.project_id == project_id)
            .collect()
    }

    pub fn photos_for(&self, project_id: &EntityId) -> Vec<&Photo> {
        self.photos
            .iter()
            .filter(|photo| photo.project_id.as_ref() == Some(project_id))
            .collect()
    }

    /// The inspiration gallery
    pub fn inspiration(&self) -> Vec<&Photo> {
        self.photos.iter().filter(|p| p.is_inspiration()).collect()
    }

    /// Title of a project, or [`UNKNOWN_PROJECT`] for a dangling reference
    pub fn project_title(&self, project_id: &EntityId) -> &str {
        self.projects
            .iter()
            .find(|p| &p.id == project_id)
            .map_or(UNKNOWN_PROJECT, |p| p.title.as_str())
    }

    /// Every part joined with its project's title
    pub fn part_rows(&self) -> Vec<PartRow> {
        self.parts
            .iter()
            .map(|part| PartRow {
                project_title: self.project_title(&part.project_id).to_string(),
                part: part.clone(),
            })
            .collect()
    }

    // Updates

    pub fn with_project(&self, project: Project) -> Catalog {
        let mut next = self.clone();
        next.projects.push(project);
        next
    }

    pub fn with_part(&self, part: Part) -> Catalog {
        let mut next = self.clone();
        next.parts.push(part);
        next
    }

    pub fn with_sub_project(&self, sub: SubProject) -> Catalog {
        let mut next = self.clone();
        next.sub_projects.push(sub);
        next
    }

    pub fn with_photo(&self, photo: Photo) -> Catalog {
        let mut next = self.clone();
        next.photos.push(photo);
        next
    }

    /// Replace the project carrying the same id
    pub fn replacing_project(&self, project: Project) -> Result<Catalog> {
        Ok(Catalog {
            projects: replaced(&self.projects, project)?,
            ..self.clone()
        })
    }

    pub fn replacing_part(&self, part: Part) -> Result<Catalog> {
        Ok(Catalog {
            parts: replaced(&self.parts, part)?,
            ..self.clone()
        })
    }

    pub fn replacing_sub_project(&self, sub: SubProject) -> Result<Catalog> {
        Ok(Catalog {
            sub_projects: replaced(&self.sub_projects, sub)?,
            ..self.clone()
        })
    }

    /// Remove a project; its parts, sub-projects and photos stay behind
    pub fn without_project(&self, id: &EntityId) -> Result<Catalog> {
        Ok(Catalog {
            projects: removed(&self.projects, id)?,
            ..self.clone()
        })
    }

    pub fn without_part(&self, id: &EntityId) -> Result<Catalog> {
        Ok(Catalog {
            parts: removed(&self.parts, id)?,
            ..self.clone()
        })
    }

    pub fn without_sub_project(&self, id: &EntityId) -> Result<Catalog> {
        Ok(Catalog {
            sub_projects: removed(&self.sub_projects, id)?,
            ..self.clone()
        })
    }

    pub fn without_photo(&self, id: &EntityId) -> Result<Catalog> {
        Ok(Catalog {
            photos: removed(&self.photos, id)?,
            ..self.clone()
        })
    }
}

fn not_found<T: Kind>(reference: &str) -> CatalogError {
    CatalogError::NotFound {
        kind: T::KIND,
        reference: reference.to_string(),
    }
}

fn by_id<'a, T: Kind>(items: &'a [T], id: &EntityId) -> Result<&'a T> {
    items
        .iter()
        .find(|item| item.id() == id)
        .ok_or_else(|| not_found::<T>(id.as_str()))
}

fn find<'a, T: Kind>(items: &'a [T], query: &str) -> Result<&'a T> {
    let query = query.trim();
    if query.is_empty() {
        return Err(not_found::<T>(query));
    }

    if let Some(item) = items.iter().find(|item| item.id().as_str() == query) {
        return Ok(item);
    }

    if query.contains('@') {
        let index = ShortIdIndex::from_ids(T::ID_PREFIX, items.iter().map(|i| i.id()));
        return index
            .resolve(query)
            .and_then(|full| items.iter().find(|item| item.id().as_str() == full))
            .ok_or_else(|| not_found::<T>(query));
    }

    let needle = query.to_lowercase();
    let hits: Vec<&T> = items
        .iter()
        .filter(|item| item.title().to_lowercase().contains(&needle))
        .collect();

    match hits.as_slice() {
        [] => Err(not_found::<T>(query)),
        [single] => Ok(*single),
        many => Err(CatalogError::Ambiguous {
            kind: T::KIND,
            prefix: T::ID_PREFIX.as_str(),
            query: query.to_string(),
            matches: many.iter().map(|item| item.title().to_string()).collect(),
        }),
    }
}

fn replaced<T: Kind>(items: &[T], item: T) -> Result<Vec<T>> {
    let position = items
        .iter()
        .position(|existing| existing.id() == item.id())
        .ok_or_else(|| not_found::<T>(item.id().as_str()))?;
    let mut next = items.to_vec();
    next[position] = item;
    Ok(next)
}

fn removed<T: Kind>(items: &[T], id: &EntityId) -> Result<Vec<T>> {
    if !items.iter().any(|item| item.id() == id) {
        return Err(not_found::<T>(id.as_str()));
    }
    Ok(items.iter().filter(|item| item.id() != id).cloned().collect())
}

fn unique_ids<T: Kind>(items: &[T]) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id()) {
            return Err(CatalogError::DuplicateId {
                kind: T::KIND,
                id: item.id().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{PartStatus, ProjectStatus};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample() -> Catalog {
        Catalog::sample().unwrap()
    }

    #[test]
    fn test_sample_catalog_loads() {
        let catalog = sample();
        assert_eq!(catalog.projects.len(), 6);
        assert_eq!(catalog.parts.len(), 10);
        assert_eq!(catalog.sub_projects.len(), 3);
        assert_eq!(catalog.inspiration().len(), 3);
        assert_eq!(catalog.projects[0].status, ProjectStatus::InProgress);
    }

    #[test]
    fn test_lookup_not_found() {
        let catalog = sample();
        let err = catalog.project(&EntityId::from("99")).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { kind: "project", .. }));
        assert_eq!(err.to_string(), "project not found: 99");
    }

    #[test]
    fn test_find_project_by_id_short_ref_and_title() {
        let catalog = sample();
        assert_eq!(catalog.find_project("3").unwrap().title, "Vintage Peugeot Road Bike");
        assert_eq!(catalog.find_project("PROJ@2").unwrap().id.as_str(), "2");
        assert_eq!(catalog.find_project("@5").unwrap().id.as_str(), "5");
        assert_eq!(catalog.find_project("rockhopper").unwrap().id.as_str(), "2");
        assert!(catalog.find_project("PROJ@40").is_err());
        assert!(catalog.find_project("PART@1").is_err());
    }

    #[test]
    fn test_find_project_ambiguous() {
        let catalog = sample();
        // "Bike" appears in several titles
        let err = catalog.find_project("bike").unwrap_err();
        assert!(matches!(err, CatalogError::Ambiguous { .. }));
    }

    #[test]
    fn test_views() {
        let catalog = sample();
        let trek = EntityId::from("1");
        assert_eq!(catalog.parts_for(&trek).len(), 3);
        assert_eq!(catalog.sub_projects_for(&trek).len(), 3);
        assert_eq!(catalog.photos_for(&trek).len(), 3);
        assert!(catalog.photos_for(&EntityId::from("2")).is_empty());
    }

    #[test]
    fn test_updates_return_new_catalog() {
        let catalog = sample();
        let part = Part::new(EntityId::from("2"), "Grips".to_string());
        let next = catalog.with_part(part.clone());
        assert_eq!(next.parts.len(), catalog.parts.len() + 1);
        assert_eq!(catalog.parts.len(), 10);

        let mut edited = next.part(&part.id).unwrap().clone();
        edited.status = PartStatus::Ordered;
        let edited_catalog = next.replacing_part(edited).unwrap();
        assert_eq!(edited_catalog.part(&part.id).unwrap().status, PartStatus::Ordered);
        assert_eq!(next.part(&part.id).unwrap().status, PartStatus::Needed);
    }

    #[test]
    fn test_delete_project_does_not_cascade() {
        let catalog = sample();
        let trek = EntityId::from("1");
        let next = catalog.without_project(&trek).unwrap();
        assert_eq!(next.projects.len(), 5);
        assert_eq!(next.parts_for(&trek).len(), 3);

        let rows = next.part_rows();
        assert_eq!(rows[0].project_title, UNKNOWN_PROJECT);
        assert!(next.without_project(&trek).is_err());
    }

    #[test]
    fn test_replacing_unknown_is_not_found() {
        let catalog = sample();
        let stray = SubProject::new(EntityId::from("1"), "Stray".to_string());
        assert!(matches!(
            catalog.replacing_sub_project(stray),
            Err(CatalogError::NotFound { kind: "sub", .. })
        ));
    }

    #[test]
    fn test_part_rows_join_titles() {
        let catalog = sample();
        let rows = catalog.part_rows();
        assert_eq!(rows.len(), catalog.parts.len());
        assert_eq!(rows[3].project_title, "Vintage Peugeot Road Bike");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "projects:\n  - id: a\n    title: Frame only\n    start_date: 2024-02-01\n    target_date: 2024-04-30\n"
        )
        .unwrap();
        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.projects.len(), 1);
        assert!(catalog.parts.is_empty());
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "parts:\n  - id: x\n    project_id: a\n    name: One\n  - id: x\n    project_id: a\n    name: Two\n"
        )
        .unwrap();
        let err = Catalog::load(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { kind: "part", .. }));
    }

    #[test]
    fn test_load_bad_yaml_is_diagnostic() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "projects:\n  - id: a\n    status: finished\n").unwrap();
        let err = Catalog::load(file.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Yaml(_)));
    }
}
