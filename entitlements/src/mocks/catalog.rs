//! Mock catalog reader for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{EntitlementError, Result};
use crate::providers::CatalogReader;
use crate::state::{Content, Course, CourseId, Package, PackageId};

#[derive(Debug, Default)]
struct Inner {
    courses: HashMap<CourseId, Course>,
    packages: HashMap<PackageId, Package>,
    // Insertion order is the stored order returned by list_content.
    content: Vec<Content>,
}

/// Mock catalog reader.
///
/// Uses in-memory storage for testing; seed it with the `add_*` helpers.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    inner: Arc<Mutex<Inner>>,
}

impl MockCatalog {
    /// Create a new empty mock catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a course.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add_course(&self, course: Course) {
        #[allow(clippy::unwrap_used)]
        let mut inner = self.inner.lock().unwrap();
        inner.courses.insert(course.id, course);
    }

    /// Seed a package, registering it on its course when the course exists.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add_package(&self, package: Package) {
        #[allow(clippy::unwrap_used)]
        let mut inner = self.inner.lock().unwrap();
        if let Some(course) = inner.courses.get_mut(&package.course_id) {
            course.packages.push(package.id);
        }
        inner.packages.insert(package.id, package);
    }

    /// Seed a content item.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add_content(&self, content: Content) {
        #[allow(clippy::unwrap_used)]
        let mut inner = self.inner.lock().unwrap();
        inner.content.push(content);
    }
}

impl CatalogReader for MockCatalog {
    async fn get_course(&self, course_id: CourseId) -> Result<Course> {
        let inner = self.inner.lock().map_err(|_| EntitlementError::Internal)?;
        inner
            .courses
            .get(&course_id)
            .cloned()
            .ok_or_else(|| EntitlementError::not_found("course", course_id.0))
    }

    async fn get_package(&self, package_id: PackageId) -> Result<Package> {
        let inner = self.inner.lock().map_err(|_| EntitlementError::Internal)?;
        inner
            .packages
            .get(&package_id)
            .cloned()
            .ok_or_else(|| EntitlementError::not_found("package", package_id.0))
    }

    async fn list_content(
        &self,
        course_id: CourseId,
        package_id: PackageId,
    ) -> Result<Vec<Content>> {
        let inner = self.inner.lock().map_err(|_| EntitlementError::Internal)?;
        Ok(inner
            .content
            .iter()
            .filter(|c| c.course_id == course_id && c.package_id == package_id)
            .cloned()
            .collect())
    }
}
