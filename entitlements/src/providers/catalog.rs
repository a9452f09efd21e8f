//! Catalog reader trait.

use std::future::Future;

use crate::error::Result;
use crate::state::{Content, Course, CourseId, Package, PackageId};

/// Read-only lookups against the course catalog.
///
/// Catalog authoring lives outside this core; entitlement decisions only
/// need existence and attribute reads.
pub trait CatalogReader: Send + Sync {
    /// Get a course by ID.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Course not found → `NotFound`
    /// - Storage fails
    fn get_course(&self, course_id: CourseId) -> impl Future<Output = Result<Course>> + Send;

    /// Get a package by ID.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Package not found → `NotFound`
    /// - Storage fails
    fn get_package(&self, package_id: PackageId) -> impl Future<Output = Result<Package>> + Send;

    /// List all content for a (course, package) pair, in stored order.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    fn list_content(
        &self,
        course_id: CourseId,
        package_id: PackageId,
    ) -> impl Future<Output = Result<Vec<Content>>> + Send;
}
