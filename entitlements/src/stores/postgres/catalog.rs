//! PostgreSQL catalog reader implementation.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::{EntitlementError, Result};
use crate::state::{
    Content, ContentId, ContentLink, Course, CourseId, MockPrice, Package, PackageId, PackageType,
};

/// PostgreSQL catalog reader.
///
/// Read-only; catalog authoring happens outside this core.
#[derive(Clone)]
pub struct PostgresCatalog {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

impl PostgresCatalog {
    /// Create a new PostgreSQL catalog reader.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> EntitlementError {
    EntitlementError::Database(format!("Failed to decode row: {e}"))
}

fn package_from_row(row: &PgRow) -> Result<Package> {
    let package_type: String = row.try_get("package_type").map_err(db_err)?;
    let mock_prices: serde_json::Value = row.try_get("mock_prices").map_err(db_err)?;
    let mock_prices: Vec<MockPrice> = serde_json::from_value(mock_prices)
        .map_err(|e| EntitlementError::Database(format!("Malformed mock_prices: {e}")))?;

    Ok(Package {
        id: PackageId(row.try_get("id").map_err(db_err)?),
        course_id: CourseId(row.try_get("course_id").map_err(db_err)?),
        name: row.try_get("name").map_err(db_err)?,
        price: row.try_get("price").map_err(db_err)?,
        start: row.try_get("start_at").map_err(db_err)?,
        end: row.try_get("end_at").map_err(db_err)?,
        package_type: PackageType::parse(&package_type)?,
        mock_prices,
    })
}

fn content_from_row(row: &PgRow) -> Result<Content> {
    let content_type: String = row.try_get("content_type").map_err(db_err)?;
    let link: String = row.try_get("link").map_err(db_err)?;
    let week_no: i32 = row.try_get("week_no").map_err(db_err)?;
    let lecture_no: i32 = row.try_get("lecture_no").map_err(db_err)?;

    Ok(Content {
        id: ContentId(row.try_get("id").map_err(db_err)?),
        course_id: CourseId(row.try_get("course_id").map_err(db_err)?),
        package_id: PackageId(row.try_get("package_id").map_err(db_err)?),
        topic: row.try_get("topic").map_err(db_err)?,
        week_no: u32::try_from(week_no)
            .map_err(|_| EntitlementError::Database("negative week_no".to_string()))?,
        lecture_no: u32::try_from(lecture_no)
            .map_err(|_| EntitlementError::Database("negative lecture_no".to_string()))?,
        link: ContentLink::from_parts(&content_type, link)?,
    })
}

impl crate::providers::CatalogReader for PostgresCatalog {
    async fn get_course(&self, course_id: CourseId) -> Result<Course> {
        let row = sqlx::query("SELECT id, title, description, image FROM courses WHERE id = $1")
            .bind(course_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| EntitlementError::Database(format!("Failed to get course: {e}")))?
            .ok_or_else(|| EntitlementError::not_found("course", course_id.0))?;

        let package_rows = sqlx::query("SELECT id FROM packages WHERE course_id = $1")
            .bind(course_id.0)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| EntitlementError::Database(format!("Failed to list packages: {e}")))?;

        let packages = package_rows
            .iter()
            .map(|r| Ok(PackageId(r.try_get("id").map_err(db_err)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Course {
            id: CourseId(row.try_get("id").map_err(db_err)?),
            title: row.try_get("title").map_err(db_err)?,
            description: row.try_get("description").map_err(db_err)?,
            image: row.try_get("image").map_err(db_err)?,
            packages,
        })
    }

    async fn get_package(&self, package_id: PackageId) -> Result<Package> {
        let row = sqlx::query(
            "SELECT id, course_id, name, price, start_at, end_at, package_type, mock_prices \
             FROM packages WHERE id = $1",
        )
        .bind(package_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EntitlementError::Database(format!("Failed to get package: {e}")))?
        .ok_or_else(|| EntitlementError::not_found("package", package_id.0))?;

        package_from_row(&row)
    }

    async fn list_content(
        &self,
        course_id: CourseId,
        package_id: PackageId,
    ) -> Result<Vec<Content>> {
        let rows = sqlx::query(
            "SELECT id, course_id, package_id, topic, week_no, lecture_no, content_type, link \
             FROM content \
             WHERE course_id = $1 AND package_id = $2 \
             ORDER BY position",
        )
        .bind(course_id.0)
        .bind(package_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EntitlementError::Database(format!("Failed to list content: {e}")))?;

        rows.iter().map(content_from_row).collect()
    }
}
