use diesel::{ExpressionMethods, QueryDsl, SelectableHelper};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use eyre::Result;

use crate::models::triangle::TriangleRow;
use crate::schemas::triangles;

/// Read access to the `triangles` table.
pub struct TriangleService;

impl TriangleService {
    /// Loads the full candidate set in ascending-id order.
    ///
    /// The index rebuild consumes exactly this ordering, so the resulting
    /// snapshot (and the dispatch working set derived from it) is
    /// deterministic for a given table state.
    ///
    /// # Errors
    /// * If the database query fails
    pub async fn load_all(conn: &mut AsyncPgConnection) -> Result<Vec<TriangleRow>> {
        let rows = triangles::table
            .order(triangles::id.asc())
            .select(TriangleRow::as_select())
            .load::<TriangleRow>(conn)
            .await?;
        Ok(rows)
    }

    /// Number of candidate rows currently in the table.
    ///
    /// # Errors
    /// * If the database query fails
    pub async fn count(conn: &mut AsyncPgConnection) -> Result<i64> {
        let count = triangles::table.count().get_result(conn).await?;
        Ok(count)
    }
}
