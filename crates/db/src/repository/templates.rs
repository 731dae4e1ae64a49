//! Automation template operations.

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::{
    models::{AutomationRow, NewAutomation, TemplateRow},
    repository::automations::create_automation,
    DbError,
};

/// Return all templates, most used first.
pub async fn list_templates(pool: &PgPool) -> Result<Vec<TemplateRow>, DbError> {
    let rows = sqlx::query_as::<_, TemplateRow>(
        r#"
        SELECT id, name, description, category, tags, workflow_nodes, usage_count, created_at
        FROM automation_templates
        ORDER BY usage_count DESC, name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Insert an automation built from a template and bump the template's
/// `usage_count`, inside one transaction.
///
/// Returns `DbError::NotFound` (and inserts nothing) if the template does
/// not exist.
pub async fn instantiate_template(
    pool: &PgPool,
    template_id: Uuid,
    new: &NewAutomation,
) -> Result<AutomationRow, DbError> {
    let mut tx = pool.begin().await?;

    let row = create_automation(&mut *tx, new).await?;

    let bumped = sqlx::query(
        "UPDATE automation_templates SET usage_count = usage_count + 1 WHERE id = $1",
    )
    .bind(template_id)
    .execute(&mut *tx)
    .await?;

    if bumped.rows_affected() == 0 {
        warn!(%template_id, "template vanished during instantiation, rolling back");
        tx.rollback().await?;
        return Err(DbError::NotFound);
    }

    tx.commit().await?;
    Ok(row)
}
