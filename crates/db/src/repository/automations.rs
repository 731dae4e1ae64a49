//! Automation CRUD operations.

use chrono::Utc;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    models::{AutomationPatch, AutomationRow, NewAutomation},
    DbError,
};

/// Insert a new automation.
///
/// Generic over the executor so the template instantiation transaction can
/// reuse it.  `workflow_nodes` must be the JSON produced by serialising the
/// domain node list from the `nodes` crate.
pub async fn create_automation<'e, E>(
    executor: E,
    new: &NewAutomation,
) -> Result<AutomationRow, DbError>
where
    E: Executor<'e, Database = Postgres>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row = sqlx::query_as::<_, AutomationRow>(
        r#"
        INSERT INTO automations
            (id, name, description, status, category, tags, created_by,
             workflow_nodes, runs_count, success_count, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, 0, $9, $9)
        RETURNING id, name, description, status, category, tags, created_by,
                  workflow_nodes, runs_count, success_count, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.status)
    .bind(&new.category)
    .bind(&new.tags)
    .bind(&new.created_by)
    .bind(&new.workflow_nodes)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(row)
}

/// Fetch a single automation by its primary key.
pub async fn get_automation(pool: &PgPool, id: Uuid) -> Result<AutomationRow, DbError> {
    let row = sqlx::query_as::<_, AutomationRow>(
        r#"
        SELECT id, name, description, status, category, tags, created_by,
               workflow_nodes, runs_count, success_count, created_at, updated_at
        FROM automations WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Return all automations ordered by creation time (newest first).
pub async fn list_automations(pool: &PgPool) -> Result<Vec<AutomationRow>, DbError> {
    let rows = sqlx::query_as::<_, AutomationRow>(
        r#"
        SELECT id, name, description, status, category, tags, created_by,
               workflow_nodes, runs_count, success_count, created_at, updated_at
        FROM automations ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Merge the present fields of `patch` into an automation.
///
/// Returns `DbError::NotFound` if no row matched.
pub async fn update_automation(
    pool: &PgPool,
    id: Uuid,
    patch: &AutomationPatch,
) -> Result<AutomationRow, DbError> {
    let row = sqlx::query_as::<_, AutomationRow>(
        r#"
        UPDATE automations
        SET name           = COALESCE($2, name),
            description    = COALESCE($3, description),
            status         = COALESCE($4, status),
            category       = COALESCE($5, category),
            tags           = COALESCE($6, tags),
            workflow_nodes = COALESCE($7, workflow_nodes),
            updated_at     = $8
        WHERE id = $1
        RETURNING id, name, description, status, category, tags, created_by,
                  workflow_nodes, runs_count, success_count, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&patch.name)
    .bind(&patch.description)
    .bind(&patch.status)
    .bind(&patch.category)
    .bind(&patch.tags)
    .bind(&patch.workflow_nodes)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Permanently delete an automation by its primary key.
///
/// Returns `DbError::NotFound` if no row was deleted.
pub async fn delete_automation(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM automations WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
