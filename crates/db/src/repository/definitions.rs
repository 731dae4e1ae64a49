//! Definition registry queries.  Only active definitions are returned.

use sqlx::PgPool;

use crate::{
    models::{ActionDefinitionRow, TriggerDefinitionRow},
    DbError,
};

pub async fn list_active_triggers(pool: &PgPool) -> Result<Vec<TriggerDefinitionRow>, DbError> {
    let rows = sqlx::query_as::<_, TriggerDefinitionRow>(
        r#"
        SELECT id, name, display_name, description, event_name, event_schema,
               category, icon, is_active
        FROM trigger_definitions
        WHERE is_active
        ORDER BY category ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn list_active_actions(pool: &PgPool) -> Result<Vec<ActionDefinitionRow>, DbError> {
    let rows = sqlx::query_as::<_, ActionDefinitionRow>(
        r#"
        SELECT id, name, display_name, description, action_type, config_schema,
               category, icon, is_active
        FROM action_definitions
        WHERE is_active
        ORDER BY category ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
