// src/db/notification_repo.rs

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::notification::{Notification, NotificationKind},
};

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Sempre chamado com o executor da transação da mutação primária: ou a
    // escrita e o aviso entram juntos, ou nenhum dos dois entra.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        &self,
        executor: impl PgExecutor<'_>,
        user_id: Uuid,
        kind: NotificationKind,
        title: &str,
        message: &str,
        entity_type: Option<&str>,
        entity_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO notifications (user_id, kind, title, message, entity_type, entity_id) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user_id)
        .bind(kind)
        .bind(title)
        .bind(message)
        .bind(entity_type)
        .bind(entity_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, AppError> {
        let rows = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC LIMIT 100",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
