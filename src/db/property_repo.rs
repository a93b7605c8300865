// src/db/property_repo.rs

use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::property::{Property, PropertyOwner, UpdatePropertyPayload},
};

#[derive(Clone)]
pub struct PropertyRepository {
    pool: PgPool,
}

impl PropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        manager_id: Uuid,
        name: &str,
        address: &str,
        city: &str,
        state: &str,
        zip_code: &str,
        property_type: &str,
    ) -> Result<Property, AppError> {
        let property = sqlx::query_as::<_, Property>(
            "INSERT INTO properties (manager_id, name, address, city, state, zip_code, property_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(manager_id)
        .bind(name)
        .bind(address)
        .bind(city)
        .bind(state)
        .bind(zip_code)
        .bind(property_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(property)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Property>, AppError> {
        let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(property)
    }

    // --- Listagens por papel (o escopo é resolvido direto no SQL) ---

    pub async fn list_for_manager(&self, manager_id: Uuid) -> Result<Vec<Property>, AppError> {
        let rows = sqlx::query_as::<_, Property>(
            "SELECT * FROM properties WHERE manager_id = $1 ORDER BY created_at DESC",
        )
        .bind(manager_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Property>, AppError> {
        let rows = sqlx::query_as::<_, Property>(
            "SELECT p.* FROM properties p \
             JOIN property_owners po ON po.property_id = p.id \
             WHERE po.owner_id = $1 ORDER BY p.created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Imóveis onde o inquilino tem alguma unidade com contrato ativo
    pub async fn list_for_tenant(&self, tenant_id: Uuid) -> Result<Vec<Property>, AppError> {
        let rows = sqlx::query_as::<_, Property>(
            "SELECT DISTINCT p.* FROM properties p \
             JOIN units u ON u.property_id = p.id \
             JOIN unit_tenants ut ON ut.unit_id = u.id AND ut.is_active \
             WHERE ut.tenant_id = $1",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Patch parcial: apenas os campos enviados mudam
    pub async fn update_partial(
        &self,
        id: Uuid,
        patch: &UpdatePropertyPayload,
    ) -> Result<Property, AppError> {
        let property = sqlx::query_as::<_, Property>(
            "UPDATE properties SET \
                name = COALESCE($2, name), \
                address = COALESCE($3, address), \
                city = COALESCE($4, city), \
                state = COALESCE($5, state), \
                zip_code = COALESCE($6, zip_code), \
                property_type = COALESCE($7, property_type), \
                updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.address.as_deref())
        .bind(patch.city.as_deref())
        .bind(patch.state.as_deref())
        .bind(patch.zip_code.as_deref())
        .bind(patch.property_type.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(property)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // Contratos ativos em qualquer unidade do imóvel (bloqueia o delete)
    pub async fn count_active_leases(&self, property_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM unit_tenants ut \
             JOIN units u ON u.id = ut.unit_id \
             WHERE u.property_id = $1 AND ut.is_active",
        )
        .bind(property_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn is_owner(&self, property_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM property_owners WHERE property_id = $1 AND owner_id = $2)",
        )
        .bind(property_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn add_owner(
        &self,
        property_id: Uuid,
        owner_id: Uuid,
        ownership_percentage: Decimal,
    ) -> Result<PropertyOwner, AppError> {
        sqlx::query_as::<_, PropertyOwner>(
            "INSERT INTO property_owners (property_id, owner_id, ownership_percentage) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(property_id)
        .bind(owner_id)
        .bind(ownership_percentage)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // A violação da UNIQUE (property_id, owner_id) vira um 400 traduzido
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict("User is already an owner of this property");
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn remove_owner(&self, property_id: Uuid, owner_id: Uuid) -> Result<u64, AppError> {
        let result =
            sqlx::query("DELETE FROM property_owners WHERE property_id = $1 AND owner_id = $2")
                .bind(property_id)
                .bind(owner_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    // Mantido na MESMA transação do create/delete de unidade
    pub async fn adjust_total_units(
        &self,
        executor: impl PgExecutor<'_>,
        property_id: Uuid,
        delta: i32,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE properties SET total_units = total_units + $2, updated_at = now() WHERE id = $1",
        )
        .bind(property_id)
        .bind(delta)
        .execute(executor)
        .await?;
        Ok(())
    }
}
