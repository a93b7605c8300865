// src/db/unit_repo.rs

use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::unit::{Unit, UnitStatus, UnitTenant, UpdateUnitPayload},
};
use chrono::NaiveDate;

#[derive(Clone)]
pub struct UnitRepository {
    pool: PgPool,
}

impl UnitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // O insert participa da transação que também incrementa total_units
    pub async fn create(
        &self,
        executor: impl PgExecutor<'_>,
        property_id: Uuid,
        unit_number: &str,
        bedrooms: Option<i32>,
        bathrooms: Option<i32>,
        rent_amount: Option<Decimal>,
    ) -> Result<Unit, AppError> {
        sqlx::query_as::<_, Unit>(
            "INSERT INTO units (property_id, unit_number, bedrooms, bathrooms, rent_amount) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(property_id)
        .bind(unit_number)
        .bind(bedrooms)
        .bind(bathrooms)
        .bind(rent_amount)
        .fetch_one(executor)
        .await
        .map_err(map_unit_number_violation)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Unit>, AppError> {
        let unit = sqlx::query_as::<_, Unit>("SELECT * FROM units WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(unit)
    }

    pub async fn list_for_manager(
        &self,
        manager_id: Uuid,
        property_id: Option<Uuid>,
    ) -> Result<Vec<Unit>, AppError> {
        let rows = sqlx::query_as::<_, Unit>(
            "SELECT u.* FROM units u \
             JOIN properties p ON p.id = u.property_id \
             WHERE p.manager_id = $1 AND ($2::uuid IS NULL OR u.property_id = $2) \
             ORDER BY u.unit_number",
        )
        .bind(manager_id)
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_for_owner(
        &self,
        owner_id: Uuid,
        property_id: Option<Uuid>,
    ) -> Result<Vec<Unit>, AppError> {
        let rows = sqlx::query_as::<_, Unit>(
            "SELECT u.* FROM units u \
             JOIN property_owners po ON po.property_id = u.property_id \
             WHERE po.owner_id = $1 AND ($2::uuid IS NULL OR u.property_id = $2) \
             ORDER BY u.unit_number",
        )
        .bind(owner_id)
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Unidades onde o inquilino tem contrato ativo
    pub async fn list_for_tenant(
        &self,
        tenant_id: Uuid,
        property_id: Option<Uuid>,
    ) -> Result<Vec<Unit>, AppError> {
        let rows = sqlx::query_as::<_, Unit>(
            "SELECT u.* FROM units u \
             JOIN unit_tenants ut ON ut.unit_id = u.id AND ut.is_active \
             WHERE ut.tenant_id = $1 AND ($2::uuid IS NULL OR u.property_id = $2) \
             ORDER BY u.unit_number",
        )
        .bind(tenant_id)
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Pré-checagem de unicidade; `exclude` ignora a própria unidade num update
    pub async fn unit_number_exists(
        &self,
        property_id: Uuid,
        unit_number: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM units \
             WHERE property_id = $1 AND unit_number = $2 \
               AND ($3::uuid IS NULL OR id <> $3))",
        )
        .bind(property_id)
        .bind(unit_number)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn update_partial(
        &self,
        id: Uuid,
        patch: &UpdateUnitPayload,
    ) -> Result<Unit, AppError> {
        sqlx::query_as::<_, Unit>(
            "UPDATE units SET \
                unit_number = COALESCE($2, unit_number), \
                status = COALESCE($3, status), \
                bedrooms = COALESCE($4, bedrooms), \
                bathrooms = COALESCE($5, bathrooms), \
                rent_amount = COALESCE($6, rent_amount), \
                updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(patch.unit_number.as_deref())
        .bind(patch.status)
        .bind(patch.bedrooms)
        .bind(patch.bathrooms)
        .bind(patch.rent_amount)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unit_number_violation)
    }

    pub async fn delete(&self, executor: impl PgExecutor<'_>, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM units WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_status(
        &self,
        executor: impl PgExecutor<'_>,
        id: Uuid,
        status: UnitStatus,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE units SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(())
    }

    // --- Contratos (unit_tenants) ---

    pub async fn count_active_leases(&self, unit_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM unit_tenants WHERE unit_id = $1 AND is_active",
        )
        .bind(unit_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    // Contagem dentro da transação do removeTenant, depois do soft-delete
    pub async fn count_active_leases_tx(
        &self,
        executor: impl PgExecutor<'_>,
        unit_id: Uuid,
    ) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM unit_tenants WHERE unit_id = $1 AND is_active",
        )
        .bind(unit_id)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    pub async fn has_active_lease(&self, unit_id: Uuid, tenant_id: Uuid) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM unit_tenants \
             WHERE unit_id = $1 AND tenant_id = $2 AND is_active)",
        )
        .bind(unit_id)
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn insert_lease(
        &self,
        executor: impl PgExecutor<'_>,
        unit_id: Uuid,
        tenant_id: Uuid,
        lease_start: NaiveDate,
        lease_end: NaiveDate,
        rent_amount: Decimal,
    ) -> Result<UnitTenant, AppError> {
        sqlx::query_as::<_, UnitTenant>(
            "INSERT INTO unit_tenants (unit_id, tenant_id, lease_start, lease_end, rent_amount) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(unit_id)
        .bind(tenant_id)
        .bind(lease_start)
        .bind(lease_end)
        .bind(rent_amount)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Índice único parcial: no máximo um contrato ativo por par
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict("Tenant already has an active lease on this unit");
                }
            }
            AppError::DatabaseError(e)
        })
    }

    // Soft-delete: a linha permanece com is_active = false
    pub async fn deactivate_lease(
        &self,
        executor: impl PgExecutor<'_>,
        unit_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE unit_tenants SET is_active = false \
             WHERE unit_id = $1 AND tenant_id = $2 AND is_active",
        )
        .bind(unit_id)
        .bind(tenant_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}

fn map_unit_number_violation(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::conflict("Unit number already exists for this property");
        }
    }
    AppError::DatabaseError(e)
}
