// src/services/unit_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{NotificationRepository, PropertyRepository, UnitRepository, UserRepository},
    models::{
        auth::{User, UserRole},
        notification::NotificationKind,
        unit::{Unit, UnitStatus, UnitTenant, UpdateUnitPayload},
    },
    services::access::{AccessService, ResourceScope},
};

// Depois de encerrar um contrato, a unidade só volta a AVAILABLE quando não
// resta nenhum contrato ativo.
pub fn status_after_lease_removal(remaining_active: i64) -> Option<UnitStatus> {
    (remaining_active == 0).then_some(UnitStatus::Available)
}

// Duplicata de numeração dentro do imóvel. Na atualização, manter o próprio
// número não conta como duplicata.
pub fn number_conflicts(new_number: &str, current: Option<&str>, already_taken: bool) -> bool {
    if current == Some(new_number) {
        return false;
    }
    already_taken
}

#[derive(Clone)]
pub struct UnitService {
    unit_repo: UnitRepository,
    property_repo: PropertyRepository,
    user_repo: UserRepository,
    notification_repo: NotificationRepository,
    access: AccessService,
    pool: PgPool,
}

impl UnitService {
    pub fn new(
        unit_repo: UnitRepository,
        property_repo: PropertyRepository,
        user_repo: UserRepository,
        notification_repo: NotificationRepository,
        access: AccessService,
        pool: PgPool,
    ) -> Self {
        Self { unit_repo, property_repo, user_repo, notification_repo, access, pool }
    }

    pub async fn list_for(
        &self,
        user: &User,
        property_id: Option<Uuid>,
    ) -> Result<Vec<Unit>, AppError> {
        match user.role {
            UserRole::PropertyManager => self.unit_repo.list_for_manager(user.id, property_id).await,
            UserRole::Owner => self.unit_repo.list_for_owner(user.id, property_id).await,
            UserRole::Tenant => self.unit_repo.list_for_tenant(user.id, property_id).await,
            _ => Ok(Vec::new()),
        }
    }

    pub async fn create(
        &self,
        user: &User,
        property_id: Uuid,
        unit_number: &str,
        bedrooms: Option<i32>,
        bathrooms: Option<i32>,
        rent_amount: Option<Decimal>,
    ) -> Result<Unit, AppError> {
        let property = self.find_managed_property(user, property_id).await?;

        // Pré-checagem para a mensagem amigável; a constraint UNIQUE cobre a
        // janela de corrida entre a checagem e o insert.
        let taken = self.unit_repo.unit_number_exists(property.id, unit_number, None).await?;
        if number_conflicts(unit_number, None, taken) {
            return Err(AppError::conflict("Unit number already exists for this property"));
        }

        // Insert + contador na MESMA transação
        let mut tx = self.pool.begin().await?;
        let unit = self
            .unit_repo
            .create(&mut *tx, property.id, unit_number, bedrooms, bathrooms, rent_amount)
            .await?;
        self.property_repo.adjust_total_units(&mut *tx, property.id, 1).await?;
        tx.commit().await?;

        Ok(unit)
    }

    pub async fn get(&self, user: &User, id: Uuid) -> Result<Unit, AppError> {
        let unit = self
            .unit_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Unit"))?;

        self.access
            .ensure(user, &ResourceScope::from(&unit), "You do not have access to this unit")
            .await?;
        Ok(unit)
    }

    pub async fn update(
        &self,
        user: &User,
        id: Uuid,
        patch: &UpdateUnitPayload,
    ) -> Result<Unit, AppError> {
        let unit = self.find_managed_unit(user, id).await?;

        // Reconfere a unicidade, ignorando a própria unidade
        if let Some(new_number) = &patch.unit_number {
            let taken = self
                .unit_repo
                .unit_number_exists(unit.property_id, new_number, Some(unit.id))
                .await?;
            if number_conflicts(new_number, Some(&unit.unit_number), taken) {
                return Err(AppError::conflict("Unit number already exists for this property"));
            }
        }

        self.unit_repo.update_partial(unit.id, patch).await
    }

    pub async fn delete(&self, user: &User, id: Uuid) -> Result<(), AppError> {
        let unit = self.find_managed_unit(user, id).await?;

        if self.unit_repo.count_active_leases(unit.id).await? > 0 {
            return Err(AppError::conflict("Cannot delete a unit with an active lease"));
        }

        // Delete + contador na MESMA transação
        let mut tx = self.pool.begin().await?;
        self.unit_repo.delete(&mut *tx, unit.id).await?;
        self.property_repo.adjust_total_units(&mut *tx, unit.property_id, -1).await?;
        tx.commit().await?;

        Ok(())
    }

    pub async fn assign_tenant(
        &self,
        user: &User,
        unit_id: Uuid,
        tenant_id: Uuid,
        lease_start: NaiveDate,
        lease_end: NaiveDate,
        rent_amount: Decimal,
    ) -> Result<UnitTenant, AppError> {
        let unit = self.find_managed_unit(user, unit_id).await?;

        let tenant = self
            .user_repo
            .find_by_id(tenant_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        if tenant.role != UserRole::Tenant {
            return Err(AppError::conflict("Target user must have the TENANT role"));
        }

        if lease_end <= lease_start {
            return Err(AppError::conflict("Lease end date must be after the start date"));
        }

        if self.unit_repo.has_active_lease(unit.id, tenant.id).await? {
            return Err(AppError::conflict("Tenant already has an active lease on this unit"));
        }

        // Contrato + status da unidade + aviso ao inquilino, tudo junto
        let mut tx = self.pool.begin().await?;
        let lease = self
            .unit_repo
            .insert_lease(&mut *tx, unit.id, tenant.id, lease_start, lease_end, rent_amount)
            .await?;
        self.unit_repo.set_status(&mut *tx, unit.id, UnitStatus::Occupied).await?;
        self.notification_repo
            .insert(
                &mut *tx,
                tenant.id,
                NotificationKind::LeaseAssigned,
                "New lease",
                &format!("You have been assigned to unit {}", unit.unit_number),
                Some("unit"),
                Some(unit.id),
            )
            .await?;
        tx.commit().await?;

        Ok(lease)
    }

    pub async fn remove_tenant(
        &self,
        user: &User,
        unit_id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Unit, AppError> {
        let unit = self.find_managed_unit(user, unit_id).await?;

        let mut tx = self.pool.begin().await?;

        let removed = self.unit_repo.deactivate_lease(&mut *tx, unit.id, tenant_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Lease"));
        }

        // AVAILABLE apenas quando não resta contrato ativo
        let remaining = self.unit_repo.count_active_leases_tx(&mut *tx, unit.id).await?;
        if let Some(status) = status_after_lease_removal(remaining) {
            self.unit_repo.set_status(&mut *tx, unit.id, status).await?;
        }

        self.notification_repo
            .insert(
                &mut *tx,
                tenant_id,
                NotificationKind::LeaseEnded,
                "Lease ended",
                &format!("Your lease on unit {} has ended", unit.unit_number),
                Some("unit"),
                Some(unit.id),
            )
            .await?;

        tx.commit().await?;

        self.unit_repo
            .find_by_id(unit.id)
            .await?
            .ok_or(AppError::NotFound("Unit"))
    }

    async fn find_managed_property(
        &self,
        user: &User,
        property_id: Uuid,
    ) -> Result<crate::models::property::Property, AppError> {
        let property = self
            .property_repo
            .find_by_id(property_id)
            .await?
            .ok_or(AppError::NotFound("Property"))?;
        if property.manager_id != user.id {
            return Err(AppError::forbidden("Only the property manager can manage its units"));
        }
        Ok(property)
    }

    async fn find_managed_unit(&self, user: &User, unit_id: Uuid) -> Result<Unit, AppError> {
        let unit = self
            .unit_repo
            .find_by_id(unit_id)
            .await?
            .ok_or(AppError::NotFound("Unit"))?;
        // Reaproveita a checagem de gestor via imóvel pai
        self.find_managed_property(user, unit.property_id).await?;
        Ok(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_frees_up_only_when_no_active_lease_remains() {
        assert_eq!(status_after_lease_removal(0), Some(UnitStatus::Available));
        assert_eq!(status_after_lease_removal(1), None);
        assert_eq!(status_after_lease_removal(3), None);
    }

    #[test]
    fn duplicate_unit_numbers_conflict_within_a_property() {
        // Criação: outra unidade já usa o número
        assert!(number_conflicts("101", None, true));
        assert!(!number_conflicts("101", None, false));
    }

    #[test]
    fn keeping_the_same_number_on_update_is_not_a_conflict() {
        assert!(!number_conflicts("101", Some("101"), true));
        // Trocar para um número já ocupado continua bloqueado
        assert!(number_conflicts("102", Some("101"), true));
        assert!(!number_conflicts("102", Some("101"), false));
    }
}
