// src/services/inspection_service.rs

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InspectionRepository, NotificationRepository, PropertyRepository},
    models::{
        auth::{User, UserRole},
        inspection::{Inspection, InspectionStatus, UpdateInspectionPayload},
        notification::NotificationKind,
        property::Property,
    },
    services::access::{AccessService, ResourceScope},
};

// Janela fixa de duas horas em torno do horário pedido: outra vistoria
// SCHEDULED/IN_PROGRESS na mesma unidade dentro dela bloqueia o agendamento.
const OVERLAP_HOURS: i64 = 2;

pub fn conflict_window(requested: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let half = Duration::hours(OVERLAP_HOURS);
    (requested - half, requested + half)
}

pub fn completion_stamp(
    new_status: Option<InspectionStatus>,
    existing: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    match (new_status, existing) {
        (Some(InspectionStatus::Completed), None) => Some(Utc::now()),
        _ => None,
    }
}

#[derive(Clone)]
pub struct InspectionService {
    inspection_repo: InspectionRepository,
    property_repo: PropertyRepository,
    notification_repo: NotificationRepository,
    access: AccessService,
    pool: PgPool,
}

impl InspectionService {
    pub fn new(
        inspection_repo: InspectionRepository,
        property_repo: PropertyRepository,
        notification_repo: NotificationRepository,
        access: AccessService,
        pool: PgPool,
    ) -> Self {
        Self { inspection_repo, property_repo, notification_repo, access, pool }
    }

    pub async fn list_for(&self, user: &User) -> Result<Vec<Inspection>, AppError> {
        match user.role {
            UserRole::PropertyManager => self.inspection_repo.list_for_manager(user.id).await,
            UserRole::Owner => self.inspection_repo.list_for_owner(user.id).await,
            UserRole::Tenant => self.inspection_repo.list_for_tenant(user.id).await,
            UserRole::Technician => self.inspection_repo.list_for_technician(user.id).await,
            _ => Ok(Vec::new()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        user: &User,
        property_id: Uuid,
        unit_id: Option<Uuid>,
        assigned_to_id: Option<Uuid>,
        title: &str,
        scheduled_date: DateTime<Utc>,
    ) -> Result<Inspection, AppError> {
        let property = self.find_managed_property(user, property_id).await?;

        if let Some(unit_id) = unit_id {
            self.ensure_slot_free(unit_id, scheduled_date, None).await?;
        }

        let mut tx = self.pool.begin().await?;
        let inspection = self
            .inspection_repo
            .create(&mut *tx, property.id, unit_id, assigned_to_id, user.id, title, scheduled_date)
            .await?;

        if let Some(tech_id) = assigned_to_id {
            self.notification_repo
                .insert(
                    &mut *tx,
                    tech_id,
                    NotificationKind::InspectionAssigned,
                    "New inspection assigned",
                    &format!("You have been assigned to inspection '{}'", inspection.title),
                    Some("inspection"),
                    Some(inspection.id),
                )
                .await?;
        }

        tx.commit().await?;
        Ok(inspection)
    }

    pub async fn get(&self, user: &User, id: Uuid) -> Result<Inspection, AppError> {
        let inspection = self
            .inspection_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Inspection"))?;

        self.access
            .ensure(
                user,
                &ResourceScope::from(&inspection),
                "You do not have access to this inspection",
            )
            .await?;
        Ok(inspection)
    }

    pub async fn update(
        &self,
        user: &User,
        id: Uuid,
        patch: &UpdateInspectionPayload,
    ) -> Result<Inspection, AppError> {
        let inspection = self
            .inspection_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Inspection"))?;
        let property = self
            .property_repo
            .find_by_id(inspection.property_id)
            .await?
            .ok_or(AppError::NotFound("Property"))?;

        let is_manager = property.manager_id == user.id;
        if !is_manager {
            let is_assigned_tech =
                user.role == UserRole::Technician && inspection.assigned_to_id == Some(user.id);
            if !is_assigned_tech {
                return Err(AppError::forbidden("You do not have access to this inspection"));
            }
            if patch.touches_manager_only_fields() {
                return Err(AppError::forbidden(
                    "Technicians may only update status, findings, severity and photos",
                ));
            }
        }

        // Reagendamento pelo gestor passa pela mesma janela de conflito
        if let (Some(new_date), Some(unit_id)) = (patch.scheduled_date, inspection.unit_id) {
            self.ensure_slot_free(unit_id, new_date, Some(inspection.id)).await?;
        }

        let completed_date = completion_stamp(patch.status, inspection.completed_date);
        let newly_completed = patch.status == Some(InspectionStatus::Completed)
            && inspection.status != InspectionStatus::Completed;

        let mut tx = self.pool.begin().await?;

        let updated = self
            .inspection_repo
            .update_partial(&mut *tx, inspection.id, patch, completed_date)
            .await?;

        if let Some(tech_id) = patch
            .assigned_to_id
            .filter(|tech_id| inspection.assigned_to_id != Some(*tech_id))
        {
            self.notification_repo
                .insert(
                    &mut *tx,
                    tech_id,
                    NotificationKind::InspectionAssigned,
                    "New inspection assigned",
                    &format!("You have been assigned to inspection '{}'", updated.title),
                    Some("inspection"),
                    Some(updated.id),
                )
                .await?;
        }

        if newly_completed && user.id != property.manager_id {
            self.notification_repo
                .insert(
                    &mut *tx,
                    property.manager_id,
                    NotificationKind::InspectionCompleted,
                    "Inspection completed",
                    &format!("Inspection '{}' was completed", updated.title),
                    Some("inspection"),
                    Some(updated.id),
                )
                .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    // Conclusão formal pelo técnico designado: exige findings não-vazias
    pub async fn complete(
        &self,
        user: &User,
        id: Uuid,
        findings: &str,
        severity: Option<i16>,
        photos: Option<&Vec<String>>,
    ) -> Result<Inspection, AppError> {
        let inspection = self
            .inspection_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Inspection"))?;

        let is_assigned_tech =
            user.role == UserRole::Technician && inspection.assigned_to_id == Some(user.id);
        if !is_assigned_tech {
            return Err(AppError::forbidden(
                "Only the assigned technician can complete this inspection",
            ));
        }

        if findings.trim().is_empty() {
            return Err(AppError::conflict("Findings are required to complete an inspection"));
        }

        if let Some(sev) = severity {
            if !(0..=4).contains(&sev) {
                return Err(AppError::conflict("Severity must be between 0 and 4"));
            }
        }

        let property = self
            .property_repo
            .find_by_id(inspection.property_id)
            .await?
            .ok_or(AppError::NotFound("Property"))?;

        let mut tx = self.pool.begin().await?;

        let completed = self
            .inspection_repo
            .complete(&mut *tx, inspection.id, user.id, findings, severity, photos)
            .await?;

        self.notification_repo
            .insert(
                &mut *tx,
                property.manager_id,
                NotificationKind::InspectionCompleted,
                "Inspection completed",
                &format!("Inspection '{}' was completed", completed.title),
                Some("inspection"),
                Some(completed.id),
            )
            .await?;

        tx.commit().await?;
        Ok(completed)
    }

    pub async fn delete(&self, user: &User, id: Uuid) -> Result<(), AppError> {
        let inspection = self
            .inspection_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Inspection"))?;
        self.find_managed_property(user, inspection.property_id).await?;

        if self.inspection_repo.has_report(inspection.id).await? {
            return Err(AppError::conflict("Cannot delete an inspection that has a report"));
        }

        self.inspection_repo.delete(inspection.id).await?;
        Ok(())
    }

    async fn ensure_slot_free(
        &self,
        unit_id: Uuid,
        requested: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Result<(), AppError> {
        let (from, to) = conflict_window(requested);
        if self.inspection_repo.has_conflicting(unit_id, from, to, exclude).await? {
            return Err(AppError::conflict(
                "Another inspection is already scheduled for this unit in this time window",
            ));
        }
        Ok(())
    }

    async fn find_managed_property(
        &self,
        user: &User,
        property_id: Uuid,
    ) -> Result<Property, AppError> {
        let property = self
            .property_repo
            .find_by_id(property_id)
            .await?
            .ok_or(AppError::NotFound("Property"))?;
        if property.manager_id != user.id {
            return Err(AppError::forbidden(
                "Only the property manager can manage inspections here",
            ));
        }
        Ok(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_spans_two_hours_around_the_requested_slot() {
        let t = Utc.with_ymd_and_hms(2026, 3, 10, 14, 0, 0).unwrap();
        let (from, to) = conflict_window(t);
        assert_eq!(from, t - Duration::hours(2));
        assert_eq!(to, t + Duration::hours(2));

        // Uma vistoria existente uma hora antes/depois cai dentro da janela;
        // três horas depois fica fora dela.
        let one_hour_later = t + Duration::hours(1);
        assert!(one_hour_later > from && one_hour_later < to);
        let three_hours_later = t + Duration::hours(3);
        assert!(!(three_hours_later > from && three_hours_later < to));
    }

    #[test]
    fn completion_stamp_is_idempotent() {
        assert!(completion_stamp(Some(InspectionStatus::Completed), None).is_some());
        assert!(completion_stamp(Some(InspectionStatus::Completed), Some(Utc::now())).is_none());
        assert!(completion_stamp(Some(InspectionStatus::InProgress), None).is_none());
    }
}
