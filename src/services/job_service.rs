// src/services/job_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{JobRepository, NotificationRepository, PropertyRepository, ServiceRequestRepository},
    models::{
        auth::{User, UserRole},
        job::{Job, JobPriority, JobStatus, UpdateJobPayload},
        notification::NotificationKind,
        property::Property,
        service_request::RequestStatus,
    },
    services::access::{AccessService, ResourceScope},
};

// Status inicial derivado da presença de um técnico designado
pub fn derived_status(has_assignee: bool) -> JobStatus {
    if has_assignee {
        JobStatus::Assigned
    } else {
        JobStatus::Open
    }
}

// COMPLETED é terminal para exclusão: o job concluído fica como histórico
pub fn deletion_blocked(status: JobStatus) -> bool {
    status == JobStatus::Completed
}

// Carimba completed_date na primeira vez que o status vira COMPLETED
pub fn completion_stamp(
    new_status: Option<JobStatus>,
    existing: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    match (new_status, existing) {
        (Some(JobStatus::Completed), None) => Some(Utc::now()),
        _ => None,
    }
}

#[derive(Clone)]
pub struct JobService {
    job_repo: JobRepository,
    property_repo: PropertyRepository,
    service_request_repo: ServiceRequestRepository,
    notification_repo: NotificationRepository,
    access: AccessService,
    pool: PgPool,
}

impl JobService {
    pub fn new(
        job_repo: JobRepository,
        property_repo: PropertyRepository,
        service_request_repo: ServiceRequestRepository,
        notification_repo: NotificationRepository,
        access: AccessService,
        pool: PgPool,
    ) -> Self {
        Self { job_repo, property_repo, service_request_repo, notification_repo, access, pool }
    }

    pub async fn list_for(&self, user: &User) -> Result<Vec<Job>, AppError> {
        match user.role {
            UserRole::PropertyManager => self.job_repo.list_for_manager(user.id).await,
            UserRole::Owner => self.job_repo.list_for_owner(user.id).await,
            UserRole::Tenant => self.job_repo.list_for_tenant(user.id).await,
            UserRole::Technician => self.job_repo.list_for_technician(user.id).await,
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
        service_request_id: Option<Uuid>,
        title: &str,
        description: Option<&str>,
        priority: JobPriority,
        scheduled_date: Option<DateTime<Utc>>,
        estimated_cost: Option<Decimal>,
    ) -> Result<Job, AppError> {
        let property = self.find_managed_property(user, property_id).await?;

        // Se o job nasce de um pedido de serviço, valida o pedido antes
        let linked_request = match service_request_id {
            Some(sr_id) => {
                let request = self
                    .service_request_repo
                    .find_by_id(sr_id)
                    .await?
                    .ok_or(AppError::NotFound("Service request"))?;
                if request.property_id != property.id {
                    return Err(AppError::conflict("Service request belongs to another property"));
                }
                if request.status != RequestStatus::Pending {
                    return Err(AppError::conflict("Request has already been converted to a job"));
                }
                Some(request)
            }
            None => None,
        };

        let status = derived_status(assigned_to_id.is_some());

        // Job + virada do pedido + avisos: uma transação só. Nada de aviso
        // sem escrita primária, nem escrita primária sem aviso.
        let mut tx = self.pool.begin().await?;

        let job = self
            .job_repo
            .create(
                &mut *tx,
                property.id,
                unit_id,
                assigned_to_id,
                service_request_id,
                user.id,
                title,
                description,
                status,
                priority,
                scheduled_date,
                estimated_cost,
            )
            .await?;

        if let Some(request) = &linked_request {
            self.service_request_repo
                .set_status(&mut *tx, request.id, RequestStatus::ConvertedToJob)
                .await?;

            // Avisa quem abriu o pedido
            self.notification_repo
                .insert(
                    &mut *tx,
                    request.requested_by_id,
                    NotificationKind::RequestConverted,
                    "Service request converted",
                    &format!("Your service request '{}' became a job", request.title),
                    Some("job"),
                    Some(job.id),
                )
                .await?;
        }

        if let Some(tech_id) = assigned_to_id {
            self.notification_repo
                .insert(
                    &mut *tx,
                    tech_id,
                    NotificationKind::JobAssigned,
                    "New job assigned",
                    &format!("You have been assigned to job '{}'", job.title),
                    Some("job"),
                    Some(job.id),
                )
                .await?;
        }

        tx.commit().await?;
        Ok(job)
    }

    // Conversão explícita de um pedido em job (POST /convert-to-job)
    pub async fn create_from_request(
        &self,
        user: &User,
        request_id: Uuid,
        assigned_to_id: Option<Uuid>,
        scheduled_date: Option<DateTime<Utc>>,
        estimated_cost: Option<Decimal>,
    ) -> Result<Job, AppError> {
        let request = self
            .service_request_repo
            .find_by_id(request_id)
            .await?
            .ok_or(AppError::NotFound("Service request"))?;

        self.create(
            user,
            request.property_id,
            request.unit_id,
            assigned_to_id,
            Some(request.id),
            &request.title,
            request.description.as_deref(),
            request.priority,
            scheduled_date,
            estimated_cost,
        )
        .await
    }

    pub async fn get(&self, user: &User, id: Uuid) -> Result<Job, AppError> {
        let job = self
            .job_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Job"))?;

        self.access
            .ensure(user, &ResourceScope::from(&job), "You do not have access to this job")
            .await?;
        Ok(job)
    }

    pub async fn update(
        &self,
        user: &User,
        id: Uuid,
        patch: &UpdateJobPayload,
    ) -> Result<Job, AppError> {
        let job = self
            .job_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Job"))?;
        let property = self
            .property_repo
            .find_by_id(job.property_id)
            .await?
            .ok_or(AppError::NotFound("Property"))?;

        let is_manager = property.manager_id == user.id;
        if !is_manager {
            // Técnico designado: conjunto restrito de campos
            let is_assigned_tech =
                user.role == UserRole::Technician && job.assigned_to_id == Some(user.id);
            if !is_assigned_tech {
                return Err(AppError::forbidden("You do not have access to this job"));
            }
            if patch.touches_manager_only_fields() {
                return Err(AppError::forbidden(
                    "Technicians may only update status, notes, photos and actual cost",
                ));
            }
        }

        let completed_date = completion_stamp(patch.status, job.completed_date);
        let newly_completed =
            patch.status == Some(JobStatus::Completed) && job.status != JobStatus::Completed;
        let new_assignee = patch
            .assigned_to_id
            .filter(|tech_id| job.assigned_to_id != Some(*tech_id));

        let mut tx = self.pool.begin().await?;

        let updated = self
            .job_repo
            .update_partial(&mut *tx, job.id, patch, completed_date)
            .await?;

        if let Some(tech_id) = new_assignee {
            self.notification_repo
                .insert(
                    &mut *tx,
                    tech_id,
                    NotificationKind::JobAssigned,
                    "New job assigned",
                    &format!("You have been assigned to job '{}'", updated.title),
                    Some("job"),
                    Some(updated.id),
                )
                .await?;
        }

        // Conclusão avisa o gestor, a menos que ele mesmo tenha concluído
        if newly_completed && user.id != property.manager_id {
            self.notification_repo
                .insert(
                    &mut *tx,
                    property.manager_id,
                    NotificationKind::JobCompleted,
                    "Job completed",
                    &format!("Job '{}' was marked as completed", updated.title),
                    Some("job"),
                    Some(updated.id),
                )
                .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete(&self, user: &User, id: Uuid) -> Result<(), AppError> {
        let job = self
            .job_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Job"))?;
        self.find_managed_property(user, job.property_id).await?;

        if deletion_blocked(job.status) {
            return Err(AppError::conflict("Cannot delete a completed job"));
        }

        self.job_repo.delete(job.id).await?;
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
            return Err(AppError::forbidden("Only the property manager can manage jobs here"));
        }
        Ok(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_derives_from_the_presence_of_an_assignee() {
        assert_eq!(derived_status(true), JobStatus::Assigned);
        assert_eq!(derived_status(false), JobStatus::Open);
    }

    #[test]
    fn only_completed_jobs_are_protected_from_deletion() {
        assert!(deletion_blocked(JobStatus::Completed));
        assert!(!deletion_blocked(JobStatus::Open));
        assert!(!deletion_blocked(JobStatus::Assigned));
        assert!(!deletion_blocked(JobStatus::InProgress));
        assert!(!deletion_blocked(JobStatus::Cancelled));
    }

    #[test]
    fn completion_stamp_only_fires_on_the_first_completion() {
        assert!(completion_stamp(Some(JobStatus::Completed), None).is_some());
        // Já havia carimbo: não sobrescreve
        assert!(completion_stamp(Some(JobStatus::Completed), Some(Utc::now())).is_none());
        // Outros status não carimbam
        assert!(completion_stamp(Some(JobStatus::InProgress), None).is_none());
        assert!(completion_stamp(None, None).is_none());
    }

    #[test]
    fn technician_field_guard_spots_manager_only_fields() {
        let allowed = UpdateJobPayload {
            status: Some(JobStatus::InProgress),
            notes: Some("replacing valve".into()),
            photos: Some(vec!["before.jpg".into()]),
            actual_cost: Some(Decimal::new(12050, 2)),
            ..Default::default()
        };
        assert!(!allowed.touches_manager_only_fields());

        let sneaky = UpdateJobPayload {
            status: Some(JobStatus::Completed),
            assigned_to_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(sneaky.touches_manager_only_fields());

        let retitle = UpdateJobPayload { title: Some("new title".into()), ..Default::default() };
        assert!(retitle.touches_manager_only_fields());
    }
}
