// src/services/service_request_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PropertyRepository, ServiceRequestRepository, UnitRepository},
    models::{
        auth::{User, UserRole},
        job::JobPriority,
        service_request::{RequestStatus, ServiceRequest, UpdateServiceRequestPayload},
    },
};

#[derive(Clone)]
pub struct ServiceRequestService {
    service_request_repo: ServiceRequestRepository,
    property_repo: PropertyRepository,
    unit_repo: UnitRepository,
}

impl ServiceRequestService {
    pub fn new(
        service_request_repo: ServiceRequestRepository,
        property_repo: PropertyRepository,
        unit_repo: UnitRepository,
    ) -> Self {
        Self { service_request_repo, property_repo, unit_repo }
    }

    pub async fn list_for(&self, user: &User) -> Result<Vec<ServiceRequest>, AppError> {
        match user.role {
            UserRole::Tenant => self.service_request_repo.list_for_requester(user.id).await,
            UserRole::PropertyManager => self.service_request_repo.list_for_manager(user.id).await,
            UserRole::Owner => self.service_request_repo.list_for_owner(user.id).await,
            _ => Ok(Vec::new()),
        }
    }

    // Aberto pelo inquilino (com contrato ativo na unidade) ou pelo gestor
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        user: &User,
        property_id: Uuid,
        unit_id: Option<Uuid>,
        title: &str,
        description: Option<&str>,
        priority: JobPriority,
    ) -> Result<ServiceRequest, AppError> {
        match user.role {
            UserRole::Tenant => {
                let unit_id = unit_id.ok_or_else(|| {
                    AppError::conflict("Tenants must raise requests against their unit")
                })?;
                let unit = self
                    .unit_repo
                    .find_by_id(unit_id)
                    .await?
                    .ok_or(AppError::NotFound("Unit"))?;
                if unit.property_id != property_id {
                    return Err(AppError::conflict("Unit does not belong to this property"));
                }
                if !self.unit_repo.has_active_lease(unit.id, user.id).await? {
                    return Err(AppError::forbidden(
                        "You do not have an active lease on this unit",
                    ));
                }
            }
            UserRole::PropertyManager => {
                let property = self
                    .property_repo
                    .find_by_id(property_id)
                    .await?
                    .ok_or(AppError::NotFound("Property"))?;
                if property.manager_id != user.id {
                    return Err(AppError::forbidden("You do not manage this property"));
                }
            }
            _ => {
                return Err(AppError::forbidden(
                    "Only tenants and property managers can raise service requests",
                ));
            }
        }

        self.service_request_repo
            .create(property_id, unit_id, user.id, title, description, priority)
            .await
    }

    pub async fn get(&self, user: &User, id: Uuid) -> Result<ServiceRequest, AppError> {
        let request = self
            .service_request_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Service request"))?;

        // Quem abriu, o gestor do imóvel ou um proprietário
        if request.requested_by_id == user.id {
            return Ok(request);
        }
        let property = self
            .property_repo
            .find_by_id(request.property_id)
            .await?
            .ok_or(AppError::NotFound("Property"))?;
        if property.manager_id == user.id
            || self.property_repo.is_owner(property.id, user.id).await?
        {
            return Ok(request);
        }
        Err(AppError::forbidden("You do not have access to this service request"))
    }

    pub async fn update(
        &self,
        user: &User,
        id: Uuid,
        patch: &UpdateServiceRequestPayload,
    ) -> Result<ServiceRequest, AppError> {
        let request = self.find_managed(user, id).await?;
        self.service_request_repo.update_partial(request.id, patch).await
    }

    pub async fn delete(&self, user: &User, id: Uuid) -> Result<(), AppError> {
        let request = self.find_managed(user, id).await?;

        if request.status == RequestStatus::ConvertedToJob {
            return Err(AppError::conflict("Cannot delete a request that was converted to a job"));
        }

        self.service_request_repo.delete(request.id).await?;
        Ok(())
    }

    async fn find_managed(&self, user: &User, id: Uuid) -> Result<ServiceRequest, AppError> {
        let request = self
            .service_request_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Service request"))?;
        let property = self
            .property_repo
            .find_by_id(request.property_id)
            .await?
            .ok_or(AppError::NotFound("Property"))?;
        if property.manager_id != user.id {
            return Err(AppError::forbidden(
                "Only the property manager can modify this service request",
            ));
        }
        Ok(request)
    }
}
