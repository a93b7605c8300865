// src/services/property_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PropertyRepository, UserRepository},
    models::{
        auth::{User, UserRole},
        property::{Property, PropertyOwner, UpdatePropertyPayload},
    },
    services::{
        access::{AccessService, ResourceScope},
        subscription_service::SubscriptionService,
    },
};

#[derive(Clone)]
pub struct PropertyService {
    property_repo: PropertyRepository,
    user_repo: UserRepository,
    access: AccessService,
    subscriptions: SubscriptionService,
}

impl PropertyService {
    pub fn new(
        property_repo: PropertyRepository,
        user_repo: UserRepository,
        access: AccessService,
        subscriptions: SubscriptionService,
    ) -> Self {
        Self { property_repo, user_repo, access, subscriptions }
    }

    // Listagem por papel. Técnicos não enxergam imóveis (a lista não é
    // derivada dos jobs deles).
    pub async fn list_for(&self, user: &User) -> Result<Vec<Property>, AppError> {
        match user.role {
            UserRole::PropertyManager => self.property_repo.list_for_manager(user.id).await,
            UserRole::Owner => self.property_repo.list_for_owner(user.id).await,
            UserRole::Tenant => self.property_repo.list_for_tenant(user.id).await,
            _ => Ok(Vec::new()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        user: &User,
        name: &str,
        address: &str,
        city: &str,
        state: &str,
        zip_code: &str,
        property_type: &str,
    ) -> Result<Property, AppError> {
        if user.role != UserRole::PropertyManager {
            return Err(AppError::forbidden("Only property managers can create properties"));
        }

        // Portão de assinatura/trial (§ cobrança)
        self.subscriptions.ensure_active(user).await?;

        self.property_repo
            .create(user.id, name, address, city, state, zip_code, property_type)
            .await
    }

    pub async fn get(&self, user: &User, id: Uuid) -> Result<Property, AppError> {
        let property = self
            .property_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Property"))?;

        self.access
            .ensure(user, &ResourceScope::from(&property), "You do not have access to this property")
            .await?;
        Ok(property)
    }

    pub async fn update(
        &self,
        user: &User,
        id: Uuid,
        patch: &UpdatePropertyPayload,
    ) -> Result<Property, AppError> {
        let property = self.find_managed(user, id).await?;
        self.property_repo.update_partial(property.id, patch).await
    }

    pub async fn delete(&self, user: &User, id: Uuid) -> Result<(), AppError> {
        let property = self.find_managed(user, id).await?;

        let active_leases = self.property_repo.count_active_leases(property.id).await?;
        if active_leases > 0 {
            return Err(AppError::conflict("Cannot delete a property with active tenants"));
        }

        self.property_repo.delete(property.id).await?;
        Ok(())
    }

    pub async fn assign_owner(
        &self,
        user: &User,
        property_id: Uuid,
        owner_id: Uuid,
        ownership_percentage: Option<Decimal>,
    ) -> Result<PropertyOwner, AppError> {
        let property = self.find_managed(user, property_id).await?;

        let target = self
            .user_repo
            .find_by_id(owner_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        if target.role != UserRole::Owner {
            return Err(AppError::conflict("Target user must have the OWNER role"));
        }

        let percentage = ownership_percentage.unwrap_or(Decimal::ONE_HUNDRED);
        if percentage <= Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
            return Err(AppError::conflict("Ownership percentage must be between 0 and 100"));
        }

        // Duplicata vira 400 pela UNIQUE (property_id, owner_id)
        self.property_repo.add_owner(property.id, owner_id, percentage).await
    }

    pub async fn remove_owner(
        &self,
        user: &User,
        property_id: Uuid,
        owner_id: Uuid,
    ) -> Result<(), AppError> {
        let property = self.find_managed(user, property_id).await?;

        let removed = self.property_repo.remove_owner(property.id, owner_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound("Owner assignment"));
        }
        Ok(())
    }

    // Mutações de imóvel são sempre do gestor dono do registro
    async fn find_managed(&self, user: &User, id: Uuid) -> Result<Property, AppError> {
        let property = self
            .property_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Property"))?;

        if property.manager_id != user.id {
            return Err(AppError::forbidden("Only the property manager can modify this property"));
        }
        Ok(property)
    }
}
