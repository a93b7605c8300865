// src/services/access.rs
//
// O predicado de autorização, um por sistema em vez de um por controller:
// uma tabela de regras (papel -> condição) sobre um descritor de recurso.
// Leitura pura: responde "pode ou não pode", nunca falha com "não".

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PropertyRepository, UnitRepository},
    models::{
        auth::{User, UserRole},
        inspection::Inspection,
        job::Job,
        property::Property,
        unit::Unit,
    },
};

// Descritor genérico: tudo o que a tabela de regras precisa saber sobre
// qualquer entidade (imóvel, unidade, job ou vistoria).
#[derive(Debug, Clone, Copy)]
pub struct ResourceScope {
    pub property_id: Uuid,
    pub unit_id: Option<Uuid>,
    pub assigned_to_id: Option<Uuid>,
}

impl From<&Property> for ResourceScope {
    fn from(p: &Property) -> Self {
        Self { property_id: p.id, unit_id: None, assigned_to_id: None }
    }
}

impl From<&Unit> for ResourceScope {
    fn from(u: &Unit) -> Self {
        Self { property_id: u.property_id, unit_id: Some(u.id), assigned_to_id: None }
    }
}

impl From<&Job> for ResourceScope {
    fn from(j: &Job) -> Self {
        Self { property_id: j.property_id, unit_id: j.unit_id, assigned_to_id: j.assigned_to_id }
    }
}

impl From<&Inspection> for ResourceScope {
    fn from(i: &Inspection) -> Self {
        Self { property_id: i.property_id, unit_id: i.unit_id, assigned_to_id: i.assigned_to_id }
    }
}

// Fatos buscados no banco, já resolvidos para o usuário em questão
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessFacts {
    pub manages_property: bool,
    pub owns_property: bool,
    pub has_active_lease: bool,
}

// A tabela de regras em si. Pura de propósito: testável sem banco.
pub fn decide(role: UserRole, user_id: Uuid, scope: &ResourceScope, facts: &AccessFacts) -> bool {
    match role {
        UserRole::PropertyManager => facts.manages_property,
        UserRole::Owner => facts.owns_property,
        UserRole::Tenant => scope.unit_id.is_some() && facts.has_active_lease,
        UserRole::Technician => scope.assigned_to_id == Some(user_id),
        // ADMIN inclusive: quem não está na tabela não passa
        _ => false,
    }
}

#[derive(Clone)]
pub struct AccessService {
    property_repo: PropertyRepository,
    unit_repo: UnitRepository,
}

impl AccessService {
    pub fn new(property_repo: PropertyRepository, unit_repo: UnitRepository) -> Self {
        Self { property_repo, unit_repo }
    }

    // Busca apenas o fato que o papel do usuário exige
    pub async fn can_access(&self, user: &User, scope: &ResourceScope) -> Result<bool, AppError> {
        let facts = match user.role {
            UserRole::PropertyManager => {
                let manages = self
                    .property_repo
                    .find_by_id(scope.property_id)
                    .await?
                    .map(|p| p.manager_id == user.id)
                    .unwrap_or(false);
                AccessFacts { manages_property: manages, ..Default::default() }
            }
            UserRole::Owner => {
                let owns = self.property_repo.is_owner(scope.property_id, user.id).await?;
                AccessFacts { owns_property: owns, ..Default::default() }
            }
            UserRole::Tenant => {
                let leased = match scope.unit_id {
                    Some(unit_id) => self.unit_repo.has_active_lease(unit_id, user.id).await?,
                    None => false,
                };
                AccessFacts { has_active_lease: leased, ..Default::default() }
            }
            _ => AccessFacts::default(),
        };

        Ok(decide(user.role, user.id, scope, &facts))
    }

    // Helper para a resposta 403 padrão
    pub async fn ensure(
        &self,
        user: &User,
        scope: &ResourceScope,
        denial: &str,
    ) -> Result<(), AppError> {
        if self.can_access(user, scope).await? {
            Ok(())
        } else {
            Err(AppError::forbidden(denial))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(unit: bool, assigned: Option<Uuid>) -> ResourceScope {
        ResourceScope {
            property_id: Uuid::new_v4(),
            unit_id: unit.then(Uuid::new_v4),
            assigned_to_id: assigned,
        }
    }

    #[test]
    fn manager_needs_the_managed_property_fact() {
        let me = Uuid::new_v4();
        let s = scope(false, None);
        let yes = AccessFacts { manages_property: true, ..Default::default() };
        assert!(decide(UserRole::PropertyManager, me, &s, &yes));
        assert!(!decide(UserRole::PropertyManager, me, &s, &AccessFacts::default()));
    }

    #[test]
    fn owner_needs_an_ownership_row() {
        let me = Uuid::new_v4();
        let s = scope(false, None);
        let yes = AccessFacts { owns_property: true, ..Default::default() };
        assert!(decide(UserRole::Owner, me, &s, &yes));
        assert!(!decide(UserRole::Owner, me, &s, &AccessFacts::default()));
    }

    #[test]
    fn tenant_needs_a_unit_and_an_active_lease() {
        let me = Uuid::new_v4();
        let leased = AccessFacts { has_active_lease: true, ..Default::default() };
        assert!(decide(UserRole::Tenant, me, &scope(true, None), &leased));
        // Sem unidade no escopo não há o que alugar
        assert!(!decide(UserRole::Tenant, me, &scope(false, None), &leased));
        assert!(!decide(UserRole::Tenant, me, &scope(true, None), &AccessFacts::default()));
    }

    #[test]
    fn technician_only_sees_what_is_assigned_to_them() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(decide(UserRole::Technician, me, &scope(true, Some(me)), &AccessFacts::default()));
        assert!(!decide(
            UserRole::Technician,
            me,
            &scope(true, Some(other)),
            &AccessFacts::default()
        ));
        assert!(!decide(UserRole::Technician, me, &scope(true, None), &AccessFacts::default()));
    }

    #[test]
    fn admin_is_not_in_the_rule_table() {
        let me = Uuid::new_v4();
        let all = AccessFacts {
            manages_property: true,
            owns_property: true,
            has_active_lease: true,
        };
        assert!(!decide(UserRole::Admin, me, &scope(true, Some(me)), &all));
    }
}
