// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Properties ---
        handlers::properties::list_properties,
        handlers::properties::create_property,
        handlers::properties::get_property,
        handlers::properties::update_property,
        handlers::properties::delete_property,
        handlers::properties::assign_owner,
        handlers::properties::remove_owner,

        // --- Units ---
        handlers::units::list_units,
        handlers::units::create_unit,
        handlers::units::get_unit,
        handlers::units::update_unit,
        handlers::units::delete_unit,
        handlers::units::assign_tenant,
        handlers::units::remove_tenant,

        // --- Jobs ---
        handlers::jobs::list_jobs,
        handlers::jobs::create_job,
        handlers::jobs::get_job,
        handlers::jobs::update_job,
        handlers::jobs::delete_job,

        // --- Inspections ---
        handlers::inspections::list_inspections,
        handlers::inspections::create_inspection,
        handlers::inspections::get_inspection,
        handlers::inspections::update_inspection,
        handlers::inspections::complete_inspection,
        handlers::inspections::delete_inspection,

        // --- Service Requests ---
        handlers::service_requests::list_service_requests,
        handlers::service_requests::create_service_request,
        handlers::service_requests::get_service_request,
        handlers::service_requests::update_service_request,
        handlers::service_requests::delete_service_request,
        handlers::service_requests::convert_to_job,

        // --- Notifications ---
        handlers::notifications::list_notifications,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::SubscriptionStatus,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Properties ---
            models::property::Property,
            models::property::UpdatePropertyPayload,
            models::property::PropertyOwner,
            handlers::properties::CreatePropertyPayload,
            handlers::properties::AssignOwnerPayload,

            // --- Units ---
            models::unit::UnitStatus,
            models::unit::Unit,
            models::unit::UpdateUnitPayload,
            models::unit::UnitTenant,
            handlers::units::CreateUnitPayload,
            handlers::units::AssignTenantPayload,

            // --- Jobs ---
            models::job::JobStatus,
            models::job::JobPriority,
            models::job::Job,
            models::job::UpdateJobPayload,
            handlers::jobs::CreateJobPayload,

            // --- Inspections ---
            models::inspection::InspectionStatus,
            models::inspection::Inspection,
            models::inspection::UpdateInspectionPayload,
            models::inspection::InspectionReport,
            handlers::inspections::CreateInspectionPayload,
            handlers::inspections::CompleteInspectionPayload,

            // --- Service Requests ---
            models::service_request::RequestStatus,
            models::service_request::ServiceRequest,
            models::service_request::UpdateServiceRequestPayload,
            handlers::service_requests::CreateServiceRequestPayload,
            handlers::service_requests::ConvertToJobPayload,

            // --- Notifications ---
            models::notification::NotificationKind,
            models::notification::Notification,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Properties", description = "Gestão de Imóveis e Proprietários"),
        (name = "Units", description = "Unidades e Contratos de Locação"),
        (name = "Jobs", description = "Ordens de Serviço de Manutenção"),
        (name = "Inspections", description = "Agendamento e Conclusão de Vistorias"),
        (name = "Service Requests", description = "Pedidos de Serviço dos Inquilinos"),
        (name = "Notifications", description = "Avisos do Usuário"),
        (name = "Dashboard", description = "Indicadores do Portfólio do Gestor")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
