pub mod access;
pub mod auth;
pub mod dashboard_service;
pub mod inspection_service;
pub mod job_service;
pub mod property_service;
pub mod service_request_service;
pub mod subscription_service;
pub mod unit_service;
