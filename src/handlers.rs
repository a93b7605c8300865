pub mod auth;
pub mod dashboard;
pub mod inspections;
pub mod jobs;
pub mod notifications;
pub mod properties;
pub mod service_requests;
pub mod units;
