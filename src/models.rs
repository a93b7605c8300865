pub mod auth;
pub mod dashboard;
pub mod inspection;
pub mod job;
pub mod notification;
pub mod property;
pub mod service_request;
pub mod subscription;
pub mod unit;
