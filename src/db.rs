pub mod inspection_repo;
pub use inspection_repo::InspectionRepository;
pub mod job_repo;
pub use job_repo::JobRepository;
pub mod notification_repo;
pub use notification_repo::NotificationRepository;
pub mod property_repo;
pub use property_repo::PropertyRepository;
pub mod service_request_repo;
pub use service_request_repo::ServiceRequestRepository;
pub mod subscription_repo;
pub use subscription_repo::SubscriptionRepository;
pub mod unit_repo;
pub use unit_repo::UnitRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
