pub mod email_config;
pub mod response;

pub use email_config::{EmailConfig, EmailConfigRequest};
pub use response::{ApiResponse, HealthResponse, OrganizationList};
