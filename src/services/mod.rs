pub mod email_service;
pub mod monitor_service;

pub use email_service::{DispatchError, EmailNotifier};
pub use monitor_service::MonitorService;
