pub mod alert;
pub mod request;

pub use alert::{AlertAction, alert_message};
pub use request::MonitorRequest;
