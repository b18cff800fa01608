//! Monitor endpoint settings
//!
//! Stores where monitoring messages are sent and the API key used to send
//! them, in a properties file under the application base directory.

mod properties;

pub use properties::MonitorProperties;
