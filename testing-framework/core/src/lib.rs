pub mod error;
pub mod reply;
pub mod scenario;
pub mod transport;

pub use error::WorkflowError;
pub use reply::{Reply, check_successful_reply};
pub use transport::{
    AuthMode, Exchange, HttpRequest, Method, RequestBody, Transport, http::HttpTransport,
    scripted::ScriptedTransport,
};
