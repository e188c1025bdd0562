//! Target / login / push workflow against a Cloud Foundry style v2 API.

mod context;
pub mod naming;
pub mod package;
pub mod payloads;
mod poll;

pub use context::{PushedApp, RestContext};
pub use package::{AppPackage, PackageError};
