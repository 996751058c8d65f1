/// Analysis service client module
///
/// This module handles:
/// - The wire model returned by the service (model.rs)
/// - The failure taxonomy shown to the user (error.rs)
/// - The HTTP client performing the multipart upload (client.rs)

pub mod client;
pub mod error;
pub mod model;
