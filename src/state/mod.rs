/// State management module
///
/// This module handles all application state, including:
/// - The selected image and its preview handle (image.rs)
/// - The analysis workflow state machine (workflow.rs)

pub mod image;
pub mod workflow;
