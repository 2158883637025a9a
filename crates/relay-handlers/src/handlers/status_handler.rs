//! Status handler: liveness and host state

use super::OperationHandler;
use async_trait::async_trait;
use relay_foundation::protocol::StatusResponse;
use relay_handler_api::HandlerContext;
use tracing::debug;

pub struct StatusHandler;

impl StatusHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StatusHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OperationHandler for StatusHandler {
    type Request = ();
    type Response = StatusResponse;

    fn operation(&self) -> &'static str {
        "status"
    }

    async fn handle(&self, context: &HandlerContext, _request: ()) -> StatusResponse {
        let projects: Vec<_> = context
            .projects
            .open_projects()
            .into_iter()
            .filter(|project| !project.disposed)
            .collect();

        let indexing_in_progress = projects
            .iter()
            .any(|project| context.projects.is_indexing(&project.name));

        debug!(
            projects = projects.len(),
            indexing = indexing_in_progress,
            "Status requested"
        );

        StatusResponse {
            ok: true,
            ide_type: context.ide.ide_type.clone(),
            ide_version: context.ide.ide_version.clone(),
            port: context.ide.port,
            open_projects: projects.iter().map(|project| project.descriptor()).collect(),
            indexing_in_progress,
            language_plugins: context.capabilities.availability_map(),
        }
    }
}
