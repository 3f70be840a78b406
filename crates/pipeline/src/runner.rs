//! Background task feeding bus events to the template parser.

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use formgen_ai::CompletionClient;
use formgen_events::{bus, PlatformEvent};

use crate::parser::TemplateParser;

/// Consumes upload-completed (and re-parse) events from the bus and
/// runs the parsing pipeline for each.
///
/// Parsing is effectively single-flight per template: the runner
/// processes events sequentially, and the status-guarded claim inside
/// the parser makes redeliveries harmless either way.
pub struct PipelineRunner<C> {
    parser: TemplateParser<C>,
}

impl<C: CompletionClient> PipelineRunner<C> {
    pub fn new(parser: TemplateParser<C>) -> Self {
        Self { parser }
    }

    /// Run until the bus closes or `cancel` fires.
    pub async fn run(
        self,
        mut receiver: broadcast::Receiver<PlatformEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            let event = tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("Pipeline runner cancelled, shutting down");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Pipeline runner lagged behind the event bus");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, pipeline runner shutting down");
                        break;
                    }
                },
            };

            if !matches!(
                event.event_type.as_str(),
                bus::TEMPLATE_UPLOAD_COMPLETED | bus::TEMPLATE_REPARSE_REQUESTED
            ) {
                continue;
            }

            let Some(storage_path) = event.storage_path() else {
                tracing::warn!(
                    event_type = %event.event_type,
                    "Parse trigger event carries no storage path, ignoring"
                );
                continue;
            };

            if let Err(e) = self.parser.handle_upload_completed(storage_path).await {
                tracing::error!(
                    storage_path,
                    error = %e,
                    "Parse trigger handling failed"
                );
            }
        }
    }
}
