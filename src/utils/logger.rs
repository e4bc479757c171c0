use crate::domain::model::ProgressEvent;
use crate::domain::ports::Reporter;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("placemap=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("placemap=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Forwards pipeline progress to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: ProgressEvent) {
        match &event {
            ProgressEvent::Unresolved { .. } => tracing::warn!("{}", event),
            ProgressEvent::Resolved { .. } => tracing::info!("📍 {}", event),
            ProgressEvent::Written { .. } => tracing::info!("✅ {}", event),
            _ => tracing::info!("{}", event),
        }
    }
}

/// Keeps every reported event in memory, in order.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Places in the order they were resolved or given up on.
    pub fn queried_places(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Resolved { place } | ProgressEvent::Unresolved { place } => {
                    Some(place)
                }
                _ => None,
            })
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl<R: Reporter + ?Sized> Reporter for std::sync::Arc<R> {
    fn report(&self, event: ProgressEvent) {
        (**self).report(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_reporter_keeps_order() {
        let reporter = CollectingReporter::new();
        reporter.report(ProgressEvent::Querying { count: 2 });
        reporter.report(ProgressEvent::Resolved {
            place: "Amsterdam".to_string(),
        });
        reporter.report(ProgressEvent::Unresolved {
            place: "Zurich".to_string(),
        });

        assert_eq!(reporter.events().len(), 3);
        assert_eq!(reporter.queried_places(), vec!["Amsterdam", "Zurich"]);
    }

    #[test]
    fn test_event_messages() {
        let event = ProgressEvent::Unresolved {
            place: "Atlantis".to_string(),
        };
        assert_eq!(event.to_string(), "Could not get coordinates for: Atlantis");
        assert_eq!(
            ProgressEvent::ReadPlaces { count: 3 }.to_string(),
            "Read 3 unique places."
        );
    }
}
