//! Progress reporting for paginated fetches.
//!
//! Listing every repository of an account can take several sequential
//! requests; `folio repos` reports each page on **stderr** so stdout stays
//! parseable for scripts.

use std::io::Write;

use crate::display::format_thousands;

/// A single progress event for a paginated walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchProgressEvent {
    /// A page arrived; `items` is the running total.
    Page {
        endpoint: String,
        page: usize,
        items: u64,
    },
    /// The walk ended.
    Done { endpoint: String, items: u64 },
}

/// Receives progress events. Implementations write to stderr or nowhere.
pub trait FetchProgressReporter: Send + Sync {
    fn report(&self, event: FetchProgressEvent);
}

/// Human-friendly progress on stderr: "fetch /users/x/repos  page 3  237 items".
pub struct StderrProgress;

impl FetchProgressReporter for StderrProgress {
    fn report(&self, event: FetchProgressEvent) {
        let line = match &event {
            FetchProgressEvent::Page {
                endpoint,
                page,
                items,
            } => format!(
                "fetch {}  page {}  {} items\n",
                endpoint,
                page,
                format_thousands(*items)
            ),
            FetchProgressEvent::Done { endpoint, items } => {
                format!("fetch {}  done  {} items\n", endpoint, format_thousands(*items))
            }
        };
        let _ = std::io::stderr().write_all(line.as_bytes());
    }
}

/// Drops every event.
pub struct NoProgress;

impl FetchProgressReporter for NoProgress {
    fn report(&self, _event: FetchProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording(Mutex<Vec<FetchProgressEvent>>);

    impl FetchProgressReporter for Recording {
        fn report(&self, event: FetchProgressEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_reporter_is_object_safe() {
        let rec = Recording(Mutex::new(Vec::new()));
        let reporter: &dyn FetchProgressReporter = &rec;
        reporter.report(FetchProgressEvent::Done {
            endpoint: "/users/a/repos".to_string(),
            items: 3,
        });
        assert_eq!(rec.0.lock().unwrap().len(), 1);
    }
}
