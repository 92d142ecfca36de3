use parking_lot::Mutex;
use std::sync::Arc;

use crate::{
    dashboard::{Dashboard, DashboardView, SearchState, Submission},
    model::Unit,
    provider::WeatherProvider,
};

/// Drives searches against a provider and owns the shared dashboard.
///
/// Cloning is cheap; clones share the same dashboard, so a second submission from any clone
/// while a search is in flight is suppressed.
#[derive(Debug, Clone)]
pub struct SearchController {
    dashboard: Arc<Mutex<Dashboard>>,
    provider: Arc<dyn WeatherProvider>,
}

/// Marks the dashboard's `Loading` state as owned by one fetch. Dropping it before the fetch
/// settles abandons the search.
struct PendingSearch<'a> {
    dashboard: &'a Mutex<Dashboard>,
    settled: bool,
}

impl Drop for PendingSearch<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.dashboard.lock().abandon_search();
        }
    }
}

impl SearchController {
    pub fn new(provider: Arc<dyn WeatherProvider>, dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
            provider,
        }
    }

    /// Replace the input buffer with `text` and submit it.
    pub async fn submit(&self, text: &str) -> Submission {
        let submission = self.dashboard.lock().submit(text);
        self.run(submission).await
    }

    /// Submit whatever is currently in the input buffer.
    pub async fn submit_input(&self) -> Submission {
        let submission = self.dashboard.lock().begin_search();
        self.run(submission).await
    }

    async fn run(&self, submission: Submission) -> Submission {
        if let Submission::Started(query) = &submission {
            let mut pending = PendingSearch {
                dashboard: &self.dashboard,
                settled: false,
            };
            let outcome = self.provider.fetch(query).await;
            self.dashboard.lock().finish_search(outcome);
            pending.settled = true;
        }
        submission
    }

    pub fn set_input(&self, text: &str) {
        self.dashboard.lock().set_input(text);
    }

    pub fn input(&self) -> String {
        self.dashboard.lock().input().to_string()
    }

    pub fn state(&self) -> SearchState {
        self.dashboard.lock().state().clone()
    }

    pub fn unit(&self) -> Unit {
        self.dashboard.lock().unit()
    }

    pub fn set_unit(&self, unit: Unit) {
        self.dashboard.lock().set_unit(unit);
    }

    pub fn toggle_unit(&self) -> Unit {
        self.dashboard.lock().toggle_unit()
    }

    pub fn view(&self) -> DashboardView {
        self.dashboard.lock().view()
    }
}
