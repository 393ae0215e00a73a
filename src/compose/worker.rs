use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::model::user::MentionableUser;

use super::composer::SearchRequest;
use super::source::{SearchError, SuggestionSource};

/// The answer to one [`SearchRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub seq: u64,
    pub result: Result<Vec<MentionableUser>, SearchError>,
}

/// Runs user searches off the event loop.
///
/// A single background thread serves requests in order. When several are
/// queued behind a slow search only the newest one is run, so a hung source
/// holds up one thread and never piles up more. Answers are collected with
/// the non-blocking [`poll`](Self::poll). The newest request is reported as
/// [`SearchError::TimedOut`] if it has not answered within the timeout, and
/// its eventual answer is dropped.
pub struct SearchWorker {
    requests: mpsc::Sender<SearchRequest>,
    outcomes: mpsc::Receiver<SearchOutcome>,
    timeout: Duration,
    /// The newest request not reported yet, with its submit time
    in_flight: Option<(u64, Instant)>,
    /// Outcomes produced without the thread (it has stopped)
    ready: Vec<SearchOutcome>,
}

impl SearchWorker {
    pub fn new(source: Arc<dyn SuggestionSource>, timeout: Duration) -> io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel();
        let (outcome_tx, outcome_rx) = mpsc::channel();
        thread::Builder::new()
            .name("mention-search".into())
            .spawn(move || serve(source.as_ref(), &request_rx, &outcome_tx))?;
        Ok(SearchWorker {
            requests: request_tx,
            outcomes: outcome_rx,
            timeout,
            in_flight: None,
            ready: Vec::new(),
        })
    }

    /// Queue a search; any older unanswered request is superseded
    pub fn submit(&mut self, request: SearchRequest) {
        let seq = request.seq;
        if let Some((old, _)) = self.in_flight.replace((seq, Instant::now())) {
            debug!(seq = old, newer = seq, "user search superseded");
        }
        if self.requests.send(request).is_err() {
            warn!(seq, "user search thread has stopped");
            self.in_flight = None;
            self.ready.push(SearchOutcome {
                seq,
                result: Err(SearchError::Failed("search thread stopped".into())),
            });
        }
    }

    /// Collect finished and timed-out searches without blocking
    pub fn poll(&mut self) -> Vec<SearchOutcome> {
        let mut outcomes = std::mem::take(&mut self.ready);
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.accept(outcome, &mut outcomes);
        }

        if let Some((seq, started)) = self.in_flight
            && started.elapsed() >= self.timeout
        {
            debug!(seq, timeout = ?self.timeout, "user search timed out");
            self.in_flight = None;
            outcomes.push(SearchOutcome {
                seq,
                result: Err(SearchError::TimedOut),
            });
        }
        outcomes
    }

    /// Keep an answer only if it is for the newest unreported request
    fn accept(&mut self, outcome: SearchOutcome, outcomes: &mut Vec<SearchOutcome>) {
        match self.in_flight {
            Some((seq, _)) if seq == outcome.seq => {
                self.in_flight = None;
                outcomes.push(outcome);
            }
            _ => debug!(seq = outcome.seq, "dropping superseded or timed-out user search result"),
        }
    }

    /// Block until at least one outcome is available or `wait` elapses
    #[cfg(test)]
    fn wait(&mut self, wait: Duration) -> Vec<SearchOutcome> {
        let deadline = Instant::now() + wait;
        let mut outcomes = self.poll();
        while outcomes.is_empty() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            // Wake up in time to report a timeout
            let mut step = deadline - now;
            if let Some((_, started)) = self.in_flight {
                step = step.min((started + self.timeout).saturating_duration_since(now));
            }
            match self.outcomes.recv_timeout(step) {
                Ok(outcome) => self.accept(outcome, &mut outcomes),
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
            outcomes.extend(self.poll());
        }
        outcomes
    }

    /// No searches are outstanding
    #[cfg(test)]
    fn is_idle(&self) -> bool {
        self.in_flight.is_none() && self.ready.is_empty()
    }
}

/// Background loop: answer the newest queued request until the worker is dropped
fn serve(
    source: &dyn SuggestionSource,
    requests: &mpsc::Receiver<SearchRequest>,
    outcomes: &mpsc::Sender<SearchOutcome>,
) {
    while let Ok(mut request) = requests.recv() {
        while let Ok(newer) = requests.try_recv() {
            debug!(seq = request.seq, "skipping queued user search");
            request = newer;
        }
        let result = panic::catch_unwind(AssertUnwindSafe(|| source.search_users(&request.query)))
            .unwrap_or_else(|_| Err(SearchError::Failed("search panicked".into())));
        let outcome = SearchOutcome {
            seq: request.seq,
            result,
        };
        if outcomes.send(outcome).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::compose::composer::Composer;

    fn user(id: &str) -> MentionableUser {
        MentionableUser::new(id)
    }

    /// Source whose latency depends on the query
    fn slow_for(slow_query: &'static str, delay: Duration) -> Arc<dyn SuggestionSource> {
        Arc::new(move |query: &str| -> Result<Vec<MentionableUser>, SearchError> {
            if query == slow_query {
                thread::sleep(delay);
            }
            Ok(vec![user(query)])
        })
    }

    fn worker(source: Arc<dyn SuggestionSource>, timeout: Duration) -> SearchWorker {
        SearchWorker::new(source, timeout).unwrap()
    }

    /// Drain outcomes until `n` have been seen (or give up after 5s)
    fn collect(worker: &mut SearchWorker, n: usize) -> Vec<SearchOutcome> {
        let mut all = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(5);
        while all.len() < n && Instant::now() < deadline {
            all.extend(worker.wait(Duration::from_millis(50)));
        }
        all
    }

    #[test]
    fn delivers_results_in_background() {
        let mut worker = worker(slow_for("", Duration::ZERO), Duration::from_secs(5));
        worker.submit(SearchRequest { seq: 7, query: "al".into() });
        let outcomes = collect(&mut worker, 1);
        assert_eq!(
            outcomes,
            vec![SearchOutcome { seq: 7, result: Ok(vec![user("al")]) }]
        );
        assert!(worker.is_idle());
    }

    #[test]
    fn superseded_answers_never_reach_the_panel() {
        let mut worker = worker(
            slow_for("al", Duration::from_millis(200)),
            Duration::from_secs(5),
        );
        let mut composer = Composer::default();

        let a = composer.set_text("@al", 3).unwrap();
        worker.submit(a);
        let b = composer.insert_char('e').unwrap();
        worker.submit(b);

        let outcomes = collect(&mut worker, 1);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].seq, 2);
        for outcome in outcomes {
            composer.apply_results(outcome.seq, outcome.result);
        }
        assert_eq!(composer.suggestions(), &[user("ale")]);

        // The slow "al" answer, if it ran at all, is swallowed
        thread::sleep(Duration::from_millis(300));
        assert!(worker.poll().is_empty());
    }

    #[test]
    fn queued_requests_behind_a_slow_search_collapse_to_the_newest() {
        let searched = Arc::new(Mutex::new(Vec::<String>::new()));
        let log = Arc::clone(&searched);
        let source: Arc<dyn SuggestionSource> =
            Arc::new(move |query: &str| -> Result<Vec<MentionableUser>, SearchError> {
                log.lock().unwrap().push(query.to_string());
                if query == "stuck" {
                    thread::sleep(Duration::from_millis(300));
                }
                Ok(vec![user(query)])
            });
        let mut worker = worker(source, Duration::from_secs(5));

        worker.submit(SearchRequest { seq: 1, query: "stuck".into() });
        thread::sleep(Duration::from_millis(50));
        for (seq, query) in [(2, "a"), (3, "ab"), (4, "abc")] {
            worker.submit(SearchRequest { seq, query: query.into() });
        }

        let outcomes = collect(&mut worker, 1);
        assert_eq!(
            outcomes,
            vec![SearchOutcome { seq: 4, result: Ok(vec![user("abc")]) }]
        );
        let searched = searched.lock().unwrap().clone();
        assert_eq!(searched, vec!["stuck", "abc"]);
    }

    #[test]
    fn slow_search_times_out_once() {
        let mut worker = worker(
            slow_for("al", Duration::from_millis(300)),
            Duration::from_millis(30),
        );
        worker.submit(SearchRequest { seq: 1, query: "al".into() });

        let outcomes = collect(&mut worker, 1);
        assert_eq!(
            outcomes,
            vec![SearchOutcome { seq: 1, result: Err(SearchError::TimedOut) }]
        );
        assert!(worker.is_idle());

        // The late real answer is swallowed
        thread::sleep(Duration::from_millis(400));
        assert!(worker.poll().is_empty());
    }

    #[test]
    fn failing_source_reports_error() {
        let source: Arc<dyn SuggestionSource> =
            Arc::new(|_: &str| -> Result<Vec<MentionableUser>, SearchError> {
                Err(SearchError::Failed("backend down".into()))
            });
        let mut worker = worker(source, Duration::from_secs(5));
        worker.submit(SearchRequest { seq: 3, query: "x".into() });
        let outcomes = collect(&mut worker, 1);
        assert_eq!(
            outcomes[0].result,
            Err(SearchError::Failed("backend down".into()))
        );
    }

    #[test]
    fn panicking_source_is_contained() {
        let source: Arc<dyn SuggestionSource> =
            Arc::new(|query: &str| -> Result<Vec<MentionableUser>, SearchError> {
                if query == "boom" {
                    panic!("boom");
                }
                Ok(vec![user(query)])
            });
        let mut worker = worker(source, Duration::from_secs(5));
        worker.submit(SearchRequest { seq: 1, query: "boom".into() });
        let outcomes = collect(&mut worker, 1);
        assert!(matches!(outcomes[0].result, Err(SearchError::Failed(_))));

        // The thread survives and keeps answering
        worker.submit(SearchRequest { seq: 2, query: "ok".into() });
        let outcomes = collect(&mut worker, 1);
        assert_eq!(outcomes[0].result, Ok(vec![user("ok")]));
    }
}
