//! The runner: one [`Garden`] per top-level scenario tree.
//!
//! A run is a loop of passes. Each pass calls the root body from scratch;
//! every nested `scenario` call asks the navigator whether to enter, and the
//! first frame to finish marks the pass as done so that everything after it
//! is skipped. The first skipped position becomes the next pass's target.
//! The loop ends when a pass records no target.

use std::cell::{Cell, RefCell, RefMut};
use std::fmt::{self, Display};
use std::panic::{self, AssertUnwindSafe, Location};
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::api::Activation;
use crate::core::classifier::{
    BodyError, Escalation, IntoOutcome, Outcome, Verdict, classify_panic, classify_return,
    panic_message,
};
use crate::core::filter::PatternFilter;
use crate::core::ledger::{self, TeardownLedger};
use crate::core::navigator::{Approach, Decision, Navigator};
use crate::core::types::{Status, StatusCounters, Summary};
use crate::error::GardenError;
use crate::io::config::GardenConfig;
use crate::io::report::{Event, Reporter, StdoutReporter, topic_path};
use crate::signal::{self, CaptureGuard};

pub(crate) type Body<'a> = Box<dyn FnOnce(&Garden) -> Result<(), BodyError> + 'a>;

/// Handle to a scenario tree run. Scenario bodies receive `&Garden` and use
/// it to declare nested scenarios and teardowns.
pub struct Garden {
    shared: Rc<Shared>,
}

struct Shared {
    config: GardenConfig,
    filter: PatternFilter,
    reporter: Box<dyn Reporter>,
    running: Cell<bool>,
    state: RefCell<RunState>,
}

/// Mutable state of one run, reset when the run starts.
#[derive(Debug, Default)]
struct RunState {
    navigator: Navigator,
    topics: Vec<String>,
    ledger: TeardownLedger,
    counters: StatusCounters,
    passes: usize,
}

impl Garden {
    /// A garden reporting to stdout.
    pub fn new(config: GardenConfig) -> Result<Self, GardenError> {
        Self::with_reporter(config, StdoutReporter)
    }

    pub fn with_reporter<R>(config: GardenConfig, reporter: R) -> Result<Self, GardenError>
    where
        R: Reporter + 'static,
    {
        let filter = PatternFilter::new(&config.patterns)?;
        Ok(Self {
            shared: Rc::new(Shared {
                config,
                filter,
                reporter: Box::new(reporter),
                running: Cell::new(false),
                state: RefCell::new(RunState::default()),
            }),
        })
    }

    /// Run the tree rooted at `topic` until every leaf has executed once,
    /// then print the summary line.
    ///
    /// `body` is called once per pass. Failures, errors, skips and stubs are
    /// counted in the returned [`Summary`]; `Err` means the run itself was
    /// aborted (teardown panic, usage error, non-deterministic tree).
    #[track_caller]
    pub fn run<T, F, R>(self, topic: T, mut body: F) -> Result<Summary, GardenError>
    where
        T: Display,
        F: FnMut(&Garden) -> R,
        R: IntoOutcome,
    {
        self.drive(topic.to_string(), Some(&mut body), Location::caller())
    }

    /// Declare a nested scenario.
    ///
    /// # Panics
    ///
    /// Panics when called outside [`Garden::run`]; a tree is started with
    /// `run` or with the free [`scenario`](crate::scenario) function.
    #[track_caller]
    pub fn scenario<T, F, R>(&self, topic: T, body: F)
    where
        T: Display,
        F: FnOnce(&Garden) -> R,
        R: IntoOutcome,
    {
        self.ensure_running();
        let body: Body<'_> = Box::new(move |garden: &Garden| body(garden).into_outcome());
        self.nest(topic.to_string(), Some(body), Location::caller());
    }

    /// Declare a scenario that is not written yet. Counted as incomplete.
    ///
    /// # Panics
    ///
    /// Panics when called outside [`Garden::run`].
    #[track_caller]
    pub fn stub<T: Display>(&self, topic: T) {
        self.ensure_running();
        self.nest(topic.to_string(), None, Location::caller());
    }

    /// Register `callback` to run when the current scenario frame exits,
    /// whether its body completed or was abandoned.
    ///
    /// # Panics
    ///
    /// Panics with "no active scenario" when no frame is open.
    #[track_caller]
    pub fn cleanup<F: FnOnce() + 'static>(&self, callback: F) {
        if let Err(err) = self.try_cleanup(callback) {
            if self.shared.running.get() {
                escalate(err);
            }
            panic!("{err}");
        }
    }

    pub fn try_cleanup<F: FnOnce() + 'static>(&self, callback: F) -> Result<(), GardenError> {
        self.state().ledger.register(Box::new(callback))
    }

    /// Topic path of the innermost open frame.
    pub fn path(&self) -> String {
        topic_path(&self.state().topics)
    }

    pub fn config(&self) -> &GardenConfig {
        &self.shared.config
    }

    #[track_caller]
    fn ensure_running(&self) {
        if !self.shared.running.get() {
            panic!("{}", GardenError::NotRunning);
        }
    }

    pub(crate) fn handle(&self) -> Garden {
        Garden {
            shared: Rc::clone(&self.shared),
        }
    }

    pub(crate) fn drive<F, R>(
        &self,
        topic: String,
        mut body: Option<&mut F>,
        call_site: &'static Location<'static>,
    ) -> Result<Summary, GardenError>
    where
        F: FnMut(&Garden) -> R,
        R: IntoOutcome,
    {
        let _capture = CaptureGuard::install();
        let _active = Activation::install(self.handle());
        *self.state() = RunState::default();
        self.shared.running.set(true);
        let limit = self.shared.config.max_passes;

        let result = loop {
            let pass = {
                let mut state = self.state();
                if state.passes >= limit {
                    None
                } else {
                    state.navigator.begin_pass();
                    state.passes += 1;
                    Some(state.passes)
                }
            };
            let Some(pass) = pass else {
                break Err(GardenError::PassLimit { limit });
            };
            debug!(topic = %topic, pass, "starting pass");

            let root: Option<Body<'_>> = body.as_deref_mut().map(|body| {
                Box::new(move |garden: &Garden| body(garden).into_outcome()) as Body<'_>
            });
            let walked = panic::catch_unwind(AssertUnwindSafe(|| {
                self.nest(topic.clone(), root, call_site);
            }));
            if let Err(payload) = walked {
                break Err(into_garden_error(payload));
            }

            let next = self.state().navigator.end_pass();
            match next {
                Ok(true) => {}
                Ok(false) => break Ok(()),
                Err(target) => break Err(GardenError::UnreachedTarget { target }),
            }
        };
        self.shared.running.set(false);

        let summary = self.summary(&topic);
        self.shared.reporter.line(&summary.to_string());
        match result {
            Ok(()) => {
                debug!(topic = %topic, passes = summary.passes, "run complete");
                Ok(summary)
            }
            Err(err) => {
                warn!(topic = %topic, error = %err, "run aborted");
                Err(err)
            }
        }
    }

    /// One scenario call: enter, execute, settle, exit.
    pub(crate) fn nest(
        &self,
        topic: String,
        body: Option<Body<'_>>,
        call_site: &'static Location<'static>,
    ) {
        match self.enter(topic) {
            Decision::SkipRecording | Decision::SkipSilent => return,
            Decision::SkipDescend => {
                if let Err(err) = self.exit(false) {
                    escalate(err);
                }
                return;
            }
            Decision::Run => {}
        }

        let verdict = match body {
            Some(body) => self.execute(body, call_site),
            None => Verdict::Settled(Outcome::Incomplete),
        };
        let escalation = match verdict {
            Verdict::Settled(outcome) => {
                self.settle(outcome);
                None
            }
            Verdict::Escalate(payload) => Some(payload),
        };

        let closed = self.exit(true);
        if let Some(payload) = escalation {
            if let Err(err) = closed {
                warn!(error = %err, "teardown failed while escalating");
            }
            panic::resume_unwind(payload);
        }
        if let Err(err) = closed {
            escalate(err);
        }
    }

    fn enter(&self, topic: String) -> Decision {
        let (decision, path) = self.approach(topic);
        match decision {
            Decision::Run => self.report(&Event::Enter { path: &path }),
            Decision::SkipDescend => self.report(&Event::Skip { path: &path }),
            Decision::SkipRecording | Decision::SkipSilent => {}
        }
        decision
    }

    /// Navigator and filter bookkeeping for [`Garden::enter`]. Returns the
    /// decision and, for pushed frames, the new topic path.
    fn approach(&self, topic: String) -> (Decision, String) {
        let mut state = self.state();
        match state.navigator.approach() {
            Approach::SkipRecording => {
                trace!(topic = %topic, position = ?state.navigator.position(), "leaf already ran this pass");
                return (Decision::SkipRecording, String::new());
            }
            Approach::SkipSilent => {
                trace!(topic = %topic, position = ?state.navigator.position(), "off the path to the target");
                return (Decision::SkipSilent, String::new());
            }
            Approach::Enter => {}
        }

        state.navigator.descend();
        state.topics.push(topic);
        state.ledger.open();
        let path = topic_path(&state.topics);
        if self.shared.filter.allows(&state.topics) {
            trace!(path = %path, position = ?state.navigator.position(), "enter");
            (Decision::Run, path)
        } else {
            state.counters.record(Status::Skip);
            (Decision::SkipDescend, path)
        }
    }

    fn execute(&self, body: Body<'_>, call_site: &'static Location<'static>) -> Verdict {
        let depth = self.shared.config.backtrace_depth;
        match panic::catch_unwind(AssertUnwindSafe(|| body(self))) {
            Ok(result) => Verdict::Settled(classify_return(result, &call_site.to_string(), depth)),
            Err(payload) => classify_panic(payload, signal::take_site(), depth),
        }
    }

    /// Count and report the outcome, unless the frame will be re-entered on a
    /// later pass; then its last visit counts instead.
    fn settle(&self, outcome: Outcome) {
        let path = {
            let mut state = self.state();
            let path = topic_path(&state.topics);
            if state.navigator.revisit_pending() {
                trace!(path = %path, "outcome deferred to a later pass");
                return;
            }
            state.counters.record(outcome.status());
            path
        };
        let event = match &outcome {
            Outcome::Completed => Event::Pass { path: &path },
            Outcome::Failed { location, message } => Event::Fail {
                path: &path,
                location,
                message,
            },
            Outcome::Errored {
                message,
                kind,
                trace,
            } => Event::Error {
                path: &path,
                message,
                kind,
                trace,
            },
            Outcome::Incomplete => Event::Incomplete { path: &path },
        };
        self.report(&event);
    }

    /// Pop the frame and run its teardowns, last registered first.
    fn exit(&self, executed: bool) -> Result<(), GardenError> {
        let (callbacks, path) = {
            let mut state = self.state();
            let path = topic_path(&state.topics);
            let callbacks = state.ledger.close();
            state.topics.pop();
            state.navigator.ascend(executed);
            (callbacks, path)
        };
        ledger::drain(callbacks).map_err(|payload| GardenError::Teardown {
            path,
            message: panic_message(payload.as_ref()),
        })
    }

    fn report(&self, event: &Event<'_>) {
        if self.shared.config.verbose || !event.is_verbose() {
            self.shared.reporter.line(&event.to_string());
        }
    }

    fn summary(&self, topic: &str) -> Summary {
        let state = self.state();
        Summary {
            topic: topic.to_string(),
            passes: state.passes,
            counts: state.counters.clone(),
        }
    }

    fn state(&self) -> RefMut<'_, RunState> {
        self.shared.state.borrow_mut()
    }
}

impl fmt::Debug for Garden {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Garden")
            .field("config", &self.shared.config)
            .field("running", &self.shared.running.get())
            .field("state", &self.shared.state.try_borrow().ok())
            .finish()
    }
}

/// Abort the run: unwind through every frame boundary without being counted.
pub(crate) fn escalate(err: GardenError) -> ! {
    warn!(error = %err, "escalating");
    panic::resume_unwind(Box::new(Escalation(err)))
}

fn into_garden_error(payload: Box<dyn std::any::Any + Send>) -> GardenError {
    match payload.downcast::<Escalation>() {
        Ok(escalation) => escalation.0,
        Err(payload) => GardenError::Panicked(panic_message(payload.as_ref())),
    }
}
