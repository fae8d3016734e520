use ayurdrishti_core::{
    ApiError, BackendClient, BackendStatus, ChatResult, Config, FlowKind, IdentifyResult,
    ImageUpload, Organ, Phase, Settled, Shell, SubmitError, Ticket,
};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::input;
use crate::tui::Waker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Modal message; everything else is blocked until it is dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn error(message: &str) -> Self {
        Self {
            title: " Error ".to_string(),
            message: message.to_string(),
        }
    }

    pub fn validation(message: &str) -> Self {
        Self {
            title: " Check input ".to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendHealth {
    Checking,
    Online(BackendStatus),
    Offline(String),
}

/// An in-flight request and the ticket its result must be settled with.
struct Pending<T> {
    ticket: Ticket,
    outcome: Outcome<T>,
}

type Outcome<T> = oneshot::Receiver<Result<T, ApiError>>;

/// The outcome of a request if its task has finished.
fn try_outcome<T>(rx: &mut Outcome<T>) -> Option<Result<T, ApiError>> {
    match rx.try_recv() {
        Ok(outcome) => Some(outcome),
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Closed) => Some(Err(ApiError::Interrupted(
            "request task ended without a result".to_string(),
        ))),
    }
}

/// Remove and return every finished request in `tasks`.
fn take_finished<T>(tasks: &mut Vec<Pending<T>>) -> Vec<(Ticket, Result<T, ApiError>)> {
    let mut done = Vec::new();
    tasks.retain_mut(|pending| match try_outcome(&mut pending.outcome) {
        Some(outcome) => {
            done.push((pending.ticket, outcome));
            false
        }
        None => true,
    });
    done
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub shell: Shell,
    pub input_mode: InputMode,

    // Form editing (the values themselves live in the flows)
    pub path_input: String,
    pub path_cursor: usize,
    pub chat_cursor: usize,

    // Presentation
    pub notice: Option<Notice>,
    pub status_message: Option<String>,
    pub result_scroll: u16,
    pub animation_frame: u8, // 0-2 for ellipsis animation
    pub health: BackendHealth,

    client: BackendClient,
    identify_tasks: Vec<Pending<IdentifyResult>>,
    chat_tasks: Vec<Pending<ChatResult>>,
    health_task: Option<Outcome<BackendStatus>>,
    waker: Option<Waker>,
}

impl App {
    pub fn new(client: BackendClient, default_organ: Organ) -> Self {
        let shell = Shell::new(client.base().clone(), default_organ);
        Self {
            should_quit: false,
            shell,
            input_mode: InputMode::Normal,

            path_input: String::new(),
            path_cursor: 0,
            chat_cursor: 0,

            notice: None,
            status_message: None,
            result_scroll: 0,
            animation_frame: 0,
            health: BackendHealth::Checking,

            client,
            identify_tasks: Vec::new(),
            chat_tasks: Vec::new(),
            health_task: None,
            waker: None,
        }
    }

    /// Wake the event loop as soon as a spawned request finishes.
    pub fn with_waker(mut self, waker: Waker) -> Self {
        self.waker = Some(waker);
        self
    }

    fn spawn_request<T, F>(&self, request: F) -> Outcome<T>
    where
        T: Send + 'static,
        F: std::future::Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let waker = self.waker.clone();
        tokio::spawn(async move {
            // The receiver is gone once the app has quit.
            let _ = tx.send(request.await);
            if let Some(waker) = waker {
                waker.wake();
            }
        });
        rx
    }

    pub fn screen(&self) -> FlowKind {
        self.shell.active()
    }

    /// Whether the visible flow has a request outstanding.
    pub fn is_submitting(&self) -> bool {
        match self.screen() {
            FlowKind::Identify => self.shell.identify.phase() == Phase::Submitting,
            FlowKind::Ayurveda => self.shell.chat.phase() == Phase::Submitting,
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.identify_tasks.is_empty() || !self.chat_tasks.is_empty() || self.health_task.is_some()
    }

    pub fn switch_flow(&mut self, kind: FlowKind) {
        if self.shell.switch_to(kind) {
            self.input_mode = InputMode::Normal;
            self.path_input.clear();
            self.path_cursor = 0;
            self.chat_cursor = 0;
            self.result_scroll = 0;
            self.status_message = None;
        }
    }

    pub fn toggle_flow(&mut self) {
        self.switch_flow(self.screen().other());
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // Identify actions

    pub async fn load_image(&mut self) {
        if self.path_input.trim().is_empty() {
            return;
        }
        match ImageUpload::from_path(&self.path_input).await {
            Ok(image) => {
                self.status_message =
                    Some(format!("Loaded {} ({})", image.file_name, image.size_label()));
                self.shell.identify.select_image(image);
            }
            Err(e) => {
                warn!(error = %e, "could not load image");
                self.notice = Some(Notice::validation(&e.to_string()));
            }
        }
    }

    /// A pasted or dropped path replaces the current one and is loaded at once.
    pub async fn paste_image_path(&mut self, pasted: &str) {
        self.path_input = input::dropped_path(pasted);
        self.path_cursor = self.path_input.chars().count();
        self.input_mode = InputMode::Normal;
        self.load_image().await;
    }

    pub fn cycle_organ(&mut self, forward: bool) {
        let organ = self.shell.identify.organ();
        let next = if forward { organ.next() } else { organ.prev() };
        self.shell.identify.set_organ(next);
    }

    pub fn save_default_organ(&mut self) {
        let organ = self.shell.identify.organ();
        match Config::save_default_organ(organ) {
            Ok(()) => {
                self.shell.set_default_organ(organ);
                self.status_message =
                    Some(format!("Saved {} as default organ", organ.display_name()));
            }
            Err(e) => {
                self.notice = Some(Notice::error(&format!("Could not save config: {}", e)));
            }
        }
    }

    pub fn submit_identify(&mut self) {
        match self.shell.identify.submit() {
            Ok(submission) => {
                let client = self.client.clone();
                let request = submission.request;
                let outcome = self.spawn_request(async move { client.identify(&request).await });
                self.identify_tasks.push(Pending {
                    ticket: submission.ticket,
                    outcome,
                });
                self.status_message = None;
            }
            Err(SubmitError::InFlight) => debug!("identify already in flight, ignoring submit"),
            Err(e @ SubmitError::MissingImage) => {
                self.notice = Some(Notice::validation(&e.to_string()));
            }
        }
    }

    // Chat actions

    pub fn submit_chat(&mut self) {
        match self.shell.chat.submit() {
            Ok(Some(submission)) => {
                let client = self.client.clone();
                let request = submission.request;
                let outcome =
                    self.spawn_request(async move { client.ayurveda_chat(&request).await });
                self.chat_tasks.push(Pending {
                    ticket: submission.ticket,
                    outcome,
                });
                self.input_mode = InputMode::Normal;
            }
            Ok(None) => debug!("blank chat message, nothing to send"),
            Err(SubmitError::InFlight) => debug!("chat already in flight, ignoring submit"),
            Err(e) => warn!(error = %e, "unexpected chat submit error"),
        }
    }

    pub fn paste_into_chat(&mut self, pasted: &str) {
        let text = pasted.replace("\r\n", "\n").replace('\r', "\n");
        if self.input_mode == InputMode::Normal {
            self.chat_cursor = self.shell.chat.message().chars().count();
            self.input_mode = InputMode::Editing;
        }
        input::insert_str(self.shell.chat.message_mut(), &mut self.chat_cursor, &text);
    }

    // Backend health

    pub fn check_backend(&mut self) {
        if self.health_task.is_some() {
            return;
        }
        let client = self.client.clone();
        self.health = BackendHealth::Checking;
        self.health_task = Some(self.spawn_request(async move { client.status().await }));
    }

    /// Settle every request that has finished since the last call.
    pub fn poll_tasks(&mut self) {
        for (ticket, outcome) in take_finished(&mut self.identify_tasks) {
            let settled = self.shell.settle_identify(ticket, outcome);
            self.after_settle(settled, FlowKind::Identify);
        }

        for (ticket, outcome) in take_finished(&mut self.chat_tasks) {
            let settled = self.shell.settle_chat(ticket, outcome);
            self.after_settle(settled, FlowKind::Ayurveda);
        }

        if let Some(outcome) = self.health_task.as_mut().and_then(try_outcome) {
            self.health_task = None;
            self.health = match outcome {
                Ok(status) => {
                    info!(mock = status.mock, "backend online");
                    BackendHealth::Online(status)
                }
                Err(e) => {
                    warn!(error = %e, "backend unreachable");
                    BackendHealth::Offline(e.to_string())
                }
            };
        }
    }

    fn after_settle(&mut self, settled: Settled, kind: FlowKind) {
        if settled == Settled::Discarded {
            return;
        }
        let error = match kind {
            FlowKind::Identify => self.shell.identify.error(),
            FlowKind::Ayurveda => self.shell.chat.error(),
        };
        match error {
            Some(message) => self.notice = Some(Notice::error(message)),
            None => self.result_scroll = 0,
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_submitting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_down(&mut self) {
        self.result_scroll = self.result_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }
}
