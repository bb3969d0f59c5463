//! Navigation, polling and overlay state
//!
//! The controller never performs I/O. It answers "what should be loaded
//! now" and "may this response be shown", and the app shell acts on it.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::time::{Duration, Instant};

use crate::config::PollIntervals;
use crate::models::{Section, DEFAULT_TITLE};
use crate::tasks::{Container, Mutation};

/// Repeating refresh for one section, armed only while that section is shown
#[derive(Debug, Clone)]
pub struct Poller {
    section: Section,
    interval: Duration,
    next_due: Option<Instant>,
}

impl Poller {
    pub fn new(section: Section, interval: Duration) -> Self {
        Self { section, interval, next_due: None }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Fires at most once per call and re-arms from `now`
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

/// Per-container request numbering; a response older than the newest
/// applied one for its container is stale.
#[derive(Debug, Default)]
pub struct SequenceGuard {
    issued: HashMap<Container, u64>,
    applied: HashMap<Container, u64>,
}

impl SequenceGuard {
    pub fn issue(&mut self, container: Container) -> u64 {
        let next = self.issued.entry(container).or_insert(0);
        *next += 1;
        *next
    }

    pub fn accept(&mut self, container: Container, seq: u64) -> bool {
        let applied = self.applied.entry(container).or_insert(0);
        if seq > *applied {
            *applied = seq;
            true
        } else {
            false
        }
    }

    pub fn pending(&self, container: Container) -> bool {
        self.issued.get(&container).copied().unwrap_or(0)
            > self.applied.get(&container).copied().unwrap_or(0)
    }
}

/// Form dialogs that dim the rest of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modal {
    AddChannel,
    UploadVideo,
    DownloadVideo,
    AddPlaylist,
    AddTask,
    AddPlatform,
    AddUser,
    EditUser,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// Blocking message shown to the operator
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, text: text.into() }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Info, text: text.into() }
    }

    /// Success or error depending on the backend's verdict
    pub fn from_outcome(success: bool, text: impl Into<String>) -> Self {
        if success { Self::success(text) } else { Self::error(text) }
    }
}

/// Destructive action waiting for an OK
#[derive(Debug, Clone, PartialEq)]
pub struct Confirm {
    pub prompt: String,
    pub mutation: Mutation,
}

pub struct Controller {
    current: String,
    active: Option<Section>,
    title: &'static str,
    pollers: Vec<Poller>,
    guard: SequenceGuard,
    modals: BTreeSet<Modal>,
    confirm: Option<Confirm>,
    notices: VecDeque<Notice>,
    selected_video_id: Option<i64>,
}

impl Controller {
    pub fn new(intervals: &PollIntervals) -> Self {
        Self {
            current: Section::Dashboard.key().to_string(),
            active: None,
            title: DEFAULT_TITLE,
            pollers: vec![
                Poller::new(Section::Dashboard, intervals.stats()),
                Poller::new(Section::Channels, intervals.channels()),
                Poller::new(Section::Videos, intervals.videos()),
                Poller::new(Section::Logs, intervals.logs()),
            ],
            guard: SequenceGuard::default(),
            modals: BTreeSet::new(),
            confirm: None,
            notices: VecDeque::new(),
            selected_video_id: None,
        }
    }

    /// Switches the visible section.
    ///
    /// Unknown names are accepted: nothing is activated, the title falls
    /// back to [`DEFAULT_TITLE`] and the name is still recorded as current.
    /// Returns the section whose data should be loaded now.
    pub fn show_section(&mut self, name: &str, now: Instant) -> Option<Section> {
        let target = Section::from_key(name);

        if let Some(previous) = self.active {
            if Some(previous) != target {
                self.stop_poller(previous);
            }
        }

        self.active = target;
        self.title = target.map(|s| s.title()).unwrap_or(DEFAULT_TITLE);
        self.current = name.to_string();

        match target {
            Some(section) => {
                log::info!("Showing section '{}'", name);
                if let Some(poller) = self.pollers.iter_mut().find(|p| p.section() == section) {
                    poller.start(now);
                }
            }
            None => log::warn!("Unknown section '{}', nothing to show", name),
        }

        target
    }

    fn stop_poller(&mut self, section: Section) {
        if let Some(poller) = self.pollers.iter_mut().find(|p| p.section() == section) {
            poller.stop();
        }
    }

    /// Name passed to the last `show_section`, known or not
    pub fn current_section(&self) -> &str {
        &self.current
    }

    pub fn active_section(&self) -> Option<Section> {
        self.active
    }

    pub fn is_section_active(&self, section: Section) -> bool {
        self.active == Some(section)
    }

    pub fn is_menu_item_active(&self, section: Section) -> bool {
        self.active == Some(section)
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    /// Sections whose refresh period elapsed
    pub fn tick(&mut self, now: Instant) -> Vec<Section> {
        self.pollers
            .iter_mut()
            .filter_map(|p| if p.poll(now) { Some(p.section()) } else { None })
            .collect()
    }

    pub fn next_poll_in(&self, now: Instant) -> Option<Duration> {
        self.pollers.iter().filter_map(|p| p.time_until_due(now)).min()
    }

    pub fn running_pollers(&self) -> Vec<Section> {
        self.pollers.iter().filter(|p| p.is_running()).map(|p| p.section()).collect()
    }

    pub fn issue(&mut self, container: Container) -> u64 {
        self.guard.issue(container)
    }

    /// True if the response may replace what the container shows
    pub fn accept(&mut self, container: Container, seq: u64) -> bool {
        self.guard.accept(container, seq)
    }

    pub fn is_loading(&self, container: Container) -> bool {
        self.guard.pending(container)
    }

    // --- overlays ---

    pub fn open_modal(&mut self, modal: Modal) {
        self.modals.insert(modal);
    }

    /// Returns true if the modal was open
    pub fn close_modal(&mut self, modal: Modal) -> bool {
        self.modals.remove(&modal)
    }

    pub fn is_modal_open(&self, modal: Modal) -> bool {
        self.modals.contains(&modal)
    }

    pub fn has_overlay(&self) -> bool {
        !self.modals.is_empty() || self.confirm.is_some()
    }

    /// Closes every modal and any pending confirmation; returns the closed modals
    pub fn close_all_overlays(&mut self) -> Vec<Modal> {
        self.confirm = None;
        std::mem::take(&mut self.modals).into_iter().collect()
    }

    pub fn on_backdrop_click(&mut self) -> Vec<Modal> {
        self.close_all_overlays()
    }

    pub fn on_escape(&mut self) -> Vec<Modal> {
        self.close_all_overlays()
    }

    pub fn ask(&mut self, prompt: impl Into<String>, mutation: Mutation) {
        self.confirm = Some(Confirm { prompt: prompt.into(), mutation });
    }

    pub fn confirm(&self) -> Option<&Confirm> {
        self.confirm.as_ref()
    }

    /// Operator accepted; hands back the mutation to send
    pub fn accept_confirm(&mut self) -> Option<Mutation> {
        self.confirm.take().map(|c| c.mutation)
    }

    pub fn cancel_confirm(&mut self) {
        self.confirm = None;
    }

    pub fn notify(&mut self, notice: Notice) {
        match notice.kind {
            NoticeKind::Error => log::warn!("{}", notice.text),
            _ => log::info!("{}", notice.text),
        }
        self.notices.push_back(notice);
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    // --- transient selection ---

    pub fn selected_video_id(&self) -> Option<i64> {
        self.selected_video_id
    }

    pub fn select_video(&mut self, id: Option<i64>) {
        self.selected_video_id = id;
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
