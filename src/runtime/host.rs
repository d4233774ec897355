//! The host page the coordinator drives.
//!
//! Everything the coordinator cannot do by itself (reloading, navigating,
//! submitting the form, asking a yes/no question, toggling the spinner and
//! applying a new view) goes through [`Host`].

use crate::app::SubmitOrigin;
use crate::domain::FilterQuery;
use crate::ui::PageViewModel;
use std::collections::VecDeque;

pub trait Host {
    fn reload(&mut self);

    fn navigate(&mut self, url: &str);

    /// Synchronous yes/no gate. `true` means the user agreed.
    fn confirm(&mut self, prompt: &str) -> bool;

    /// Submits the filter form. For [`SubmitOrigin::Native`] the browser is
    /// already submitting and the host must not send another request.
    fn submit_filter(&mut self, query: &FilterQuery, origin: SubmitOrigin);

    fn set_spinner(&mut self, visible: bool);

    fn render(&mut self, view: &PageViewModel);
}

/// What a [`RecordingHost`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEffect {
    Reload,
    Navigate(String),
    Confirm { prompt: String, answer: bool },
    Submit { query: FilterQuery, origin: SubmitOrigin },
    Spinner(bool),
}

/// Host that records effects and answers confirmations from a queue.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub effects: Vec<HostEffect>,
    answers: VecDeque<bool>,
    default_answer: bool,
    last_view: Option<PageViewModel>,
    renders: usize,
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer given when no queued answer is left. Defaults to declining.
    #[must_use]
    pub fn answering(mut self, answer: bool) -> Self {
        self.default_answer = answer;
        self
    }

    /// Queues the answer for the next confirmation prompt.
    pub fn queue_answer(&mut self, answer: bool) {
        self.answers.push_back(answer);
    }

    #[must_use]
    pub fn last_view(&self) -> Option<&PageViewModel> {
        self.last_view.as_ref()
    }

    #[must_use]
    pub const fn render_count(&self) -> usize {
        self.renders
    }

    /// Submissions in order, native ones included.
    #[must_use]
    pub fn submissions(&self) -> Vec<(&FilterQuery, SubmitOrigin)> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                HostEffect::Submit { query, origin } => Some((query, *origin)),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn reload_count(&self) -> usize {
        self.effects.iter().filter(|e| **e == HostEffect::Reload).count()
    }

    /// Drains recorded effects, e.g. to print them between replay steps.
    pub fn take_effects(&mut self) -> Vec<HostEffect> {
        std::mem::take(&mut self.effects)
    }
}

impl Host for RecordingHost {
    fn reload(&mut self) {
        self.effects.push(HostEffect::Reload);
    }

    fn navigate(&mut self, url: &str) {
        self.effects.push(HostEffect::Navigate(url.to_string()));
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        let answer = self.answers.pop_front().unwrap_or(self.default_answer);
        self.effects.push(HostEffect::Confirm {
            prompt: prompt.to_string(),
            answer,
        });
        answer
    }

    fn submit_filter(&mut self, query: &FilterQuery, origin: SubmitOrigin) {
        self.effects.push(HostEffect::Submit {
            query: query.clone(),
            origin,
        });
    }

    fn set_spinner(&mut self, visible: bool) {
        self.effects.push(HostEffect::Spinner(visible));
    }

    fn render(&mut self, view: &PageViewModel) {
        self.renders += 1;
        self.last_view = Some(view.clone());
    }
}
