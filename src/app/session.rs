//! Find-or-shorten session: the controller behind the search box.
//!
//! Every transition mutates the session synchronously and returns the
//! [`Effect`]s the runner must perform. Async work reports back tagged with the
//! request id or debounce generation it was started with; anything that no
//! longer matches the session is dropped.

use tracing::{debug, info, warn};

use crate::api::types::{LinkSummary, Rustlink};
use crate::error::ErrorKind;

use super::input::InputLine;
use super::search::{build_candidates, Candidate};

pub type RequestId = u64;

/// Inputs shorter than this never reach the link store.
pub const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Idle,
    Loading {
        request: RequestId,
        candidate: Candidate,
    },
    Resolved(Rustlink),
    Failed(ErrorKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// (Re)start the debounce timer, replacing any running one.
    ScheduleSearch { generation: u64 },
    CancelDebounce,
    Search { request: RequestId, query: String },
    CancelSearch,
    Lookup { request: RequestId, alias: String },
    Create { request: RequestId, target: String },
    CancelResolution,
}

#[derive(Debug)]
pub struct Session {
    input: InputLine,
    results: Vec<LinkSummary>,
    candidates: Vec<Candidate>,
    selected: usize,
    resolution: Resolution,
    pending_search: Option<RequestId>,
    debounce_generation: u64,
    last_request: RequestId,
    error: Option<ErrorKind>,
    min_query_len: usize,
}

impl Session {
    pub fn new(min_query_len: usize) -> Self {
        Self {
            input: InputLine::default(),
            results: Vec::new(),
            candidates: Vec::new(),
            selected: 0,
            resolution: Resolution::Idle,
            pending_search: None,
            debounce_generation: 0,
            last_request: 0,
            error: None,
            min_query_len: min_query_len.max(MIN_QUERY_LEN),
        }
    }

    pub fn input(&self) -> &InputLine {
        &self.input
    }

    pub fn input_text(&self) -> String {
        self.input.normalized()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn loading(&self) -> bool {
        matches!(self.resolution, Resolution::Loading { .. })
    }

    pub fn resolved_link(&self) -> Option<&Rustlink> {
        match &self.resolution {
            Resolution::Resolved(link) => Some(link),
            _ => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error
    }

    pub fn pending_search(&self) -> Option<RequestId> {
        self.pending_search
    }

    pub fn searching(&self) -> bool {
        self.pending_search.is_some()
    }

    /// Replace the input wholesale.
    pub fn set_input(&mut self, text: &str) -> Vec<Effect> {
        self.edit_input(|line| *line = InputLine::new(text))
    }

    /// Apply an edit to the input line. Pure cursor moves change nothing else.
    pub fn edit_input(&mut self, edit: impl FnOnce(&mut InputLine)) -> Vec<Effect> {
        let before = self.input.text();
        edit(&mut self.input);
        if self.input.text() == before {
            return Vec::new();
        }
        self.input_changed()
    }

    fn input_changed(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();

        if let Resolution::Loading { request, .. } = self.resolution {
            debug!(request, "input edited, abandoning outstanding resolution");
            effects.push(Effect::CancelResolution);
        }
        self.resolution = Resolution::Idle;
        self.error = None;

        // Whatever was in flight answered an older query.
        self.debounce_generation += 1;
        if self.pending_search.take().is_some() {
            effects.push(Effect::CancelSearch);
        }

        let query = self.input.normalized();
        if self.is_searchable(&query) {
            self.set_candidates(build_candidates(&self.results, &query));
            effects.push(Effect::ScheduleSearch {
                generation: self.debounce_generation,
            });
        } else {
            self.results.clear();
            self.set_candidates(Vec::new());
            effects.push(Effect::CancelDebounce);
        }
        effects
    }

    /// The debounce timer for `generation` fired.
    pub fn debounce_elapsed(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.debounce_generation {
            debug!(generation, current = self.debounce_generation, "ignoring superseded debounce");
            return Vec::new();
        }
        // A generation fires at most once.
        self.debounce_generation += 1;

        let query = self.input.normalized();
        if !self.is_searchable(&query) || self.loading() {
            return Vec::new();
        }

        let request = self.next_request();
        self.pending_search = Some(request);
        debug!(request, %query, "issuing search");
        vec![Effect::Search { request, query }]
    }

    pub fn search_settled(
        &mut self,
        request: RequestId,
        outcome: Result<Vec<LinkSummary>, ErrorKind>,
    ) {
        if self.pending_search != Some(request) {
            debug!(request, pending = ?self.pending_search, "dropping stale search response");
            return;
        }
        self.pending_search = None;

        match outcome {
            Ok(results) => {
                debug!(request, hits = results.len(), "search settled");
                self.results = results;
                if self.error == Some(ErrorKind::SearchFailed) {
                    self.error = None;
                }
            }
            Err(kind) => {
                warn!(request, ?kind, "search failed, offering create only");
                self.results.clear();
                self.error = Some(kind);
            }
        }
        let query = self.input.normalized();
        self.set_candidates(build_candidates(&self.results, &query));
    }

    pub fn select_highlighted(&mut self) -> Vec<Effect> {
        self.select_candidate(self.selected)
    }

    pub fn select_candidate(&mut self, index: usize) -> Vec<Effect> {
        if let Resolution::Loading { request, .. } = self.resolution {
            debug!(request, "selection ignored while resolution is outstanding");
            return Vec::new();
        }
        let Some(candidate) = self.candidates.get(index).cloned() else {
            return Vec::new();
        };

        let mut effects = Vec::new();
        // A resolution and a search are never outstanding together.
        self.debounce_generation += 1;
        effects.push(Effect::CancelDebounce);
        if self.pending_search.take().is_some() {
            effects.push(Effect::CancelSearch);
        }

        let request = self.next_request();
        self.selected = index;
        self.error = None;
        effects.push(match &candidate {
            Candidate::Existing { alias, .. } => Effect::Lookup {
                request,
                alias: alias.clone(),
            },
            Candidate::Create { target } => Effect::Create {
                request,
                target: target.clone(),
            },
        });
        debug!(request, ?candidate, "resolution started");
        self.resolution = Resolution::Loading { request, candidate };
        effects
    }

    pub fn resolution_settled(&mut self, request: RequestId, outcome: Result<Rustlink, ErrorKind>) {
        let candidate = match &self.resolution {
            Resolution::Loading {
                request: current,
                candidate,
            } if *current == request => candidate.clone(),
            _ => {
                debug!(request, "dropping stale resolution response");
                return;
            }
        };

        match outcome {
            Ok(link) => {
                info!(request, alias = %link.alias, target = %link.target, "link resolved");
                if let Candidate::Create { target } = &candidate {
                    self.adopt_created(&link, target);
                }
                self.resolution = Resolution::Resolved(link);
            }
            Err(kind) => {
                warn!(request, ?kind, "resolution failed");
                self.error = Some(kind);
                self.resolution = Resolution::Failed(kind);
            }
        }
    }

    /// Full reset: input, candidates, resolution and every outstanding request.
    pub fn clear(&mut self) -> Vec<Effect> {
        self.input.clear();
        self.results.clear();
        self.set_candidates(Vec::new());
        self.resolution = Resolution::Idle;
        self.pending_search = None;
        self.debounce_generation += 1;
        self.error = None;
        vec![
            Effect::CancelDebounce,
            Effect::CancelSearch,
            Effect::CancelResolution,
        ]
    }

    pub fn highlight_next(&mut self) {
        if !self.candidates.is_empty() && self.selected < self.candidates.len() - 1 {
            self.selected += 1;
        }
    }

    pub fn highlight_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// List a freshly created link as existing so the create offer for the
    /// same text cannot be selected again.
    fn adopt_created(&mut self, link: &Rustlink, submitted: &str) {
        self.results.retain(|hit| hit.alias != link.alias);
        self.results.insert(
            0,
            LinkSummary {
                alias: link.alias.clone(),
                target: link.target.clone(),
            },
        );
        let query = self.input.normalized();
        let mut candidates = build_candidates(&self.results, &query);
        // The store may normalise the target; the submitted text is still taken.
        candidates.retain(|c| !matches!(c, Candidate::Create { target } if target == submitted));
        self.set_candidates(candidates);
    }

    fn is_searchable(&self, query: &str) -> bool {
        query.chars().count() >= self.min_query_len
    }

    fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.selected = 0;
    }

    fn next_request(&mut self) -> RequestId {
        self.last_request += 1;
        self.last_request
    }
}
