use crate::api::types::LinkSummary;

/// An entry offered below the input: an existing link, or the offer to
/// shorten the typed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Existing { alias: String, target: String },
    Create { target: String },
}

impl Candidate {
    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create { .. })
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            Self::Existing { alias, .. } => Some(alias.as_str()),
            Self::Create { .. } => None,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::Existing { target, .. } | Self::Create { target } => target.as_str(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Existing { alias, target } => format!("{} → {}", alias, target),
            Self::Create { target } => format!("Shorten \"{}\"", target),
        }
    }
}

impl From<&LinkSummary> for Candidate {
    fn from(hit: &LinkSummary) -> Self {
        Self::Existing {
            alias: hit.alias.clone(),
            target: hit.target.clone(),
        }
    }
}

/// Map search hits to candidates and append the create offer last, unless the
/// query is empty or already names one of the hits exactly.
pub fn build_candidates(results: &[LinkSummary], query: &str) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = results.iter().map(Candidate::from).collect();
    let exact = results
        .iter()
        .any(|hit| hit.alias == query || hit.target == query);
    if !query.is_empty() && !exact {
        candidates.push(Candidate::Create {
            target: query.to_string(),
        });
    }
    candidates
}
