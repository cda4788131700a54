use dirprobe_common::{ElementHandle, Locator};

/// The candidate that matched, with every element it matched. Only
/// [`Resolved::new`] builds one, so `elements` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    locator: Locator,
    candidate_index: usize,
    elements: Vec<ElementHandle>,
}

impl Resolved {
    /// `None` when `elements` is empty.
    pub fn new(locator: Locator, candidate_index: usize, elements: Vec<ElementHandle>) -> Option<Self> {
        if elements.is_empty() {
            return None;
        }
        Some(Self {
            locator,
            candidate_index,
            elements,
        })
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Position of the matching locator within its candidate list.
    pub fn candidate_index(&self) -> usize {
        self.candidate_index
    }

    pub fn elements(&self) -> &[ElementHandle] {
        &self.elements
    }

    pub fn first(&self) -> ElementHandle {
        self.elements[0]
    }

    pub fn nth(&self, index: usize) -> Option<ElementHandle> {
        self.elements.get(index).copied()
    }

    pub fn count(&self) -> usize {
        self.elements.len()
    }
}

/// Result of a resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(Resolved),
    /// Every candidate was tried; none matched (or each one errored).
    NotFound {
        target: String,
        attempted: Vec<String>,
    },
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn found(self) -> Option<Resolved> {
        match self {
            Resolution::Found(resolved) => Some(resolved),
            Resolution::NotFound { .. } => None,
        }
    }

    pub fn as_found(&self) -> Option<&Resolved> {
        match self {
            Resolution::Found(resolved) => Some(resolved),
            Resolution::NotFound { .. } => None,
        }
    }
}
