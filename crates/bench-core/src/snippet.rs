//! Producer-facing data types: identifiers, snippets, roles, and samples.

/// Opaque 64-bit handle assigned by the producer.
pub type Id = u64;

/// Reserved identifier denoting the empty control-group snippet.
pub const CONTROL_ID: Id = 0;

/// A machine-code blob plus the identifier the producer wants it tracked
/// under. The byte sequence must end with a valid return instruction for the
/// host ABI; `bench-core` does not validate this — the bytes are trusted
/// input produced by an external assembler front-end.
#[derive(Debug, Clone)]
pub struct Snippet {
    pub id: Id,
    pub bytes: Vec<u8>,
}

impl Snippet {
    pub fn new(id: Id, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            bytes: bytes.into(),
        }
    }

    /// The empty baseline snippet: just a bare return instruction for the
    /// host architecture.
    pub fn baseline() -> Self {
        Self::new(CONTROL_ID, crate::trampoline::RET_ONLY)
    }
}

/// Tagged replacement for comparing every `Id` against `CONTROL_ID` at each
/// call site (see REDESIGN FLAGS in the design doc). Computed once when a
/// snippet is ingested and carried alongside its region from then on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetRole {
    Baseline,
    Candidate(Id),
}

impl SnippetRole {
    pub fn of(id: Id) -> Self {
        if id == CONTROL_ID {
            SnippetRole::Baseline
        } else {
            SnippetRole::Candidate(id)
        }
    }

    pub fn id(self) -> Id {
        match self {
            SnippetRole::Baseline => CONTROL_ID,
            SnippetRole::Candidate(id) => id,
        }
    }

    pub fn is_baseline(self) -> bool {
        matches!(self, SnippetRole::Baseline)
    }
}

/// One (candidate, round) measurement: signed per-iteration cycle cost,
/// already baseline-subtracted and divided by the repeat count in effect
/// when it was taken.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub id: Id,
    pub cycles: f64,
}

impl Sample {
    pub fn new(id: Id, cycles: f64) -> Self {
        Self { id, cycles }
    }
}

/// A pending cancellation request for a previously-registered `Id`.
/// Modeled as a distinct type (rather than a bare `Id`) so the cancel queue
/// and the machine-code queue can't be confused at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancel(pub Id);
