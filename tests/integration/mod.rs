//! End-to-end anchoring scenarios against journal-style documents.

mod anchoring;
mod staleness;
