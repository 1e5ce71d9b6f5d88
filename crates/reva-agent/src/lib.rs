// SPDX-FileCopyrightText: 2026 Reva Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query pipeline and session management for the Reva chatbot.
//!
//! Control flow per user turn:
//!
//! ```text
//! history + question
//!     -> QueryRouter (conversational | data)
//!         -> conversational: ResponseComposer short-circuits
//!         -> data: DataQueryEngine (generate -> execute -> bounded retry)
//!                  -> ResponseComposer
//!     -> answer appended to the session log
//! ```
//!
//! The [`ChatSession`] entry point never fails a turn: degraded paths
//! produce fixed apology text plus a machine-readable error field.

pub mod compose;
pub mod session;
pub mod state;
pub mod synth;

pub use compose::{
    COMPOSE_FAILURE_APOLOGY, NO_RESULT_APOLOGY, RETRY_EXHAUSTED_APOLOGY, ResponseComposer,
};
pub use session::{ChatOutcome, ChatSession, SessionConfig};
pub use state::{QueryState, SynthOutcome, SynthPhase};
pub use synth::DataQueryEngine;
