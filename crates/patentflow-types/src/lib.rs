//! Domain types for the patent prosecution pipeline
//!
//! A patent moves through translation, document assembly, attorney review,
//! USPTO filing, Office Action response, and registration. Three UI
//! subsystems (translation, document preparation, filing) each observe only
//! part of that state, so the model here is deliberately strict:
//!
//! - **Stage**: the single authoritative lifecycle position of a patent.
//!   It changes only through a recorded [`WorkflowTransition`].
//! - **DocumentSet / DocumentItem**: the required-document checklist. Item
//!   status is derived from upload facts, never stored independently.
//! - **OaRound**: one Office Action cycle; rounds are ordered by a dense,
//!   1-based sequence number.
//! - **WorkflowTransition**: the immutable, append-only audit record of a
//!   stage change — the only legitimate way a stage moves.
//!
//! # Design Principles
//!
//! 1. Stages and slots are closed enumerations, not strings. A missing
//!    label is a compile-time gap, not a runtime `undefined`.
//! 2. Derived state (item status, completion fraction) is recomputed from
//!    inputs on every read.
//! 3. Every stage change is auditable through the transition log.

#![deny(unsafe_code)]

mod document;
mod errors;
mod filing;
mod ids;
mod oa;
mod patent;
mod stage;
mod transition;

pub use document::*;
pub use errors::*;
pub use filing::*;
pub use ids::*;
pub use oa::*;
pub use patent::*;
pub use stage::*;
pub use transition::*;
