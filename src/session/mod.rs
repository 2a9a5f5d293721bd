//! UI-facing interaction layers over an [`AdvisorAgent`](crate::advisor::AdvisorAgent).
//!
//! [`AdvisorSession`] is the free-form chat: a bounded transcript where every
//! failure becomes an apology reply. [`AdvisorFlow`] is the guided form that
//! captures industry, budget and timeline before a single analysis.

mod chat;
mod flow;

pub use chat::{
    AdvisorSession, ChatMessage, MessageRole, SessionConfig, APOLOGY_MESSAGE,
};
pub use flow::{AdvisorFlow, FlowStep, BUDGET_RANGES, INDUSTRIES, TIMELINE_OPTIONS};
