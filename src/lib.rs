//! Willow lead engine
//!
//! Scores real-estate contacts from behavioral signals, classifies them into
//! priority tiers, detects re-engagement triggers and derives CMA
//! (comparative market analysis) parameters from property geodata.
//!
//! ## Call chain
//! Provider record -> normalize (`signals` / `property`) -> pure decision
//! components -> merged response.
//!
//! The decision components (`scoring`, `priority`, `triggers`, `protocol`,
//! `guidance`) are synchronous pure functions. Everything that touches the
//! network lives in `providers`, and the HTTP surface lives in `api`
//! behind the `server` feature.
//!
//! ## Quick Start
//!
//! ```rust
//! use willow_leads::{assessment::LeadAssessment, priority::PriorityTier, signals::SignalBundle};
//!
//! let bundle = SignalBundle {
//!     fello_score: 85,
//!     fello_email_clicks: 10,
//!     cloud_cma_request_count: 3,
//!     ..Default::default()
//! };
//! let assessment = LeadAssessment::evaluate(&bundle);
//! assert_eq!(assessment.score.score, 57);
//! assert_eq!(assessment.priority, PriorityTier::Hot);
//! ```

// Core error handling
pub mod error;

// Environment configuration
pub mod config;

// Input normalization
pub mod property;
pub mod signals;

// Decision components
pub mod assessment;
pub mod guidance;
pub mod priority;
pub mod protocol;
pub mod scoring;
pub mod triggers;

// Client-visible renderers (only accept client-safe scripts)
pub mod channels;

// Daily prep-action counter
pub mod momentum;

// External collaborators (CRM, property data, CMA generation)
pub mod providers;

// REST API (when enabled)
#[cfg(feature = "server")]
pub mod api;

pub use assessment::LeadAssessment;
pub use guidance::{map_guidance, ClientScript, GuidanceEntry, GuidanceKey};
pub use priority::{classify, PriorityTier};
pub use protocol::{select_protocol, CmaDefaults, CmaProtocol, ProtocolSelection};
pub use scoring::{compute_score, BehavioralScoreEngine, ScoreBreakdown, ScoreResult};
pub use signals::SignalBundle;
pub use triggers::{detect_triggers, Trigger, TriggerSet};
