//! Scheduling-conflict engine and draft-assignment manager for driver
//! dispatch calendars.
//!
//! Computes each appointment's effective (transit-inclusive) time window,
//! detects visual overlaps and driver double-bookings, holds speculative
//! driver assignments in an in-memory overlay until a batch commit, and
//! persists edits through a debounced, eventually-consistent write path.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Appointment`, `Driver`, `Clinic`,
//!   `DraftRecord`, `TimeWindow`
//! - **`overlap`**: Per-appointment visual-overlap grouping for same-day
//!   side-by-side layout
//! - **`conflict`**: Per-driver pairwise double-booking detection over
//!   effective assignments
//! - **`draft`**: In-memory appointment → driver override map, source of
//!   truth until submit
//! - **`gateway`**: Debounced, at-most-one-in-flight-per-flush draft
//!   write path with last-editor tracking
//! - **`layout`**: Appointment + overlap info → grid pixel geometry
//! - **`submit`**: Validate, batch-commit, and reconcile against server
//!   truth
//! - **`board`**: Page controller owning UI state and the derived-state
//!   pipeline
//! - **`backend`**: Traits for the external collaborators (data gateway,
//!   persistence, notifications)
//! - **`validation`**: Structural integrity checks on loaded data
//!
//! # Concurrency Model
//!
//! Single-session, UI-event-driven. Detection and layout are synchronous
//! and recomputed in full on every trigger. The only suspension points
//! are network calls: data load, draft flush, submit. Drafts are owned by
//! the current session; concurrent editors overwrite each other
//! last-write-wins.

pub mod backend;
pub mod board;
pub mod conflict;
pub mod draft;
pub mod gateway;
pub mod layout;
pub mod models;
pub mod overlap;
pub mod submit;
pub mod validation;
