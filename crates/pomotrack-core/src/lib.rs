//! # Pomotrack Core Library
//!
//! This library provides the core logic for the Pomotrack interval timer:
//! a work/break countdown and a task list annotated with how many work
//! intervals each task has consumed. Everything is in memory; a session
//! lasts as long as the process.
//!
//! ## Architecture
//!
//! - **Session Controller**: An integer-second state machine that requires
//!   the caller to deliver one `tick()` per elapsed second
//! - **Task Ledger**: Ordered tasks plus the active-task selection that
//!   receives credit for completed work intervals
//! - **Application State**: The single command surface over both
//! - **Pulse Driver**: The tokio task that delivers the one-second ticks
//!
//! ## Key Components
//!
//! - [`SessionController`]: Core timer state machine
//! - [`TaskLedger`]: Task collection and work-unit counters
//! - [`AppState`]: Composition of the two, producing [`Event`]s
//! - [`Config`]: Application configuration management

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod pulse;
pub mod stats;
pub mod task;
pub mod timer;

pub use app::{AppState, SharedApp};
pub use config::Config;
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use pulse::PulseDriver;
pub use stats::Stats;
pub use task::{NewTask, Task, TaskFilter, TaskId, TaskLedger, TaskPatch};
pub use timer::{format_time, IntervalKind, SessionController, Settings, WorkUnitSink};
