mod controller;
mod kind;
mod settings;

pub use controller::{SessionController, WorkUnitSink};
pub use kind::{format_time, IntervalKind};
pub use settings::{
    Settings, MAX_LONG_BREAK_INTERVAL, MAX_LONG_BREAK_MINUTES, MAX_SHORT_BREAK_MINUTES,
    MAX_WORK_MINUTES,
};
