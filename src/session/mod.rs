//! Session orchestration: phases, transitions, observers and the
//! controller that ties the components to a pose source.

mod controller;
mod machine;
mod observer;
mod state;

pub use controller::{SessionConfig, SessionController, TimerTag};
pub use machine::transition;
pub use observer::{GuidanceUpdate, SessionNotification, SessionObserver};
pub use state::{Effect, Event, Phase};
