//! Events and the event clock
//!
//! # Overview
//!
//! - **Event**: immutable `{time, kind, target, job, tag}` record; no target means system exit
//! - **EventClock**: min-heap future event list with FIFO tie-breaking and a monotone clock
//!
//! # Usage Example
//!
//! ```rust
//! use airport_checkpoint_sim::events::{Event, EventClock};
//! use airport_checkpoint_sim::types::CenterId;
//!
//! let mut clock = EventClock::new();
//! clock.schedule(Event::sampling(60.0, CenterId(0)))?;
//! clock.schedule(Event::sampling(30.0, CenterId(1)))?;
//!
//! let first = clock.pop_earliest()?;
//! assert_eq!(first.time, 30.0);
//! assert_eq!(clock.current_time(), 30.0);
//! # Ok::<(), airport_checkpoint_sim::simulation::SimulationError>(())
//! ```

pub mod clock;
pub mod event;

pub use clock::*;
pub use event::*;
