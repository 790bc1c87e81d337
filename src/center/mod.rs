//! Queueing stations of the checkpoint network
//!
//! # Overview
//!
//! Every center handles three events:
//!
//! - **Arrival**: close out time-weighted statistics, count the job in, stamp
//!   its queue entry, then start service or make it wait
//! - **Departure**: close out statistics, count the job out, record its
//!   response, queue and service times, route it onward, then free the server
//!   or start the next waiting job
//! - **Sampling**: record a snapshot of jobs, queue and busy servers
//!
//! Four disciplines implement the [`Center`] trait: [`InfiniteServer`],
//! [`SingleServerSingleQueue`], [`MultiServerSingleQueue`] and
//! [`MultiServerMultiQueue`]. [`CenterNode`] is the closed sum the
//! orchestrator stores.
//!
//! # Usage Example
//!
//! ```rust
//! use airport_checkpoint_sim::center::*;
//! use airport_checkpoint_sim::events::{Event, EventClock};
//! use airport_checkpoint_sim::network::{JobFactory, RoutingPoint};
//! use airport_checkpoint_sim::random::{RandomStreams, RandomVariateGenerator, ServiceProcess};
//! use airport_checkpoint_sim::stats::StatCollector;
//! use airport_checkpoint_sim::types::{CenterId, StreamId};
//! use std::sync::Arc;
//!
//! let service = ServiceProcess::new(RandomVariateGenerator::deterministic(5.0).unwrap(), StreamId(10));
//! let core = CenterCore::new(CenterId(0), "Desk", service, Arc::new(RoutingPoint::exit()));
//! let mut desk = SingleServerSingleQueue::new(core);
//!
//! let mut clock = EventClock::new();
//! let mut streams = RandomStreams::new(1);
//! let mut stats = StatCollector::new();
//! let mut ctx = CenterContext { clock: &mut clock, streams: &mut streams, stats: &mut stats, sampler: None, batches: None };
//!
//! let job = JobFactory::new().create(0.0);
//! desk.on_arrival(Event::arrival(0.0, CenterId(0), job), &mut ctx).unwrap();
//! assert!(desk.is_busy());
//! assert_eq!(ctx.clock.peek_time(), Some(5.0));
//! ```

pub mod common;
pub mod infinite_server;
pub mod multi_queue;
pub mod multi_server;
pub mod node;
pub mod single_server;

pub use common::*;
pub use infinite_server::*;
pub use multi_queue::*;
pub use multi_server::*;
pub use node::*;
pub use single_server::*;
