//! Keyed object pooling, independent of the ECS.
//!
//! ```text
//!   PoolRegistry ──template──▶ Pool ──┬── free   (VecDeque, FIFO reuse)
//!        │                             └── active (VecDeque, spawn order)
//!        └── OwnerLedger: instance ──▶ owning template
//! ```
//!
//! The engine is reached only through [`PoolHost`]. The Bevy side lives in
//! `plugins::pooling`, which implements the host over a `World`.

mod error;
mod host;
mod ledger;
mod queue;
mod registry;
mod settings;
mod unit;

pub use error::PoolError;
pub use host::PoolHost;
pub use ledger::Ownership;
pub use queue::Pool;
pub use registry::{Despawned, PoolRegistry};
pub use settings::{Exhausted, PoolSettings};
pub use unit::{PooledUnit, TemplateId, UnitId};
