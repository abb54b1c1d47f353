use thiserror::Error;

use super::unit::TemplateId;

/// Failures surfaced by the pooling API.
///
/// `MissingPool` is a caller bug (precondition violation). It is returned rather than
/// panicking so the caller decides how loudly to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("no pool exists for {0}; spawn or preload it first")]
    MissingPool(TemplateId),

    #[error("{0} is not registered with the host")]
    UnknownTemplate(TemplateId),

    #[error("pool for {template} is full ({max} units) and refuses to grow")]
    Exhausted { template: TemplateId, max: usize },
}
