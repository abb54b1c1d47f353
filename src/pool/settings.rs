//! Pool sizing configuration.

/// What a bounded pool does when every unit is active and another spawn comes in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Exhausted {
    /// Refuse the spawn with `PoolError::Exhausted`.
    #[default]
    Fail,
    /// Take the oldest active unit and hand it out again.
    RecycleOldest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolSettings {
    /// Units preallocated by pools created lazily on first spawn.
    pub default_amount: usize,
    /// Upper bound on units per pool. `None` grows without limit.
    pub max_size: Option<usize>,
    /// Only consulted when `max_size` is set.
    pub on_exhausted: Exhausted,
}

impl PoolSettings {
    pub const DEFAULT_AMOUNT: usize = 10;

    pub fn bounded(max_size: usize, on_exhausted: Exhausted) -> Self {
        Self { max_size: Some(max_size), on_exhausted, ..Self::default() }
    }

    pub fn with_default_amount(mut self, amount: usize) -> Self {
        self.default_amount = amount;
        self
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self { default_amount: Self::DEFAULT_AMOUNT, max_size: None, on_exhausted: Exhausted::Fail }
    }
}
