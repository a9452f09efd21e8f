//! Quota configuration.
//!
//! Policy values should be provided by the application; the defaults match
//! the catalog constants the business operates with today.

/// Quota policy for mock packages.
///
/// One purchased "mock unit" unlocks `mocks_per_unit` mock-test content
/// items. A ticket with zero purchased units still sees the
/// `free_tier_mocks` floor rather than nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaPolicy {
    /// Mock-test items unlocked per purchased unit.
    ///
    /// Default: 8
    pub mocks_per_unit: u32,

    /// Items visible when `mocks_purchased` is zero.
    ///
    /// Default: 8
    pub free_tier_mocks: u32,
}

impl QuotaPolicy {
    /// Create the default quota policy.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mocks_per_unit: 8,
            free_tier_mocks: 8,
        }
    }

    /// Set items unlocked per purchased unit.
    #[must_use]
    pub const fn with_mocks_per_unit(mut self, per_unit: u32) -> Self {
        self.mocks_per_unit = per_unit;
        self
    }

    /// Set the free-tier floor.
    #[must_use]
    pub const fn with_free_tier(mut self, free_tier: u32) -> Self {
        self.free_tier_mocks = free_tier;
        self
    }
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self::new()
    }
}
