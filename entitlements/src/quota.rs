//! Quota calculation for mock packages.
//!
//! Derives, from an approved ticket, how many quota-limited content items
//! are visible. The formula is `mocks_purchased * mocks_per_unit`, with the
//! free-tier floor when nothing was purchased.

use crate::config::QuotaPolicy;

/// Number of mock items visible for a ticket.
///
/// Truncates at `item_count`; never pads past the items that exist.
///
/// # Examples
///
/// ```
/// use learngate_entitlements::config::QuotaPolicy;
/// use learngate_entitlements::quota::visible_mock_count;
///
/// let policy = QuotaPolicy::new();
/// assert_eq!(visible_mock_count(&policy, 2, 20), 16);
/// assert_eq!(visible_mock_count(&policy, 0, 20), 8); // free tier
/// assert_eq!(visible_mock_count(&policy, 5, 12), 12); // truncated
/// ```
#[must_use]
pub fn visible_mock_count(policy: &QuotaPolicy, mocks_purchased: u32, item_count: usize) -> usize {
    let quota = if mocks_purchased == 0 {
        policy.free_tier_mocks
    } else {
        mocks_purchased.saturating_mul(policy.mocks_per_unit)
    };
    (quota as usize).min(item_count)
}
