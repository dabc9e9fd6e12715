//! Subscription tiers and the premium design access predicate.
//!
//! The predicate is pure and takes `now` as an argument; callers re-evaluate
//! it on every access attempt because subscription state changes
//! independently of anything this crate sees.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// A user's subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionTier {
    Free,
    Premium,
}

impl SubscriptionTier {
    /// Return the tier name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::Premium => "PREMIUM",
        }
    }

    /// Parse a tier string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "FREE" => Some(Self::Free),
            "PREMIUM" => Some(Self::Premium),
            _ => None,
        }
    }

    /// All valid tier values.
    pub const ALL: &'static [&'static str] = &["FREE", "PREMIUM"];
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a subscription grants premium access at `now`.
///
/// An end date in the past means the subscription has lapsed even if the tier
/// column still says premium; no end date means the subscription is open.
pub fn premium_access(
    tier: SubscriptionTier,
    end_date: Option<Timestamp>,
    now: Timestamp,
) -> bool {
    tier == SubscriptionTier::Premium && end_date.is_none_or(|end| end > now)
}

/// Access decision for a design.
///
/// Non-premium designs are accessible to everyone, including users whose
/// account lookup failed. Premium designs require a live premium
/// subscription; a missing user is denied.
pub fn can_access_design(
    design_is_premium: bool,
    subscription: Option<(SubscriptionTier, Option<Timestamp>)>,
    now: Timestamp,
) -> bool {
    if !design_is_premium {
        return true;
    }
    match subscription {
        Some((tier, end_date)) => premium_access(tier, end_date, now),
        None => false,
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    // -- Tier parsing ---------------------------------------------------------

    #[test]
    fn tier_round_trips_through_strings() {
        assert_eq!(SubscriptionTier::from_str("PREMIUM"), Some(SubscriptionTier::Premium));
        assert_eq!(SubscriptionTier::from_str("FREE"), Some(SubscriptionTier::Free));
        assert_eq!(SubscriptionTier::from_str("GOLD"), None);
        assert_eq!(SubscriptionTier::Premium.as_str(), "PREMIUM");
    }

    // -- Premium predicate ----------------------------------------------------

    #[test]
    fn premium_with_future_end_date_allowed() {
        let now = Utc::now();
        assert!(premium_access(
            SubscriptionTier::Premium,
            Some(now + Duration::days(1)),
            now
        ));
    }

    #[test]
    fn premium_with_past_end_date_denied() {
        let now = Utc::now();
        assert!(!premium_access(
            SubscriptionTier::Premium,
            Some(now - Duration::days(1)),
            now
        ));
    }

    #[test]
    fn premium_without_end_date_allowed() {
        assert!(premium_access(SubscriptionTier::Premium, None, Utc::now()));
    }

    #[test]
    fn free_tier_never_has_premium_access() {
        let now = Utc::now();
        assert!(!premium_access(SubscriptionTier::Free, None, now));
        assert!(!premium_access(
            SubscriptionTier::Free,
            Some(now + Duration::days(365)),
            now
        ));
    }

    // -- Design access decision -----------------------------------------------

    #[test]
    fn non_premium_design_allowed_for_everyone() {
        let now = Utc::now();
        assert!(can_access_design(false, None, now));
        assert!(can_access_design(
            false,
            Some((SubscriptionTier::Free, None)),
            now
        ));
    }

    #[test]
    fn premium_design_denied_for_missing_user() {
        assert!(!can_access_design(true, None, Utc::now()));
    }

    #[test]
    fn premium_design_follows_subscription_state() {
        let now = Utc::now();
        assert!(can_access_design(
            true,
            Some((SubscriptionTier::Premium, Some(now + Duration::days(1)))),
            now
        ));
        assert!(!can_access_design(
            true,
            Some((SubscriptionTier::Premium, Some(now - Duration::days(1)))),
            now
        ));
    }
}
