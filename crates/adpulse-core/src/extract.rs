// Canonical field extraction over source-specific nested payloads
//
// Each advertising platform nests the same logical attribute in a different
// place, and the shape also varies by funnel stage. This module maps a
// canonical field name to its physical location. Every lookup degrades to
// `None` on a missing node, wrong type, or failed numeric validation —
// extraction never fails a query.

use serde_json::Value;

use crate::event::{EventSource, FunnelStage};
use crate::numeric::{parse_strict_count, parse_strict_decimal};

/// Logical attribute whose physical payload location varies by source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Country,
    UserId,
    DisplayName,
    CampaignId,
    PurchaseAmount,
    FollowerCount,
}

/// Resolve a canonical field inside a payload, dispatching on
/// `(source, funnel_stage, field)`
///
/// Fields a given source/stage combination cannot carry resolve to `None`
/// (e.g. `CampaignId` outside facebook bottom-funnel payloads).
pub fn extract<'a>(
    source: EventSource,
    funnel_stage: FunnelStage,
    payload: &'a Value,
    field: CanonicalField,
) -> Option<&'a Value> {
    match (field, source, funnel_stage) {
        (CanonicalField::Country, _, _) => path(payload, &["user", "location", "country"])
            .or_else(|| path(payload, &["engagement", "country"])),
        (CanonicalField::UserId, _, _) => path(payload, &["user", "userId"]),
        (CanonicalField::DisplayName, EventSource::Facebook, _) => path(payload, &["user", "name"]),
        (CanonicalField::DisplayName, EventSource::Tiktok, _) => {
            path(payload, &["user", "username"])
        }
        (CanonicalField::CampaignId, EventSource::Facebook, FunnelStage::Bottom) => {
            path(payload, &["engagement", "campaignId"])
        }
        (CanonicalField::CampaignId, _, _) => None,
        (CanonicalField::PurchaseAmount, _, FunnelStage::Bottom) => {
            path(payload, &["engagement", "purchaseAmount"])
        }
        (CanonicalField::PurchaseAmount, _, FunnelStage::Top) => None,
        (CanonicalField::FollowerCount, EventSource::Tiktok, _) => {
            path(payload, &["user", "followers"])
        }
        (CanonicalField::FollowerCount, EventSource::Facebook, _) => None,
    }
}

fn path<'a>(payload: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    let mut node = payload;
    for segment in segments {
        node = node.get(segment)?;
    }
    Some(node)
}

fn path_str<'a>(payload: &'a Value, segments: &[&str]) -> Option<&'a str> {
    path(payload, segments).and_then(Value::as_str)
}

/// Canonical country accessor: facebook path first, tiktok path as fallback,
/// independent of the source tag
///
/// Country grouping runs one pass over a mixed-source population, so the
/// accessor must not depend on per-event dispatch.
pub fn country(payload: &Value) -> Option<&str> {
    path_str(payload, &["user", "location", "country"])
        .or_else(|| path_str(payload, &["engagement", "country"]))
}

/// `user.userId`, identical for both sources
pub fn user_id(payload: &Value) -> Option<&str> {
    path_str(payload, &["user", "userId"])
}

/// Human-readable user name: facebook `user.name`, tiktok `user.username`
pub fn display_name(source: EventSource, payload: &Value) -> Option<&str> {
    match source {
        EventSource::Facebook => path_str(payload, &["user", "name"]),
        EventSource::Tiktok => path_str(payload, &["user", "username"]),
    }
}

/// `engagement.campaignId`; only facebook conversion payloads carry it
pub fn campaign_id(payload: &Value) -> Option<&str> {
    path_str(payload, &["engagement", "campaignId"])
}

/// Raw `engagement.purchaseAmount` string, present or not
///
/// This is the presence test used by purchase counters: a non-null string at
/// the path counts even when it fails numeric validation.
pub fn purchase_amount_raw(payload: &Value) -> Option<&str> {
    path_str(payload, &["engagement", "purchaseAmount"])
}

/// `engagement.purchaseAmount` validated as a strict decimal
pub fn purchase_amount(payload: &Value) -> Option<f64> {
    purchase_amount_raw(payload).and_then(parse_strict_decimal)
}

/// Tiktok `user.followers` validated as a strict non-negative integer
pub fn follower_count(payload: &Value) -> Option<u64> {
    path_str(payload, &["user", "followers"]).and_then(parse_strict_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn facebook_bottom() -> Value {
        json!({
            "user": {
                "userId": "fb-u1",
                "name": "Ada",
                "location": { "country": "NO", "city": "Oslo" }
            },
            "engagement": {
                "adId": "ad-1",
                "campaignId": "camp-9",
                "purchaseAmount": "10.50"
            }
        })
    }

    fn tiktok_bottom() -> Value {
        json!({
            "user": {
                "userId": "tt-u1",
                "username": "ada_tt",
                "followers": "1000"
            },
            "engagement": {
                "actionId": "act-1",
                "country": "SE",
                "purchaseAmount": "bad"
            }
        })
    }

    #[test]
    fn test_country_tries_facebook_path_then_tiktok_path() {
        assert_eq!(country(&facebook_bottom()), Some("NO"));
        assert_eq!(country(&tiktok_bottom()), Some("SE"));
        assert_eq!(country(&json!({})), None);
    }

    #[test]
    fn test_display_name_per_source() {
        assert_eq!(
            display_name(EventSource::Facebook, &facebook_bottom()),
            Some("Ada")
        );
        assert_eq!(
            display_name(EventSource::Tiktok, &tiktok_bottom()),
            Some("ada_tt")
        );
        // Wrong path for the source resolves absent, not to the other name
        assert_eq!(display_name(EventSource::Tiktok, &facebook_bottom()), None);
    }

    #[test]
    fn test_purchase_presence_vs_validity() {
        // Present and valid
        assert_eq!(purchase_amount_raw(&facebook_bottom()), Some("10.50"));
        assert_eq!(purchase_amount(&facebook_bottom()), Some(10.5));
        // Present but not numeric: counts as present, sums as absent
        assert_eq!(purchase_amount_raw(&tiktok_bottom()), Some("bad"));
        assert_eq!(purchase_amount(&tiktok_bottom()), None);
        // JSON null is not present
        let nulled = json!({ "engagement": { "purchaseAmount": null } });
        assert_eq!(purchase_amount_raw(&nulled), None);
    }

    #[test]
    fn test_wrong_type_is_absent() {
        // Numeric JSON where a string is expected does not validate
        let typed = json!({ "engagement": { "purchaseAmount": 7 } });
        assert_eq!(purchase_amount_raw(&typed), None);
        assert_eq!(purchase_amount(&typed), None);

        let scalar = json!({ "user": "not-an-object" });
        assert_eq!(user_id(&scalar), None);
        assert_eq!(country(&scalar), None);
    }

    #[test]
    fn test_follower_count_validation() {
        assert_eq!(follower_count(&tiktok_bottom()), Some(1000));
        let bad = json!({ "user": { "followers": "not-a-number" } });
        assert_eq!(follower_count(&bad), None);
        let negative = json!({ "user": { "followers": "-5" } });
        assert_eq!(follower_count(&negative), None);
    }

    #[test]
    fn test_dispatch_gates_fields_by_source_and_stage() {
        let fb = facebook_bottom();
        let tt = tiktok_bottom();

        assert!(extract(
            EventSource::Facebook,
            FunnelStage::Bottom,
            &fb,
            CanonicalField::CampaignId
        )
        .is_some());
        // Tiktok payloads never carry a campaign id
        assert!(extract(
            EventSource::Tiktok,
            FunnelStage::Bottom,
            &tt,
            CanonicalField::CampaignId
        )
        .is_none());
        // Awareness-stage payloads never carry purchase data
        assert!(extract(
            EventSource::Facebook,
            FunnelStage::Top,
            &fb,
            CanonicalField::PurchaseAmount
        )
        .is_none());
        assert!(extract(
            EventSource::Tiktok,
            FunnelStage::Top,
            &tt,
            CanonicalField::FollowerCount
        )
        .is_some());
    }
}
