//! Pure enter/exit diffing.

use std::collections::HashSet;

use crate::model::{TrackedObject, TrackedSpot};
use crate::notify::Notification;

/// Default category marker for ground test transponders.
pub const DEFAULT_GROUND_MARKER: &str = "GND";

/// Decides which objects can never produce an enter event.
///
/// Stationary ground test transponders report a type containing the marker
/// (e.g. `GNDTEST`); without this filter they would trigger an enter on
/// every cycle until they leave the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionPolicy {
    marker: String,
}

impl ExclusionPolicy {
    /// Creates a policy for the given marker. Matching is ASCII case-insensitive.
    /// An empty marker excludes nothing.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into().trim().to_ascii_uppercase(),
        }
    }

    /// A policy that never excludes.
    pub fn none() -> Self {
        Self::new("")
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn is_excluded(&self, object: &TrackedObject) -> bool {
        !self.marker.is_empty() && object.category.to_ascii_uppercase().contains(&self.marker)
    }
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_GROUND_MARKER)
    }
}

/// One enter transition: the spot to persist and the message to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEnter {
    pub spot: TrackedSpot,
    pub notification: Notification,
}

/// The minimal set of effects that brings persisted state in line with the
/// current zone membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Spots to delete, in persisted order.
    pub exits: Vec<TrackedSpot>,
    /// Spots to create and announce, in snapshot order.
    pub enters: Vec<PlannedEnter>,
    /// Identifiers in the zone that the exclusion policy filtered out.
    pub excluded: Vec<String>,
    /// Number of objects already tracked and still in the zone.
    pub retained: usize,
}

impl ReconcilePlan {
    /// Returns true if applying the plan would change nothing.
    pub fn is_noop(&self) -> bool {
        self.exits.is_empty() && self.enters.is_empty()
    }

    /// The snapshot objects behind the planned enters, in enter order.
    pub fn entering<'a>(&self, current: &[&'a TrackedObject]) -> Vec<&'a TrackedObject> {
        self.enters
            .iter()
            .filter_map(|enter| {
                current
                    .iter()
                    .find(|object| object.id == enter.spot.object_id)
                    .copied()
            })
            .collect()
    }
}

/// Diffs the in-zone objects against the persisted spots of one subscriber.
///
/// Excluded objects are treated as absent: they never enter, and a stale
/// persisted spot for one is removed. Duplicate identifiers on either side
/// are collapsed, first occurrence wins.
pub fn plan_transitions(
    subscriber_id: &str,
    current: &[&TrackedObject],
    persisted: &[TrackedSpot],
    policy: &ExclusionPolicy,
) -> ReconcilePlan {
    let mut plan = ReconcilePlan::default();

    let mut in_zone: Vec<&TrackedObject> = Vec::with_capacity(current.len());
    let mut in_zone_ids: HashSet<&str> = HashSet::with_capacity(current.len());
    let mut excluded_ids: HashSet<&str> = HashSet::new();
    for &object in current {
        let id = object.id.as_str();
        if in_zone_ids.contains(id) || excluded_ids.contains(id) {
            continue;
        }
        if policy.is_excluded(object) {
            excluded_ids.insert(id);
            plan.excluded.push(object.id.clone());
        } else {
            in_zone_ids.insert(id);
            in_zone.push(object);
        }
    }

    let mut persisted_ids: HashSet<&str> = HashSet::with_capacity(persisted.len());
    for spot in persisted {
        let id = spot.object_id.as_str();
        if !persisted_ids.insert(id) {
            continue;
        }
        if !in_zone_ids.contains(id) {
            plan.exits.push(spot.clone());
        }
    }

    for object in in_zone {
        if persisted_ids.contains(object.id.as_str()) {
            plan.retained += 1;
            continue;
        }
        plan.enters.push(PlannedEnter {
            spot: TrackedSpot::new(
                subscriber_id,
                object.id.clone(),
                object.label.clone(),
                object.category.clone(),
            ),
            notification: Notification::for_sighting(&object.label, &object.category),
        });
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(id: &str, category: &str) -> TrackedObject {
        TrackedObject::new(id, 0.0, 0.0).with_category(category)
    }

    fn spot(id: &str) -> TrackedSpot {
        TrackedSpot::new("sub", id, "", "")
    }

    #[test]
    fn test_exclusion_policy_matching() {
        let policy = ExclusionPolicy::default();
        assert!(policy.is_excluded(&obj("A", "GNDTEST")));
        assert!(policy.is_excluded(&obj("A", "gnd")));
        assert!(!policy.is_excluded(&obj("A", "C17")));
        assert!(!policy.is_excluded(&obj("A", "")));
        assert!(!ExclusionPolicy::none().is_excluded(&obj("A", "GNDTEST")));
    }

    #[test]
    fn test_enter_only() {
        let a = obj("ABC123", "B738");
        let plan = plan_transitions("sub", &[&a], &[], &ExclusionPolicy::default());

        assert!(plan.exits.is_empty());
        assert_eq!(plan.enters.len(), 1);
        assert_eq!(plan.enters[0].spot, TrackedSpot::new("sub", "ABC123", "", "B738"));
        assert_eq!(plan.enters[0].notification, Notification::new("unknown", "B738"));
    }

    #[test]
    fn test_exit_only() {
        let plan = plan_transitions("sub", &[], &[spot("ABC123")], &ExclusionPolicy::default());
        assert_eq!(plan.exits, vec![spot("ABC123")]);
        assert!(plan.enters.is_empty());
    }

    #[test]
    fn test_retained_is_noop() {
        let a = obj("ABC123", "B738");
        let plan = plan_transitions("sub", &[&a], &[spot("ABC123")], &ExclusionPolicy::default());
        assert!(plan.is_noop());
        assert_eq!(plan.retained, 1);
    }

    #[test]
    fn test_exits_computed_alongside_enters() {
        let b = obj("BBB", "K35R");
        let c = obj("CCC", "C17");
        let persisted = vec![spot("AAA"), spot("BBB")];
        let plan = plan_transitions("sub", &[&b, &c], &persisted, &ExclusionPolicy::default());

        assert_eq!(plan.exits, vec![spot("AAA")]);
        assert_eq!(plan.enters.len(), 1);
        assert_eq!(plan.enters[0].spot.object_id, "CCC");
        assert_eq!(plan.retained, 1);
    }

    #[test]
    fn test_ground_marker_never_enters() {
        let g = obj("GND001", "GNDTEST");
        let plan = plan_transitions("sub", &[&g], &[], &ExclusionPolicy::default());
        assert!(plan.is_noop());
        assert_eq!(plan.excluded, vec!["GND001".to_string()]);
    }

    #[test]
    fn test_stale_spot_for_excluded_object_is_removed() {
        let g = obj("GND001", "GNDTEST");
        let plan = plan_transitions("sub", &[&g], &[spot("GND001")], &ExclusionPolicy::default());
        assert_eq!(plan.exits, vec![spot("GND001")]);
        assert!(plan.enters.is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let a1 = obj("AAA", "C17");
        let a2 = obj("AAA", "C5M");
        let persisted = vec![spot("ZZZ"), spot("ZZZ")];
        let plan = plan_transitions("sub", &[&a1, &a2], &persisted, &ExclusionPolicy::default());

        assert_eq!(plan.enters.len(), 1);
        assert_eq!(plan.enters[0].spot.category, "C17");
        assert_eq!(plan.exits.len(), 1);
    }

    #[test]
    fn test_enter_order_follows_snapshot() {
        let objs: Vec<TrackedObject> = ["E", "B", "D", "A"].iter().map(|id| obj(id, "C17")).collect();
        let refs: Vec<&TrackedObject> = objs.iter().collect();
        let plan = plan_transitions("sub", &refs, &[], &ExclusionPolicy::default());
        let ids: Vec<&str> = plan.enters.iter().map(|e| e.spot.object_id.as_str()).collect();
        assert_eq!(ids, vec!["E", "B", "D", "A"]);
    }

    #[test]
    fn test_entering_resolves_snapshot_objects() {
        let a1 = obj("AAA", "C17").with_label("RCH1");
        let a2 = obj("AAA", "C5M");
        let b = obj("BBB", "K35R");
        let g = obj("GND", "GNDTEST");
        let current = [&a1, &a2, &b, &g];
        let plan = plan_transitions("sub", &current, &[spot("BBB")], &ExclusionPolicy::default());

        let entering = plan.entering(&current);
        assert_eq!(entering.len(), 1);
        assert_eq!(entering[0].label, "RCH1");
        assert!(entering[0].to_string().starts_with("AAA \"RCH1\": C17"));
    }
}
