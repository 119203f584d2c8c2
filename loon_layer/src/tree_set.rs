// Copyright 2025 the Loon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint-ordered actor set.

use std::collections::HashMap;

use crate::actor::{ActorFlags, ActorId, ActorRef};

/// Ordered set of actors defining paint and hit-test order.
///
/// The order runs back to front: the first actor is painted first and the
/// last one is on top. Point queries therefore scan from the end.
#[derive(Debug, Default)]
pub struct ActorTreeSet {
    order: Vec<ActorId>,
    members: HashMap<ActorId, ActorRef>,
}

impl ActorTreeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `actor` on top. Returns `false` if it is already a member.
    pub fn add(&mut self, actor: ActorRef) -> bool {
        let id = actor.id();
        if self.members.contains_key(&id) {
            return false;
        }
        self.members.insert(id, actor);
        self.order.push(id);
        true
    }

    /// Remove the actor with `id`, returning it if it was a member.
    pub fn remove(&mut self, id: ActorId) -> Option<ActorRef> {
        let actor = self.members.remove(&id)?;
        if let Some(pos) = self.position(id) {
            self.order.remove(pos);
        }
        Some(actor)
    }

    /// Remove every actor matching `pred`, returning them in paint order.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&ActorRef) -> bool) -> Vec<ActorRef> {
        let mut removed = Vec::new();
        let members = &mut self.members;
        self.order.retain(|id| {
            let hit = members.get(id).is_some_and(&mut pred);
            if hit && let Some(a) = members.remove(id) {
                removed.push(a);
            }
            !hit
        });
        removed
    }

    fn position(&self, id: ActorId) -> Option<usize> {
        self.order.iter().position(|&o| o == id)
    }

    /// Move a member to the top of the paint order. No-op if absent.
    pub fn send_to_front(&mut self, id: ActorId) {
        if let Some(pos) = self.position(id) {
            let id = self.order.remove(pos);
            self.order.push(id);
        }
    }

    /// Move a member to the bottom of the paint order. No-op if absent.
    pub fn send_to_back(&mut self, id: ActorId) {
        if let Some(pos) = self.position(id) {
            let id = self.order.remove(pos);
            self.order.insert(0, id);
        }
    }

    /// Topmost actor whose box contains the point, optionally requiring an
    /// equal user tag.
    pub fn get_only_collision_objects_at(
        &self,
        x: f64,
        y: f64,
        tag: Option<&str>,
    ) -> Option<ActorRef> {
        self.topmost(|a| a.bounds().contains_point(x, y) && a.tag_matches(tag))
    }

    /// Topmost visible, clickable actor whose box contains the point.
    pub fn get_synchronized_object(&self, x: f64, y: f64) -> Option<ActorRef> {
        self.topmost(|a| {
            a.flags().contains(ActorFlags::VISIBLE | ActorFlags::CLICKABLE)
                && a.bounds().contains_point(x, y)
        })
    }

    fn topmost(&self, pred: impl Fn(&ActorRef) -> bool) -> Option<ActorRef> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.members.get(id))
            .find(|a| pred(a))
            .cloned()
    }

    /// Whether `id` is a member.
    pub fn contains(&self, id: ActorId) -> bool {
        self.members.contains_key(&id)
    }

    /// Member with `id`.
    pub fn get(&self, id: ActorId) -> Option<&ActorRef> {
        self.members.get(&id)
    }

    /// Members back to front.
    pub fn iter(&self) -> impl Iterator<Item = &ActorRef> + '_ {
        self.order.iter().filter_map(|id| self.members.get(id))
    }

    /// Number of members.
    pub fn size(&self) -> usize {
        self.order.len()
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Remove every member.
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Actor;
    use loon_collision::{RectBox, TypeTag};

    fn stacked() -> (ActorTreeSet, [ActorRef; 3]) {
        let kind = TypeTag::new("tile");
        let a = Actor::new(kind, RectBox::new(0.0, 0.0, 20, 20));
        let b = Actor::new(kind, RectBox::new(5.0, 5.0, 20, 20));
        let c = Actor::new(kind, RectBox::new(10.0, 10.0, 20, 20));
        let mut set = ActorTreeSet::new();
        for actor in [&a, &b, &c] {
            assert!(set.add(actor.clone()));
        }
        (set, [a, b, c])
    }

    fn ids(set: &ActorTreeSet) -> Vec<ActorId> {
        set.iter().map(|a| a.id()).collect()
    }

    #[test]
    fn duplicate_add_is_rejected() {
        let (mut set, [a, ..]) = stacked();
        assert!(!set.add(a.clone()));
        assert_eq!(set.size(), 3);
    }

    #[test]
    fn front_and_back_reorder_paint() {
        let (mut set, [a, b, c]) = stacked();
        set.send_to_front(a.id());
        assert_eq!(ids(&set), vec![b.id(), c.id(), a.id()]);
        set.send_to_back(c.id());
        assert_eq!(ids(&set), vec![c.id(), b.id(), a.id()]);
        let top = set.get_only_collision_objects_at(12.0, 12.0, None).unwrap();
        assert_eq!(top.id(), a.id(), "last in paint order wins");
    }

    #[test]
    fn topmost_respects_tag_filter() {
        let (set, [a, _, c]) = stacked();
        a.set_tag(Some("floor".into()));
        assert_eq!(set.get_only_collision_objects_at(12.0, 12.0, None).unwrap().id(), c.id());
        assert_eq!(
            set.get_only_collision_objects_at(12.0, 12.0, Some("floor")).unwrap().id(),
            a.id()
        );
        assert!(set.get_only_collision_objects_at(12.0, 12.0, Some("roof")).is_none());
        assert!(set.get_only_collision_objects_at(50.0, 50.0, None).is_none());
    }

    #[test]
    fn synchronized_object_skips_hidden_and_unclickable() {
        let (set, [a, b, c]) = stacked();
        c.set_flags(ActorFlags::VISIBLE);
        b.set_flags(ActorFlags::CLICKABLE);
        assert_eq!(set.get_synchronized_object(12.0, 12.0).unwrap().id(), a.id());
    }

    #[test]
    fn remove_and_remove_where() {
        let (mut set, [a, b, c]) = stacked();
        assert!(set.remove(b.id()).is_some());
        assert!(set.remove(b.id()).is_none());
        assert!(!set.contains(b.id()));
        c.set_tag(Some("x".into()));
        let gone = set.remove_where(|actor| actor.tag().is_some());
        assert_eq!(gone.len(), 1);
        assert_eq!(ids(&set), vec![a.id()]);
        set.send_to_front(c.id());
        assert_eq!(set.size(), 1);
        set.clear();
        assert!(set.is_empty());
    }
}
