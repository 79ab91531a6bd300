//! Per-session subscription state.

use std::collections::{HashMap, HashSet};

use crate::bus::Topic;

/// Dedupe state of one subscribed topic.
///
/// Only replayed ids are remembered: a replayed message may still be
/// published live once, and that publish is dropped. Live ids are never
/// stored; the highest one seen keeps a later replay from going back over
/// the live stream.
#[derive(Debug, Default)]
struct Window {
    replayed: HashSet<i64>,
    live_high: Option<i64>,
}

/// Topics a session is subscribed to. Only ever touched under the owning
/// session's lock.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    topics: HashMap<Topic, Window>,
}

impl SubscriptionSet {
    /// Add a topic. Returns `false` if it was already present.
    pub fn insert(&mut self, topic: Topic) -> bool {
        if self.topics.contains_key(&topic) {
            return false;
        }
        self.topics.insert(topic, Window::default());
        true
    }

    pub fn remove(&mut self, topic: &Topic) -> bool {
        self.topics.remove(topic).is_some()
    }

    pub fn contains(&self, topic: &Topic) -> bool {
        self.topics.contains_key(topic)
    }

    /// Record a replayed `id`. Returns `false` when it was already sent on
    /// this topic or the topic is not subscribed.
    pub fn mark_replayed(&mut self, topic: &Topic, id: i64) -> bool {
        let Some(window) = self.topics.get_mut(topic) else {
            return false;
        };
        if window.live_high.is_some_and(|high| id <= high) {
            return false;
        }
        window.replayed.insert(id)
    }

    /// Record a live delivery of `id`. Returns `false` when replay already
    /// sent it or the topic is not subscribed.
    pub fn mark_delivered(&mut self, topic: &Topic, id: i64) -> bool {
        let Some(window) = self.topics.get_mut(topic) else {
            return false;
        };
        if window.replayed.remove(&id) {
            return false;
        }
        window.live_high = Some(window.live_high.map_or(id, |high| high.max(id)));
        true
    }

    /// Number of ids remembered for `topic`.
    pub fn remembered(&self, topic: &Topic) -> usize {
        self.topics.get(topic).map_or(0, |w| w.replayed.len())
    }

    /// Remove and return every topic.
    pub fn drain(&mut self) -> Vec<Topic> {
        self.topics.drain().map(|(topic, _)| topic).collect()
    }

    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.topics.keys()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_is_tracked_per_topic() {
        let mut set = SubscriptionSet::default();
        let commands = Topic::DeviceCommands("d1".into());
        let notifications = Topic::DeviceNotifications("d1".into());

        assert!(!set.mark_replayed(&commands, 1));
        assert!(!set.mark_delivered(&commands, 1));
        assert!(set.insert(commands.clone()));
        assert!(!set.insert(commands.clone()));
        assert!(set.insert(notifications.clone()));

        assert!(set.mark_replayed(&commands, 1));
        assert!(!set.mark_replayed(&commands, 1));
        assert!(!set.mark_delivered(&commands, 1));
        assert!(set.mark_replayed(&notifications, 1));

        set.remove(&commands);
        assert!(set.insert(commands.clone()));
        assert!(set.mark_replayed(&commands, 1));
    }

    #[test]
    fn test_live_traffic_does_not_grow_state() {
        let mut set = SubscriptionSet::default();
        let topic = Topic::DeviceCommands("d1".into());
        set.insert(topic.clone());
        for id in 1..=3 {
            assert!(set.mark_replayed(&topic, id));
        }

        for id in 4..10_000 {
            assert!(set.mark_delivered(&topic, id));
        }
        assert_eq!(set.remembered(&topic), 3);

        // A replayed id published late is dropped once and forgotten.
        assert!(!set.mark_delivered(&topic, 2));
        assert_eq!(set.remembered(&topic), 2);
    }

    #[test]
    fn test_replay_does_not_go_back_over_live_stream() {
        let mut set = SubscriptionSet::default();
        let topic = Topic::DeviceNotifications("d1".into());
        set.insert(topic.clone());

        assert!(set.mark_delivered(&topic, 5));
        assert!(!set.mark_replayed(&topic, 4));
        assert!(!set.mark_replayed(&topic, 5));
        assert!(set.mark_replayed(&topic, 6));
        assert_eq!(set.remembered(&topic), 1);
    }
}
