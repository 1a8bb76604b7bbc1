//! Identification over time
//!
//! Items start unidentified. An owner can begin studying one, and the
//! scheduler counts the study down once per turn until the item reveals
//! itself. Cursed items that are already worn skip the wait and bind at once.

use std::collections::BTreeMap;

use super::xp::identification_reward;
use crate::data::config::IdentificationConfig;
use crate::entities::{ItemOwner, OwnerId};
use crate::items::{EquipmentInstance, InstanceId};

/// One identification per (owner, item)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskKey {
    pub owner: OwnerId,
    pub item: InstanceId,
}

impl TaskKey {
    pub fn new(owner: OwnerId, item: InstanceId) -> Self {
        Self { owner, item }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Task {
    ticks_remaining: u32,
    duration: u32,
}

/// Where an (owner, item) pair stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentificationState {
    /// No task: never started, finished, or cancelled
    Unqueued,
    Queued { ticks_remaining: u32, duration: u32 },
}

/// What `start` did with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Already identified, or already queued for this owner
    Rejected,
    /// Counting down from `duration` ticks
    Queued { duration: u32 },
    /// Finished on the spot: the item was cursed and already worn
    Completed { cursed_bound: bool, experience: u32 },
}

impl StartOutcome {
    /// True unless the request was rejected
    pub fn is_started(&self) -> bool {
        !matches!(self, StartOutcome::Rejected)
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentificationEvent {
    /// Advisory only
    Progress {
        key: TaskKey,
        ticks_remaining: u32,
        percent_remaining: u32,
    },
    Completed {
        key: TaskKey,
        /// The item was cursed and worn, and is now stuck to its owner
        cursed_bound: bool,
        experience: u32,
    },
    /// The host no longer knows the owner or the item
    Dropped { key: TaskKey },
}

/// Everything a tick produced, in key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub events: Vec<IdentificationEvent>,
}

impl TickReport {
    /// Keys of tasks that finished this tick
    pub fn completed(&self) -> impl Iterator<Item = TaskKey> + '_ {
        self.events.iter().filter_map(|e| match e {
            IdentificationEvent::Completed { key, .. } => Some(*key),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Gives the scheduler access to live owners and items.
///
/// The two borrows must not alias; hosts usually keep owners and items in
/// separate collections.
pub trait IdentificationHost {
    fn resolve(&mut self, owner: OwnerId, item: InstanceId) -> Option<(&mut dyn ItemOwner, &mut EquipmentInstance)>;
}

/// Reveal an item and apply the curse-bind reward. Returns (bound, experience).
fn complete<O: ItemOwner + ?Sized>(owner: &mut O, item: &mut EquipmentInstance) -> (bool, u32) {
    if !item.identify(&*owner) {
        return (false, 0);
    }

    if item.is_cursed() && owner.is_equipped(item.id()) {
        let experience = identification_reward(item.tier(), item.modifier_count());
        owner.gain_experience(experience);
        (true, experience)
    } else {
        (false, 0)
    }
}

/// Per (owner, item) identification timers
#[derive(Debug, Clone, Default)]
pub struct IdentificationScheduler {
    tasks: BTreeMap<TaskKey, Task>,
    config: IdentificationConfig,
}

impl IdentificationScheduler {
    pub fn new(config: IdentificationConfig) -> Self {
        Self {
            tasks: BTreeMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &IdentificationConfig {
        &self.config
    }

    /// Ticks needed for this owner to identify something
    pub fn duration_for<O: ItemOwner + ?Sized>(&self, owner: &O) -> u32 {
        let cfg = &self.config;
        let wisdom = (owner.intelligence() - cfg.intelligence_baseline).max(0) as u32;
        let duration = cfg
            .base_ticks
            .saturating_sub(wisdom.saturating_mul(cfg.ticks_per_wisdom))
            .max(cfg.min_ticks);

        if owner.has_identification_aid() {
            ((duration as f64 * cfg.aid_scale).floor() as u32).max(cfg.aid_min_ticks)
        } else {
            duration
        }
    }

    /// Begin identifying an item.
    ///
    /// Rejected if the item is already identified or already queued for this
    /// owner. A cursed item the owner is wearing completes on the spot, and
    /// the outcome carries the bind and reward since no tick will report it.
    pub fn start<O: ItemOwner + ?Sized>(&mut self, owner: &mut O, item: &mut EquipmentInstance) -> StartOutcome {
        let key = TaskKey::new(owner.id(), item.id());

        if item.is_identified() {
            log::warn!("Item {} is already identified", item.id());
            return StartOutcome::Rejected;
        }
        if self.tasks.contains_key(&key) {
            log::warn!("Item {} is already being identified by owner {}", item.id(), owner.id());
            return StartOutcome::Rejected;
        }

        if item.is_cursed() && owner.is_equipped(item.id()) {
            let (cursed_bound, experience) = complete(owner, item);
            log::info!(
                "The curse on {} reveals itself to owner {} (+{} XP)",
                item.display_name(),
                key.owner,
                experience
            );
            return StartOutcome::Completed {
                cursed_bound,
                experience,
            };
        }

        let duration = self.duration_for(owner);
        self.tasks.insert(
            key,
            Task {
                ticks_remaining: duration,
                duration,
            },
        );
        log::debug!("Owner {} started identifying item {} ({} ticks)", key.owner, key.item, duration);
        StartOutcome::Queued { duration }
    }

    /// Advance every task by one turn
    pub fn tick<H: IdentificationHost + ?Sized>(&mut self, host: &mut H) -> TickReport {
        let mut report = TickReport::default();
        let mut finished = Vec::new();

        for (key, task) in self.tasks.iter_mut() {
            let before = task.ticks_remaining;
            task.ticks_remaining = before.saturating_sub(1);
            let after = task.ticks_remaining;

            if after == 0 {
                finished.push(*key);
                continue;
            }

            if let Some(percent) = self.config.notice_between(before, after, task.duration) {
                log::debug!(
                    "Item {} for owner {}: {} ticks ({}%) remaining",
                    key.item,
                    key.owner,
                    after,
                    percent
                );
                report.events.push(IdentificationEvent::Progress {
                    key: *key,
                    ticks_remaining: after,
                    percent_remaining: percent,
                });
            }
        }

        for key in finished {
            self.tasks.remove(&key);
            match host.resolve(key.owner, key.item) {
                Some((owner, item)) => {
                    let (cursed_bound, experience) = complete(owner, item);
                    report.events.push(IdentificationEvent::Completed {
                        key,
                        cursed_bound,
                        experience,
                    });
                }
                None => {
                    log::warn!("Dropping identification of item {} for missing owner {} or item", key.item, key.owner);
                    report.events.push(IdentificationEvent::Dropped { key });
                }
            }
        }

        report
    }

    /// Stop identifying. Returns false if there was nothing to cancel.
    pub fn cancel(&mut self, owner: OwnerId, item: InstanceId) -> bool {
        if self.tasks.remove(&TaskKey::new(owner, item)).is_some() {
            log::debug!("Owner {} stopped identifying item {}", owner, item);
            true
        } else {
            log::warn!("No identification of item {} by owner {} to cancel", item, owner);
            false
        }
    }

    /// Drop every task belonging to an owner (e.g. when it leaves play)
    pub fn cancel_owner(&mut self, owner: OwnerId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|key, _| key.owner != owner);
        before - self.tasks.len()
    }

    pub fn state(&self, owner: OwnerId, item: InstanceId) -> IdentificationState {
        match self.tasks.get(&TaskKey::new(owner, item)) {
            Some(task) => IdentificationState::Queued {
                ticks_remaining: task.ticks_remaining,
                duration: task.duration,
            },
            None => IdentificationState::Unqueued,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl IdentificationConfig {
    /// Percent remaining to announce when a countdown steps from `before` to
    /// `after`, if it crossed 75/50/25% or reached the final notice
    fn notice_between(&self, before: u32, after: u32, duration: u32) -> Option<u32> {
        if duration == 0 {
            return None;
        }
        let percent = |ticks: u32| (ticks as u64 * 100 / duration as u64) as u32;

        let crossed_mark = [75u64, 50, 25].iter().any(|mark| {
            let threshold = duration as u64 * mark;
            (after as u64 * 100) <= threshold && (before as u64 * 100) > threshold
        });
        if crossed_mark || after == self.final_notice_ticks {
            Some(percent(after))
        } else {
            None
        }
    }
}
