//! Staff components: workers and the tasks they carry.

use std::collections::VecDeque;

use hecs::Entity;
use serde::{Deserialize, Serialize};
use templanter_logic::skills::{Progression, SkillSet};
use templanter_logic::work::{Role, TaskKind};

/// A unit of work. `target` is the plant it acts on, if any; the plant may
/// be gone by the time the task runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: u64,
    pub kind: TaskKind,
    pub target: Option<Entity>,
}

impl Task {
    pub fn required_role(&self) -> Option<Role> {
        self.kind.required_role()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum WorkerStatus {
    #[default]
    Idle,
    /// Minutes left on the current job.
    Busy { remaining: f32 },
}

/// A hired greenhouse worker.
#[derive(Debug, Clone)]
pub struct Worker {
    pub id: u32,
    pub name: String,
    pub skills: SkillSet,
    pub progression: Progression,
    pub zone: Option<u32>,
    /// Granted roles; the first is the primary role.
    pub roles: Vec<Role>,
    pub queue: VecDeque<Task>,
    pub status: WorkerStatus,
}

impl Worker {
    pub fn new(id: u32, name: impl Into<String>, skills: SkillSet, salary: i64) -> Self {
        Self {
            id,
            name: name.into(),
            skills,
            progression: Progression::new(salary),
            zone: None,
            roles: Vec::new(),
            queue: VecDeque::new(),
            status: WorkerStatus::Idle,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.grant_role(role);
        self
    }

    /// Add a role. Returns `false` if the worker already had it.
    pub fn grant_role(&mut self, role: Role) -> bool {
        if self.has_role(role) {
            return false;
        }
        self.roles.push(role);
        true
    }

    pub fn revoke_role(&mut self, role: Role) -> bool {
        let before = self.roles.len();
        self.roles.retain(|r| *r != role);
        self.roles.len() != before
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn primary_role(&self) -> Option<Role> {
        self.roles.first().copied()
    }

    /// Whether the worker holds the role `task` needs (always true for
    /// role-free tasks).
    pub fn qualifies_for(&self, task: &Task) -> bool {
        task.required_role().map_or(true, |r| self.has_role(r))
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.status, WorkerStatus::Busy { .. })
    }

    /// Not busy and nothing waiting in the personal queue.
    pub fn is_available(&self) -> bool {
        !self.is_busy() && self.queue.is_empty()
    }

    pub fn remaining_busy(&self) -> f32 {
        match self.status {
            WorkerStatus::Busy { remaining } => remaining,
            WorkerStatus::Idle => 0.0,
        }
    }

    pub fn enqueue(&mut self, task: Task) {
        self.queue.push_back(task);
    }

    /// Burn `minutes` off the busy timer, going idle once it runs out.
    pub fn advance_timer(&mut self, minutes: f32) {
        if let WorkerStatus::Busy { remaining } = self.status {
            let left = remaining - minutes;
            self.status = if left <= 0.0 {
                WorkerStatus::Idle
            } else {
                WorkerStatus::Busy { remaining: left }
            };
        }
    }

    /// Pop the oldest queued task if the worker is free to start it.
    pub fn next_task(&mut self) -> Option<Task> {
        if self.is_busy() {
            return None;
        }
        self.queue.pop_front()
    }

    pub fn start_busy(&mut self, minutes: f32) {
        self.status = if minutes > 0.0 {
            WorkerStatus::Busy { remaining: minutes }
        } else {
            WorkerStatus::Idle
        };
    }

    /// Busy time for `kind` at this worker's matching skill level.
    pub fn duration_for(&self, kind: &TaskKind) -> f32 {
        let level = kind.skill().map_or(1, |s| self.skills.get(s));
        kind.duration_for(level)
    }

    /// Take every queued task, oldest first.
    pub fn drain_queue(&mut self) -> Vec<Task> {
        self.queue.drain(..).collect()
    }

    /// Drop queued tasks aimed at `target`. Returns how many were removed.
    pub fn cancel_tasks_targeting(&mut self, target: Entity) -> usize {
        let before = self.queue.len();
        self.queue.retain(|t| t.target != Some(target));
        before - self.queue.len()
    }
}
