//! Worker roles and task kinds.
//!
//! A role is a capability tag: the dispatcher routes a task to the first
//! available worker holding the task's required role. Each task kind has a
//! base duration (scaled by the matching skill) and a fixed experience
//! reward.

use serde::{Deserialize, Serialize};

use crate::plant::Notice;
use crate::skills::{task_duration, Skill};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Waterer,
    Harvester,
    Cashier,
    Security,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Waterer, Role::Harvester, Role::Cashier, Role::Security];

    pub fn name(self) -> &'static str {
        match self {
            Role::Waterer => "Waterer",
            Role::Harvester => "Harvester",
            Role::Cashier => "Cashier",
            Role::Security => "Security",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name().eq_ignore_ascii_case(name))
    }

    /// The skill this role mostly exercises.
    pub fn primary_skill(self) -> Skill {
        match self {
            Role::Waterer => Skill::Watering,
            Role::Harvester => Skill::Harvesting,
            Role::Cashier => Skill::Cashiering,
            Role::Security => Skill::Security,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TaskKind {
    Water,
    Harvest,
    ServeCustomer { customer_id: u32 },
    Patrol { zone: u32 },
    /// Off-duty break; not sped up by any skill.
    Rest { minutes: f32 },
}

impl TaskKind {
    /// `None` means any worker may take it.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            TaskKind::Water => Some(Role::Waterer),
            TaskKind::Harvest => Some(Role::Harvester),
            TaskKind::ServeCustomer { .. } => Some(Role::Cashier),
            TaskKind::Patrol { .. } => Some(Role::Security),
            TaskKind::Rest { .. } => None,
        }
    }

    pub fn skill(&self) -> Option<Skill> {
        self.required_role().map(Role::primary_skill)
    }

    pub fn base_duration_minutes(&self) -> f32 {
        match self {
            TaskKind::Water => 10.0,
            TaskKind::Harvest => 8.0,
            TaskKind::ServeCustomer { .. } => 10.0,
            TaskKind::Patrol { .. } => 15.0,
            TaskKind::Rest { minutes } => minutes.max(0.0),
        }
    }

    /// Busy time for a worker whose relevant skill is at `level`.
    pub fn duration_for(&self, level: u8) -> f32 {
        match self {
            TaskKind::Rest { .. } => self.base_duration_minutes(),
            _ => task_duration(self.base_duration_minutes(), level),
        }
    }

    pub fn experience_reward(&self) -> u32 {
        match self {
            TaskKind::Water => 5,
            TaskKind::Harvest => 15,
            TaskKind::ServeCustomer { .. } => 8,
            TaskKind::Patrol { .. } => 10,
            TaskKind::Rest { .. } => 0,
        }
    }

    /// Whether the task acts on a plant.
    pub fn targets_plant(&self) -> bool {
        matches!(self, TaskKind::Water | TaskKind::Harvest)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::Water => "water",
            TaskKind::Harvest => "harvest",
            TaskKind::ServeCustomer { .. } => "serve customer",
            TaskKind::Patrol { .. } => "patrol",
            TaskKind::Rest { .. } => "rest",
        }
    }
}

/// The task a plant notice turns into, if any. Dead plants need a person
/// with a shovel, not a worker task.
pub fn task_for_notice(notice: Notice) -> Option<TaskKind> {
    match notice {
        Notice::NeedsWater => Some(TaskKind::Water),
        Notice::Ripe | Notice::Decaying => Some(TaskKind::Harvest),
        Notice::Dead => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_mapping() {
        assert_eq!(task_for_notice(Notice::NeedsWater), Some(TaskKind::Water));
        assert_eq!(task_for_notice(Notice::Ripe), Some(TaskKind::Harvest));
        assert_eq!(task_for_notice(Notice::Decaying), Some(TaskKind::Harvest));
        assert_eq!(task_for_notice(Notice::Dead), None);
    }

    #[test]
    fn durations_scale_with_skill_except_rest() {
        assert_eq!(TaskKind::Water.duration_for(1), 10.0);
        assert!((TaskKind::Harvest.duration_for(5) - 3.2).abs() < 1e-5);
        let rest = TaskKind::Rest { minutes: 30.0 };
        assert_eq!(rest.duration_for(5), 30.0);
        assert_eq!(rest.required_role(), None);
        assert_eq!(rest.skill(), None);
    }

    #[test]
    fn rewards_and_roles() {
        assert_eq!(TaskKind::Harvest.experience_reward(), 15);
        assert_eq!(TaskKind::Patrol { zone: 2 }.experience_reward(), 10);
        assert_eq!(TaskKind::ServeCustomer { customer_id: 9 }.required_role(), Some(Role::Cashier));
        assert_eq!(TaskKind::Patrol { zone: 0 }.skill(), Some(Skill::Security));
    }

    #[test]
    fn role_names() {
        assert_eq!(Role::from_name("harvester"), Some(Role::Harvester));
        assert_eq!(Role::from_name("None"), None);
        assert_eq!(Role::Cashier.to_string(), "Cashier");
    }
}
