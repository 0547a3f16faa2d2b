//! Discrete robot actions along a path.

/// An action the robot should perform while following a path.
#[derive(Clone, Debug, PartialEq)]
pub enum RobotAction {
    /// Stop at a control point, hand the drive over to `command`, then resume the path.
    /// The duration is an estimate used for planning only.
    HaltAndRun { command: String, approx_duration: f64 },
    /// Start `command` at `path_time` without interrupting path following.
    ScheduleParallel { command: String, path_time: f64 },
}

impl RobotAction {
    /// The name of the command to run.
    pub fn command(&self) -> &str {
        match self {
            Self::HaltAndRun { command, .. } => command,
            Self::ScheduleParallel { command, .. } => command,
        }
    }

    /// Whether the robot must stop to perform this action.
    pub fn is_halt(&self) -> bool {
        matches!(self, Self::HaltAndRun { .. })
    }
}

/// A command scheduled to start at a time along the path.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledAction {
    /// The path time, in s, at which the command is started.
    pub path_time: f64,
    /// The name of the command.
    pub command: String,
}

impl ScheduledAction {
    /// The action emitted when path following reaches this entry.
    pub fn to_action(&self) -> RobotAction {
        RobotAction::ScheduleParallel {
            command: self.command.clone(),
            path_time: self.path_time,
        }
    }
}

/// The commands scheduled to run in parallel with path following, ordered by path time.
#[derive(Clone, Debug, Default)]
pub struct ActionSchedule {
    actions: Vec<ScheduledAction>,
}

impl ActionSchedule {
    /// Schedules a command, keeping the schedule in time order.
    /// Commands scheduled for the same time run in the order they were scheduled.
    pub fn schedule(&mut self, path_time: f64, command: &str) -> RobotAction {
        let idx = self.actions.partition_point(|a| a.path_time <= path_time);
        let action = ScheduledAction {
            path_time,
            command: command.to_owned(),
        };
        let result = action.to_action();
        self.actions.insert(idx, action);
        result
    }

    /// Removes the first entry matching the action's time and command.
    ///
    /// # Returns
    /// `true` if an entry was removed.
    pub fn remove(&mut self, action: &RobotAction) -> bool {
        let RobotAction::ScheduleParallel { command, path_time } = action else {
            return false;
        };
        let idx = self
            .actions
            .iter()
            .position(|a| a.path_time == *path_time && a.command == *command);
        match idx {
            Some(idx) => {
                self.actions.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Adds `delta` to the time of every entry scheduled strictly after `after`.
    /// A negative shift can move entries past earlier ones, so the schedule is re-sorted.
    pub(crate) fn shift_after(&mut self, after: f64, delta: f64) {
        for action in self.actions.iter_mut().filter(|a| a.path_time > after) {
            action.path_time += delta;
        }
        self.actions.sort_by(|a, b| a.path_time.total_cmp(&b.path_time));
    }

    pub fn get(&self, idx: usize) -> Option<&ScheduledAction> {
        self.actions.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledAction> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}
