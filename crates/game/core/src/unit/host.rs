/// Capabilities a unit's states act through.
///
/// The state machine never touches rendering, physics, or movement directly;
/// it asks the host. Hooks a host cannot honour may keep the default no-op.
pub trait UnitHost {
    /// Display name used in log lines.
    fn name(&self) -> &str {
        "unit"
    }

    /// Plays the animation trigger named after the entered state.
    fn play_trigger(&mut self, trigger: &str);

    /// Halts any in-progress movement.
    fn stop_movement(&mut self) {}

    /// Removes the unit from collision queries.
    fn disable_collision(&mut self) {}

    /// Whether the unit has an attacking component.
    fn can_attack(&self) -> bool {
        true
    }

    /// Whether the unit has a movement component.
    fn can_move(&self) -> bool {
        true
    }
}

/// Host that ignores every hook. Useful for headless simulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullHost;

impl UnitHost for NullHost {
    fn play_trigger(&mut self, _trigger: &str) {}
}

/// Host that records every hook call, for assertions in tests and replays.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordingHost {
    pub name: String,
    pub triggers: Vec<String>,
    pub movement_stopped: bool,
    pub collision_disabled: bool,
}

impl RecordingHost {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl UnitHost for RecordingHost {
    fn name(&self) -> &str {
        &self.name
    }

    fn play_trigger(&mut self, trigger: &str) {
        self.triggers.push(trigger.to_owned());
    }

    fn stop_movement(&mut self) {
        self.movement_stopped = true;
    }

    fn disable_collision(&mut self) {
        self.collision_disabled = true;
    }
}
