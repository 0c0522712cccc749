//! Translation of per-frame adapter input into simulation calls.

use path_defence_core::Event;
use path_defence_rendering::{to_point, FrameInput};
use path_defence_simulation::Simulation;
use path_defence_system_builder::BuilderInput;

/// Applies one frame of player input, returning every event it caused.
///
/// Restart runs first so the remaining requests act on the fresh run.
pub fn apply_frame_input(simulation: &mut Simulation, input: &FrameInput) -> Vec<Event> {
    let mut events = Vec::new();
    if input.restart {
        events.extend(simulation.restart());
    }
    if input.toggle_pause {
        events.extend(simulation.toggle_pause());
    }
    if input.start_wave {
        events.extend(simulation.start_wave());
    }

    let builder_input = BuilderInput {
        select_kind: input.select_kind,
        click: input.click_position().map(to_point),
        upgrade: input.upgrade,
        sell: input.sell,
    };
    if builder_input != BuilderInput::default() {
        events.extend(simulation.handle_input(builder_input));
    }
    events
}
