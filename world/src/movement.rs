//! Player locomotion driven by normalized movement input.

use survival_core::{InputSource, MovementInput, Vec2, WorldBounds};

/// Outcome of applying one movement step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Step {
    pub(crate) position: Vec2,
    /// New heading, present only for joystick input.
    pub(crate) facing: Option<f32>,
}

/// Moves `position` by `input * speed` and clamps the result into `bounds`.
///
/// Screen-space `y` maps onto negative world z. Keyboard input keeps the
/// previous heading; only the joystick turns the player.
pub(crate) fn step(
    position: Vec2,
    input: MovementInput,
    speed: f32,
    bounds: WorldBounds,
) -> Step {
    let delta = Vec2::new(input.x * speed, -input.y * speed);
    let facing = match input.source {
        InputSource::Joystick if !input.is_idle() => Some(input.x.atan2(-input.y)),
        _ => None,
    };

    Step {
        position: bounds.clamp(position + delta),
        facing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEED: f32 = 0.2;

    fn bounds() -> WorldBounds {
        WorldBounds::new(45.0)
    }

    #[test]
    fn forward_key_moves_toward_negative_z() {
        let input = MovementInput::keyboard(true, false, false, false);
        let step = step(Vec2::ZERO, input, SPEED, bounds());
        assert!((step.position.y + SPEED).abs() < f32::EPSILON);
        assert_eq!(step.position.x, 0.0);
        assert_eq!(step.facing, None);
    }

    #[test]
    fn joystick_updates_heading() {
        let input = MovementInput::joystick(1.0, 0.0);
        let step = step(Vec2::ZERO, input, SPEED, bounds());
        assert!((step.position.x - SPEED).abs() < f32::EPSILON);
        let facing = step.facing.expect("joystick sets heading");
        assert!((facing - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn position_is_clamped_to_bounds() {
        let input = MovementInput::joystick(1.0, -1.0);
        let step = step(Vec2::new(44.9, 44.9), input, SPEED, bounds());
        assert_eq!(step.position, Vec2::new(45.0, 45.0));
    }
}
