//! Draw list generation for one frame

use glam::Vec2;

use crate::config::GameConfig;
use crate::sim::{Color, GameState};
use crate::ui::countdown_text;

/// Hand zone center dot radius
const HAND_DOT_RADIUS: f32 = 5.0;
/// Gap between the hand zone and its label
const HAND_LABEL_GAP: f32 = 10.0;
const BALL_OUTLINE_WIDTH: f32 = 2.0;
const HAND_OUTLINE_WIDTH: f32 = 4.0;
const COUNTDOWN_SHADE: Color = Color::rgba(0, 0, 0, 0.5);

/// Backend-agnostic drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Camera frame dimmed by `dim`, or a solid `fallback` fill when no frame is available
    Backdrop { dim: Color, fallback: Color },
    Rect {
        min: Vec2,
        size: Vec2,
        fill: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<(Color, f32)>,
    },
    /// Centered on `pos` both ways
    Text {
        pos: Vec2,
        text: String,
        /// Bold font size in pixels
        size: f32,
        color: Color,
    },
}

/// Build the draw list for the current state, back to front
pub fn build_frame(state: &GameState, config: &GameConfig) -> Vec<DrawCommand> {
    let palette = &config.palette;
    let mut commands = Vec::with_capacity(
        4 + state.barriers.len()
            + state.balls.len()
            + state.hands.len() * 3
            + state.particles.len(),
    );

    commands.push(DrawCommand::Backdrop {
        dim: palette.video_dim,
        fallback: palette.background,
    });

    for barrier in &state.barriers {
        commands.push(DrawCommand::Rect {
            min: barrier.min(),
            size: barrier.size,
            fill: palette.barrier,
        });
    }

    for ball in &state.balls {
        commands.push(DrawCommand::Circle {
            center: ball.pos,
            radius: ball.radius,
            fill: Some(ball.color),
            stroke: Some((palette.ball_outline, BALL_OUTLINE_WIDTH)),
        });
    }

    for (i, hand) in state.hands.iter().enumerate() {
        commands.push(DrawCommand::Circle {
            center: hand.pos,
            radius: config.hand_radius,
            fill: Some(palette.hand_fill),
            stroke: Some((palette.hand_outline, HAND_OUTLINE_WIDTH)),
        });
        commands.push(DrawCommand::Circle {
            center: hand.pos,
            radius: HAND_DOT_RADIUS,
            fill: Some(palette.text),
            stroke: None,
        });
        commands.push(DrawCommand::Text {
            pos: hand.pos - Vec2::new(0.0, config.hand_radius + HAND_LABEL_GAP),
            text: format!("Hand {}", i + 1),
            size: 16.0,
            color: palette.text,
        });
    }

    for particle in &state.particles {
        commands.push(DrawCommand::Circle {
            center: particle.pos,
            radius: particle.size,
            fill: Some(particle.color.with_alpha(particle.life)),
            stroke: None,
        });
    }

    if let Some(notification) = &state.notification {
        // Fade out over the last second
        let alpha = notification.timer.min(1.0);
        commands.push(DrawCommand::Text {
            pos: Vec2::new(config.width / 2.0, config.height * 0.25),
            text: notification.text.clone(),
            size: 36.0,
            color: palette.text.with_alpha(alpha),
        });
    }

    if let Some((digit, caption)) = countdown_text(state) {
        let center = Vec2::new(config.width / 2.0, config.height / 2.0);
        commands.push(DrawCommand::Rect {
            min: Vec2::ZERO,
            size: Vec2::new(config.width, config.height),
            fill: COUNTDOWN_SHADE,
        });
        commands.push(DrawCommand::Text {
            pos: center,
            text: digit,
            size: 72.0,
            color: palette.text,
        });
        commands.push(DrawCommand::Text {
            pos: center + Vec2::new(0.0, 60.0),
            text: caption.to_string(),
            size: 24.0,
            color: palette.text,
        });
    }

    commands
}
