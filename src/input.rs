//! Translates raw pointer events into [`Intent`]s.
//!
//! Toolkit agnostic: the iced widget feeds it, but any event source can.

use std::time::{Duration, Instant};

use crate::Intent;

/// Pixels moved by one press of a pan button.
pub const PAN_STEP: i32 = 15;

/// Two presses closer together than this zoom in.
pub const DOUBLE_CLICK: Duration = Duration::from_millis(300);

/// Two presses further apart than this, in pixels, are separate clicks.
const DOUBLE_CLICK_SLOP: i32 = 4;

/// On-screen buttons next to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    ZoomIn,
    ZoomOut,
    PanWest,
    PanEast,
    PanNorth,
    PanSouth,
}

impl From<Control> for Intent {
    fn from(control: Control) -> Self {
        match control {
            Control::ZoomIn => Intent::ZoomIn,
            Control::ZoomOut => Intent::ZoomOut,
            Control::PanWest => Intent::Pan { dx: -PAN_STEP, dy: 0 },
            Control::PanEast => Intent::Pan { dx: PAN_STEP, dy: 0 },
            Control::PanNorth => Intent::Pan { dx: 0, dy: -PAN_STEP },
            Control::PanSouth => Intent::Pan { dx: 0, dy: PAN_STEP },
        }
    }
}

/// Pointer events, positions relative to the top-left of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    ButtonPressed { x: i32, y: i32 },
    ButtonReleased,
    CursorMoved { x: i32, y: i32 },
    CursorLeft,
    SecondaryClick { x: i32, y: i32 },
    /// Positive `delta` scrolls away from the user, zooming in.
    Wheel { delta: f32, x: i32, y: i32 },
    Control(Control),
}

#[derive(Debug, Clone)]
pub struct InputState {
    dragging: bool,
    last_cursor: (i32, i32),
    last_press: Option<(Instant, (i32, i32))>,
    last_wheel: Option<Instant>,
    wheel_debounce: Duration,
}

impl Default for InputState {
    fn default() -> Self {
        InputState::new(Duration::from_millis(100))
    }
}

impl InputState {
    pub fn new(wheel_debounce: Duration) -> Self {
        Self {
            dragging: false,
            last_cursor: (0, 0),
            last_press: None,
            last_wheel: None,
            wheel_debounce,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn wheel_debounce(&self) -> Duration {
        self.wheel_debounce
    }

    pub fn set_wheel_debounce(&mut self, wheel_debounce: Duration) {
        self.wheel_debounce = wheel_debounce;
    }

    pub fn handle(&mut self, event: InputEvent, now: Instant) -> Option<Intent> {
        match event {
            InputEvent::ButtonPressed { x, y } => {
                if let Some((at, (px, py))) = self.last_press.take() {
                    let near = (px - x).abs() <= DOUBLE_CLICK_SLOP
                        && (py - y).abs() <= DOUBLE_CLICK_SLOP;
                    if near && now.duration_since(at) <= DOUBLE_CLICK {
                        return Some(Intent::ZoomInAt { x, y });
                    }
                }

                self.last_press = Some((now, (x, y)));
                self.last_cursor = (x, y);
                self.dragging = true;
                Some(Intent::StartMove)
            }
            InputEvent::ButtonReleased | InputEvent::CursorLeft => {
                std::mem::take(&mut self.dragging).then_some(Intent::StopMove)
            }
            InputEvent::CursorMoved { x, y } => {
                if !self.dragging {
                    return None;
                }

                let (last_x, last_y) = std::mem::replace(&mut self.last_cursor, (x, y));
                let (dx, dy) = (last_x - x, last_y - y);
                (dx != 0 || dy != 0).then_some(Intent::Pan { dx, dy })
            }
            InputEvent::SecondaryClick { x, y } => Some(Intent::ZoomOutAt { x, y }),
            InputEvent::Wheel { delta, x, y } => {
                if delta == 0.0 {
                    return None;
                }
                if let Some(last) = self.last_wheel {
                    if now.duration_since(last) < self.wheel_debounce {
                        return None;
                    }
                }

                self.last_wheel = Some(now);
                if delta > 0.0 {
                    Some(Intent::ZoomInAt { x, y })
                } else {
                    Some(Intent::ZoomOutAt { x, y })
                }
            }
            InputEvent::Control(control) => Some(control.into()),
        }
    }
}
