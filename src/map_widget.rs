use std::time::{Duration, Instant};

use iced::widget::canvas::{self, Frame, Geometry};
use iced::{Point, Rectangle, Size, mouse};
use iced_core::image::Handle;

use crate::{
    Canvas, Intent, Map,
    coordinate::TILE_SIZE,
    input::{InputEvent, InputState},
};

/// Composites tiles into an iced canvas [`Frame`].
pub struct FrameCanvas<'a> {
    frame: &'a mut Frame<iced::Renderer>,
}

impl<'a> FrameCanvas<'a> {
    pub fn new(frame: &'a mut Frame<iced::Renderer>) -> Self {
        Self { frame }
    }
}

impl Canvas for FrameCanvas<'_> {
    type Image = Handle;

    fn size(&self) -> (u32, u32) {
        let size = self.frame.size();
        (size.width as u32, size.height as u32)
    }

    fn draw_image(&mut self, image: &Handle, x: i32, y: i32) {
        let bounds = Rectangle::new(
            Point::new(x as f32, y as f32),
            Size::new(TILE_SIZE as f32, TILE_SIZE as f32),
        );
        self.frame
            .draw_image(bounds, iced_core::image::Image::new(image.clone()));
    }
}

/// A [slippy map](https://wiki.openstreetmap.org/wiki/Slippy_map) canvas program.
///
/// It paints the cached tiles of a [`Map`] and publishes the [`Intent`]s of the
/// user. The application applies them with [`Map::apply`], renders when
/// required and feeds the fetched tiles back with [`Map::handle`].
pub struct MapWidget<'a, Message> {
    map: &'a Map<Handle>,
    on_intent: fn(Intent) -> Message,
    wheel_debounce: Duration,
}

impl<'a, Message> MapWidget<'a, Message> {
    pub fn new(map: &'a Map<Handle>, on_intent: fn(Intent) -> Message) -> Self {
        Self {
            map,
            on_intent,
            wheel_debounce: InputState::default().wheel_debounce(),
        }
    }

    /// Minimum time between two wheel zoom steps, see [`MapOptions::wheel_debounce`](crate::MapOptions::wheel_debounce).
    pub fn with_wheel_debounce(self, wheel_debounce: Duration) -> Self {
        Self {
            wheel_debounce,
            ..self
        }
    }

    /// The intent to publish for `event`, and whether the event is consumed by it.
    ///
    /// A size change is only reported on events that produce nothing else, the
    /// redraw following every published intent brings the next one.
    fn intent(
        &self,
        state: &mut InputState,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
        now: Instant,
    ) -> Option<(Intent, bool)> {
        state.set_wheel_debounce(self.wheel_debounce);

        let position = cursor
            .position_in(bounds)
            .map(|point| (point.x.round() as i32, point.y.round() as i32));

        let intent = input_event(event, position).and_then(|input| state.handle(input, now));
        if let Some(intent) = intent {
            return Some((intent, true));
        }

        let (width, height) = (bounds.width as u32, bounds.height as u32);
        ((width, height) != self.map.size()).then_some((Intent::Resize { width, height }, false))
    }
}

fn input_event(event: &canvas::Event, position: Option<(i32, i32)>) -> Option<InputEvent> {
    let iced::Event::Mouse(event) = event else {
        return None;
    };

    match event {
        mouse::Event::ButtonPressed(mouse::Button::Left) => {
            position.map(|(x, y)| InputEvent::ButtonPressed { x, y })
        }
        mouse::Event::ButtonReleased(mouse::Button::Left) => Some(InputEvent::ButtonReleased),
        mouse::Event::ButtonPressed(mouse::Button::Right) => {
            position.map(|(x, y)| InputEvent::SecondaryClick { x, y })
        }
        mouse::Event::CursorMoved { .. } => Some(match position {
            Some((x, y)) => InputEvent::CursorMoved { x, y },
            None => InputEvent::CursorLeft,
        }),
        mouse::Event::CursorLeft => Some(InputEvent::CursorLeft),
        mouse::Event::WheelScrolled { delta } => {
            let delta = match delta {
                mouse::ScrollDelta::Lines { y, .. } => *y,
                mouse::ScrollDelta::Pixels { y, .. } => *y,
            };
            position.map(|(x, y)| InputEvent::Wheel { delta, x, y })
        }
        _ => None,
    }
}

impl<'a, Message> canvas::Program<Message> for MapWidget<'a, Message> {
    type State = InputState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let (intent, captured) = self.intent(state, event, bounds, cursor, Instant::now())?;
        let action = canvas::Action::publish((self.on_intent)(intent));

        Some(if captured { action.and_capture() } else { action })
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        self.map.paint(&mut FrameCanvas::new(&mut frame));
        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.is_dragging() {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}
