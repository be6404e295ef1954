use std::time::Duration;

use iced::widget::{button, canvas, column, row, text};
use iced::{self, Element, Length, Task, Theme};
use iced_core::image::Handle;
use minimap::{
    Control, DeferredPaint, HttpLoader, Intent, Map, MapOptions, MapWidget, TileEvent,
    TileLoader, sources::OviMaps,
};

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Error)
        .filter_module("minimap", log::LevelFilter::Debug)
        .init();

    iced::application(Application::boot, Application::update, Application::view)
        .title("Minimap")
        .theme(Theme::Dark)
        .run()
        .unwrap();
}

#[derive(Debug, Clone)]
enum Message {
    Intent(Intent),
    Tile(TileEvent<Handle>),
}

struct Application {
    map: Map<Handle>,
    loader: HttpLoader,
    wheel_debounce: Duration,
}

impl Application {
    pub fn boot() -> (Self, Task<Message>) {
        let options = MapOptions::default();
        let mut application = Application {
            map: Map::new(&options, OviMaps, 800, 600).unwrap(),
            loader: HttpLoader::new().unwrap(),
            wheel_debounce: options.wheel_debounce(),
        };
        let task = application.render();
        (application, task)
    }

    /// The widget paints the cache itself, a render pass only has to find the tiles to fetch.
    fn render(&mut self) -> Task<Message> {
        let (width, height) = self.map.size();
        let fetches = self.map.render(&mut DeferredPaint::new(width, height));

        Task::batch(
            fetches
                .into_iter()
                .map(|fetch| Task::future(self.loader.fetch(fetch)).map(Message::Tile)),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Intent(intent) => match self.map.apply(intent) {
                Ok(redraw) if redraw.is_required() => return self.render(),
                Ok(_) => {}
                Err(error) => log::warn!("{error}"),
            },
            Message::Tile(event) => {
                let (width, height) = self.map.size();
                let _ = self.map.handle(event, &mut DeferredPaint::new(width, height));
            }
        }

        Task::none()
    }

    pub fn view(&self) -> impl Into<Element<'_, Message>> {
        let control = |label, control: Control| {
            button(text(label)).on_press(Message::Intent(control.into()))
        };

        column![
            row![
                control("+", Control::ZoomIn),
                control("-", Control::ZoomOut),
                control("W", Control::PanWest),
                control("E", Control::PanEast),
                control("N", Control::PanNorth),
                control("S", Control::PanSouth),
            ]
            .spacing(4),
            canvas(
                MapWidget::new(&self.map, Message::Intent)
                    .with_wheel_debounce(self.wheel_debounce)
            )
            .width(Length::Fill)
            .height(Length::Fill),
        ]
        .spacing(4)
    }
}
