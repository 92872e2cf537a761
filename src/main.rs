use std::path::PathBuf;

use clap::Parser;
use dubline::config::Config;
use dubline::controller::{TimelineInput, TimelineModel};
use dubline::density::DensityMap;
use dubline::region::RegionSelection;
use dubline::session::Session;
use dubline::ticks::format_time_label;
use iced::widget::{button, column, container, row, slider, text, Space};
use iced::{Alignment, Element, Length, Task};
use log::{error, info};

mod timeline;

/// Review subtitles and QC issues against a timeline.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
struct Args {
    /// Session file to open on startup.
    session: Option<PathBuf>,

    /// TOML file with timeline tunables.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of bars in the overview density strip.
    #[arg(long)]
    bars: Option<usize>,
}

pub fn main() -> iced::Result {
    env_logger::init();
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(2);
        }
    };

    iced::application(
        move || Dubline::new(config.clone(), args.session.clone()),
        Dubline::update,
        Dubline::view,
    )
    .title(Dubline::title)
    .run()
}

fn load_config(args: &Args) -> dubline::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(bars) = args.bars {
        config.bar_count = bars;
        config.validate()?;
    }
    Ok(config)
}

#[derive(Debug, Clone)]
pub enum Message {
    OpenSession,
    SessionSelected(PathBuf),
    SessionLoaded(Box<Session>),
    ErrorOccurred(String),
    Timeline(TimelineInput),
    Click { time: f64, shift: bool },
    None,
}

struct Dubline {
    config: Config,
    session: Session,
    model: TimelineModel,
    density: DensityMap,
}

impl Dubline {
    fn new(config: Config, session: Option<PathBuf>) -> (Self, Task<Message>) {
        let task = match session {
            Some(path) => load_session(path),
            None => Task::none(),
        };
        let mut app = Dubline {
            model: TimelineModel::with_config(&config, 0.0),
            session: Session::default(),
            density: DensityMap::new(),
            config,
        };
        app.refresh_density();
        (app, task)
    }

    fn title(&self) -> String {
        match self.session.path.as_ref().and_then(|path| path.file_name()) {
            Some(name) => format!("{} - Dubline", name.to_string_lossy()),
            None => "Dubline".to_string(),
        }
    }

    fn refresh_density(&mut self) {
        self.density.refresh(
            &self.session.overview_feeds(),
            self.model.domain().duration(),
            self.config.bar_count,
        );
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenSession => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .add_filter("dubline session", &["toml"])
                            .pick_file()
                            .await
                    },
                    |file_handle| match file_handle {
                        Some(handle) => Message::SessionSelected(handle.path().to_path_buf()),
                        None => Message::None,
                    },
                );
            }
            Message::SessionSelected(path) => return load_session(path),
            Message::SessionLoaded(session) => {
                info!(
                    "session {:?} loaded ({}s)",
                    session.path, session.duration
                );
                self.model = TimelineModel::with_config(&self.config, session.duration);
                self.session = *session;
                self.refresh_density();
            }
            Message::ErrorOccurred(e) => {
                error!("{e}");
            }
            Message::Timeline(input) => {
                self.model.apply(input);
                if let TimelineInput::SetDuration(_) = input {
                    self.refresh_density();
                }
            }
            Message::Click { time, shift } => self.model.click(time, shift),
            Message::None => {}
        }
        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        let snapshot = self.model.snapshot();
        let domain = snapshot.domain;
        let bounds = self.model.domain().zoom_bounds();

        let session_name = match &self.session.path {
            Some(path) => path.display().to_string(),
            None => "No session".to_string(),
        };

        let region_label = match snapshot.region {
            RegionSelection::Empty => String::new(),
            RegionSelection::Anchored { start } => {
                format!("Region from {}", format_time_label(start, 1.0))
            }
            RegionSelection::Bounded { .. } => {
                let (start, end) = snapshot.region.normalized().unwrap_or_default();
                format!(
                    "Region {} - {}",
                    format_time_label(start, 1.0),
                    format_time_label(end, 1.0)
                )
            }
        };

        let zoom_to_region = button("Zoom to region").on_press_maybe(
            matches!(snapshot.region, RegionSelection::Bounded { .. })
                .then_some(Message::Timeline(TimelineInput::ZoomToRegion)),
        );
        let clear_region = button("Clear region").on_press_maybe(
            (!snapshot.region.is_empty()).then_some(Message::Timeline(TimelineInput::ClearRegion)),
        );

        let header = row![
            button("Open").on_press(Message::OpenSession),
            text(session_name),
            Space::new().width(Length::Fill),
            text(region_label),
            zoom_to_region,
            clear_region,
            text(format!("Zoom {:.2}x", domain.zoom_level)),
            slider(bounds.min()..=bounds.max(), domain.zoom_level, |level| {
                Message::Timeline(TimelineInput::SetZoom(level))
            })
            .step(0.01)
            .width(Length::Fixed(160.0)),
        ]
        .spacing(10)
        .padding(5)
        .align_y(Alignment::Center);

        if domain.duration <= 0.0 {
            let content = container(text("Open a session to start").size(20))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill);
            return column![header, content].into();
        }

        let max_start = (domain.duration - domain.visible_window).max(0.0);
        let pan = slider(0.0..=max_start, domain.window_start, |start| {
            Message::Timeline(TimelineInput::ScrollTo(start))
        })
        .step(0.01);

        let status = text(format!(
            "{} / {}",
            format_time_label(domain.current_time, 1.0),
            format_time_label(domain.duration, 1.0)
        ));

        let body = timeline::view(
            &self.session,
            snapshot,
            self.density.buckets(),
            &self.config,
        );

        column![
            header,
            body,
            row![pan, status].spacing(10).padding(5).align_y(Alignment::Center)
        ]
        .into()
    }
}

fn load_session(path: PathBuf) -> Task<Message> {
    Task::perform(
        async move {
            match Session::load(&path) {
                Ok(session) => Message::SessionLoaded(Box::new(session)),
                Err(e) => Message::ErrorOccurred(e.to_string()),
            }
        },
        |msg| msg,
    )
}
