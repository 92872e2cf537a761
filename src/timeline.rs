use dubline::config::Config;
use dubline::controller::TimelineSnapshot;
use dubline::density::DensityBucket;
use dubline::entity::{EntityFeed, Severity};
use dubline::markers::MarkerStyle;
use dubline::session::Session;
use iced::widget::{column, container, row, text, Canvas, Space};
use iced::{Color, Element, Length};

use crate::Message;

mod lane;
mod overview;
mod ruler;

pub const LABEL_WIDTH: f32 = 150.0;
pub const OVERVIEW_HEIGHT: f32 = 48.0;
pub const RULER_HEIGHT: f32 = 28.0;
pub const LANE_HEIGHT: f32 = 56.0;
pub const LANE_SPACING: f32 = 4.0;

pub const PLAYHEAD_COLOR: Color = Color::from_rgb(0.85, 0.15, 0.15);
pub const REGION_COLOR: Color = Color::from_rgba(0.2, 0.4, 0.8, 0.18);
pub const REGION_EDGE_COLOR: Color = Color::from_rgba(0.2, 0.4, 0.8, 0.7);
pub const FLAG_COLOR: Color = Color::from_rgb(0.9, 0.3, 0.1);

pub fn severity_color(severity: Option<Severity>, fallback: Color) -> Color {
    match severity {
        Some(Severity::High) => Color::from_rgb(0.85, 0.2, 0.2),
        Some(Severity::Medium) => Color::from_rgb(0.95, 0.55, 0.1),
        Some(Severity::Low) => Color::from_rgb(0.85, 0.75, 0.15),
        None => fallback,
    }
}

struct Lane<'a> {
    title: &'static str,
    feed: &'a EntityFeed,
    style: MarkerStyle,
    color: Color,
}

pub fn view<'a>(
    session: &'a Session,
    snapshot: TimelineSnapshot,
    buckets: &'a [DensityBucket],
    config: &Config,
) -> Element<'a, Message> {
    let overview = Canvas::new(overview::OverviewProgram { buckets, snapshot })
        .width(Length::Fill)
        .height(Length::Fixed(OVERVIEW_HEIGHT));

    let ruler = Canvas::new(ruler::RulerProgram { snapshot })
        .width(Length::Fill)
        .height(Length::Fixed(RULER_HEIGHT));

    let lanes = [
        Lane {
            title: "Subtitles",
            feed: &session.subtitles,
            style: MarkerStyle::Tick,
            color: Color::from_rgb(0.3, 0.55, 0.8),
        },
        Lane {
            title: "Issues",
            feed: &session.issues,
            style: MarkerStyle::Pill,
            color: Color::from_rgb(0.85, 0.35, 0.3),
        },
        Lane {
            title: "Annotations",
            feed: &session.annotations,
            style: MarkerStyle::Pill,
            color: Color::from_rgb(0.45, 0.6, 0.35),
        },
        Lane {
            title: "Recommendations",
            feed: &session.recommendations,
            style: MarkerStyle::Tick,
            color: Color::from_rgb(0.55, 0.4, 0.7),
        },
    ];

    let mut content = column![
        row![Space::new().width(Length::Fixed(LABEL_WIDTH)), overview],
        row![Space::new().width(Length::Fixed(LABEL_WIDTH)), ruler],
    ]
    .spacing(LANE_SPACING);

    for lane in lanes {
        let title = container(text(format!("{} ({})", lane.title, lane.feed.len())).size(13))
            .width(Length::Fixed(LABEL_WIDTH))
            .height(Length::Fixed(LANE_HEIGHT))
            .center_y(Length::Fixed(LANE_HEIGHT))
            .padding([0, 6]);

        let canvas = Canvas::new(lane::LaneProgram {
            feed: lane.feed,
            snapshot,
            options: config.projection_options(lane.style),
            color: lane.color,
        })
        .width(Length::Fill)
        .height(Length::Fixed(LANE_HEIGHT));

        content = content.push(row![title, canvas]);
    }

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
