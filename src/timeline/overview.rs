use dubline::controller::{TimelineInput, TimelineSnapshot};
use dubline::coords::{overview_fraction, overview_time};
use dubline::density::DensityBucket;
use dubline::region::RegionSelection;
use iced::mouse;
use iced::widget::canvas::{self, Action, Geometry, Program};
use iced::{keyboard, Color, Event, Point, Rectangle, Renderer, Size, Theme};

use super::{FLAG_COLOR, PLAYHEAD_COLOR, REGION_COLOR, REGION_EDGE_COLOR};

const FLAG_HEIGHT: f32 = 4.0;

/// Whole-track strip: density bars, the visible window, the region and the playhead.
pub(crate) struct OverviewProgram<'a> {
    pub(crate) buckets: &'a [DensityBucket],
    pub(crate) snapshot: TimelineSnapshot,
}

#[derive(Default)]
pub(crate) struct OverviewState {
    modifiers: keyboard::Modifiers,
    scrubbing: bool,
}

impl OverviewProgram<'_> {
    fn x_of(&self, time: f64, width: f32) -> f32 {
        (overview_fraction(time, self.snapshot.domain.duration) * width as f64) as f32
    }

    fn time_at(&self, x: f32, width: f32) -> f64 {
        let fraction = if width > 0.0 {
            (x / width).clamp(0.0, 1.0) as f64
        } else {
            0.0
        };
        overview_time(fraction, self.snapshot.domain.duration)
    }
}

impl Program<crate::Message> for OverviewProgram<'_> {
    type State = OverviewState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        frame.fill_rectangle(
            Point::new(0.0, 0.0),
            Size::new(bounds.width, bounds.height),
            Color::from_rgb(0.97, 0.97, 0.97),
        );

        let domain = self.snapshot.domain;
        if domain.duration <= 0.0 || bounds.width <= 0.0 {
            return vec![frame.into_geometry()];
        }

        let bar_width = bounds.width / self.buckets.len().max(1) as f32;
        let bar_area = bounds.height - FLAG_HEIGHT - 1.0;
        for bucket in self.buckets {
            let x = bucket.index as f32 * bar_width;
            let height = bucket.coverage as f32 * bar_area;
            if height > 0.0 {
                frame.fill_rectangle(
                    Point::new(x, bounds.height - height),
                    Size::new((bar_width - 1.0).max(1.0), height),
                    Color::from_rgb(0.55, 0.65, 0.8),
                );
            }
            if bucket.has_flag {
                frame.fill_rectangle(
                    Point::new(x, 0.0),
                    Size::new(bar_width.max(1.0), FLAG_HEIGHT),
                    FLAG_COLOR,
                );
            }
        }

        match self.snapshot.region {
            RegionSelection::Empty => {}
            RegionSelection::Anchored { start } => {
                let x = self.x_of(start, bounds.width);
                frame.stroke(
                    &canvas::Path::line(Point::new(x, 0.0), Point::new(x, bounds.height)),
                    canvas::Stroke::default()
                        .with_color(REGION_EDGE_COLOR)
                        .with_width(1.0),
                );
            }
            RegionSelection::Bounded { .. } => {
                if let Some((start, end)) = self.snapshot.region.normalized() {
                    let x = self.x_of(start, bounds.width);
                    let width = (self.x_of(end, bounds.width) - x).max(1.0);
                    frame.fill_rectangle(
                        Point::new(x, 0.0),
                        Size::new(width, bounds.height),
                        REGION_COLOR,
                    );
                }
            }
        }

        let view_x = self.x_of(domain.window_start, bounds.width);
        let view_width =
            (self.x_of(domain.window_start + domain.visible_window, bounds.width) - view_x).max(4.0);
        frame.fill_rectangle(
            Point::new(view_x, 1.0),
            Size::new(view_width, bounds.height - 2.0),
            Color::from_rgba(0.1, 0.3, 0.6, 0.12),
        );
        frame.stroke(
            &canvas::Path::rectangle(
                Point::new(view_x, 1.0),
                Size::new(view_width, bounds.height - 2.0),
            ),
            canvas::Stroke::default()
                .with_color(Color::from_rgba(0.1, 0.3, 0.6, 0.5))
                .with_width(1.0),
        );

        let playhead = self.x_of(domain.current_time, bounds.width);
        frame.stroke(
            &canvas::Path::line(Point::new(playhead, 0.0), Point::new(playhead, bounds.height)),
            canvas::Stroke::default()
                .with_color(PLAYHEAD_COLOR)
                .with_width(1.5),
        );

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<crate::Message>> {
        match event {
            Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                state.modifiers = *modifiers;
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                let time = self.time_at(position.x, bounds.width);
                let shift = state.modifiers.shift();
                state.scrubbing = !shift;
                return Some(Action::publish(crate::Message::Click { time, shift }).and_capture());
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) if state.scrubbing => {
                let position = cursor.position_in(bounds)?;
                let time = self.time_at(position.x, bounds.width);
                return Some(Action::publish(crate::Message::Timeline(TimelineInput::Seek(
                    time,
                ))));
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                state.scrubbing = false;
            }
            _ => {}
        }
        None
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.scrubbing || cursor.position_in(bounds).is_some() {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}
