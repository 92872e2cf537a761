use dubline::controller::TimelineSnapshot;
use dubline::coords::ScreenMapper;
use dubline::ticks::{format_time_label, interval_for_extent, visible_ticks};
use iced::mouse;
use iced::widget::canvas::{self, Action, Geometry, Program};
use iced::{keyboard, Color, Event, Point, Rectangle, Renderer, Size, Theme};

use super::{PLAYHEAD_COLOR, REGION_COLOR};

const TICK_SPACING: f32 = 100.0;

/// Time ruler for the visible window.
pub(crate) struct RulerProgram {
    pub(crate) snapshot: TimelineSnapshot,
}

#[derive(Default)]
pub(crate) struct RulerState {
    modifiers: keyboard::Modifiers,
}

impl Program<crate::Message> for RulerProgram {
    type State = RulerState;

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
            Color::from_rgb(0.95, 0.95, 0.95),
        );

        let viewport = self.snapshot.domain.viewport();
        if viewport.is_empty() {
            return vec![frame.into_geometry()];
        }
        let mapper = ScreenMapper::new(viewport, bounds.width);

        if let Some((start, end)) = self.snapshot.region.normalized() {
            let x = mapper.time_to_x(start.max(viewport.start));
            let x_end = mapper.time_to_x(end.min(viewport.end()));
            if x_end > x {
                frame.fill_rectangle(
                    Point::new(x, 0.0),
                    Size::new(x_end - x, bounds.height),
                    REGION_COLOR,
                );
            }
        }

        let step = interval_for_extent(viewport, bounds.width, TICK_SPACING);
        for time in visible_ticks(viewport, step) {
            let x = mapper.time_to_x(time);
            frame.stroke(
                &canvas::Path::line(
                    Point::new(x, bounds.height * 0.5),
                    Point::new(x, bounds.height),
                ),
                canvas::Stroke::default()
                    .with_color(Color::from_rgb(0.36, 0.36, 0.36))
                    .with_width(1.0),
            );
            frame.fill_text(canvas::Text {
                content: format_time_label(time, step),
                position: Point::new(x + 2.0, 3.0),
                color: Color::from_rgb(0.2, 0.2, 0.2),
                size: 11.0.into(),
                ..Default::default()
            });
        }

        if let Some(fraction) = self.snapshot.domain.playhead_fraction() {
            let x = fraction as f32 * bounds.width;
            frame.fill(
                &canvas::Path::new(|path| {
                    path.move_to(Point::new(x - 5.0, 0.0));
                    path.line_to(Point::new(x + 5.0, 0.0));
                    path.line_to(Point::new(x, 8.0));
                    path.close();
                }),
                PLAYHEAD_COLOR,
            );
            frame.stroke(
                &canvas::Path::line(Point::new(x, 0.0), Point::new(x, bounds.height)),
                canvas::Stroke::default()
                    .with_color(PLAYHEAD_COLOR)
                    .with_width(1.5),
            );
        }

        frame.stroke(
            &canvas::Path::line(
                Point::new(0.0, bounds.height - 0.5),
                Point::new(bounds.width, bounds.height - 0.5),
            ),
            canvas::Stroke::default()
                .with_color(Color::from_rgb(0.85, 0.85, 0.85))
                .with_width(1.0),
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
                let mapper = ScreenMapper::new(self.snapshot.domain.viewport(), bounds.width);
                return Some(
                    Action::publish(crate::Message::Click {
                        time: mapper.x_to_time(position.x),
                        shift: state.modifiers.shift(),
                    })
                    .and_capture(),
                );
            }
            _ => {}
        }
        None
    }
}
