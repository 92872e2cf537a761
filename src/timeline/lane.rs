use dubline::controller::{TimelineInput, TimelineSnapshot};
use dubline::coords::ScreenMapper;
use dubline::entity::EntityFeed;
use dubline::markers::{project_feed, MarkerProjection, ProjectionOptions};
use iced::mouse;
use iced::widget::canvas::{self, Action, Geometry, Program};
use iced::{keyboard, Color, Event, Point, Rectangle, Renderer, Size, Theme};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{severity_color, FLAG_COLOR, LANE_HEIGHT, PLAYHEAD_COLOR, REGION_COLOR};

const PILL_HEIGHT: f32 = 16.0;
const PILL_PADDING: f32 = 4.0;
const CHAR_WIDTH: f32 = 6.5;
const MAX_LABEL_COLUMNS: usize = 28;
const WHEEL_ZOOM_STEP: f64 = 1.15;
const WHEEL_PAN_PIXELS: f32 = 30.0;

/// Cut `label` to at most `columns` terminal columns, adding an ellipsis.
fn truncate_label(label: &str, columns: usize) -> String {
    if label.width() <= columns {
        return label.to_string();
    }
    let mut used = 0;
    let mut out = String::new();
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > columns {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// One entity feed drawn against the visible window.
pub(crate) struct LaneProgram<'a> {
    pub(crate) feed: &'a EntityFeed,
    pub(crate) snapshot: TimelineSnapshot,
    pub(crate) options: ProjectionOptions,
    pub(crate) color: Color,
}

#[derive(Default)]
pub(crate) struct LaneState {
    modifiers: keyboard::Modifiers,
}

impl LaneProgram<'_> {
    fn draw_marker(
        &self,
        frame: &mut canvas::Frame,
        projection: &MarkerProjection,
        width: f32,
    ) {
        let entity = &self.feed.entities()[projection.position];
        let color = severity_color(entity.severity, self.color);
        let x = projection.screen_fraction as f32 * width;

        match projection.end_fraction {
            Some(end) => {
                let x_end = end as f32 * width;
                let top = PILL_HEIGHT + 4.0;
                frame.fill_rectangle(
                    Point::new(x, top),
                    Size::new((x_end - x).max(1.0), LANE_HEIGHT - top - 4.0),
                    Color { a: 0.55, ..color },
                );
            }
            None => {
                frame.stroke(
                    &canvas::Path::line(Point::new(x, 0.0), Point::new(x, LANE_HEIGHT)),
                    canvas::Stroke::default().with_color(color).with_width(2.0),
                );
            }
        }

        if entity.is_flagged() {
            frame.fill(&canvas::Path::circle(Point::new(x, LANE_HEIGHT - 4.0), 3.0), FLAG_COLOR);
        }

        let Some(label_fraction) = projection.label_fraction else {
            return;
        };
        let label = truncate_label(&entity.label, MAX_LABEL_COLUMNS);
        let pill_x = label_fraction as f32 * width;
        let pill_y = (projection.stack as f32 * (PILL_HEIGHT + 2.0)) % (LANE_HEIGHT - PILL_HEIGHT);
        let pill_width = label.width() as f32 * CHAR_WIDTH + PILL_PADDING * 2.0;

        frame.fill_rectangle(
            Point::new(pill_x, pill_y),
            Size::new(pill_width, PILL_HEIGHT),
            color,
        );
        frame.fill_text(canvas::Text {
            content: label,
            position: Point::new(pill_x + PILL_PADDING, pill_y + 2.0),
            color: Color::WHITE,
            size: 11.0.into(),
            ..Default::default()
        });
    }
}

impl Program<crate::Message> for LaneProgram<'_> {
    type State = LaneState;

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
            Color::from_rgb(0.99, 0.99, 0.99),
        );

        let viewport = self.snapshot.domain.viewport();
        if viewport.is_empty() || bounds.width <= 0.0 {
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

        for projection in project_feed(self.feed, viewport, self.options) {
            self.draw_marker(&mut frame, &projection, bounds.width);
        }

        if let Some(fraction) = self.snapshot.domain.playhead_fraction() {
            let x = fraction as f32 * bounds.width;
            frame.stroke(
                &canvas::Path::line(Point::new(x, 0.0), Point::new(x, bounds.height)),
                canvas::Stroke::default()
                    .with_color(PLAYHEAD_COLOR)
                    .with_width(1.0),
            );
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<crate::Message>> {
        let mapper = ScreenMapper::new(self.snapshot.domain.viewport(), bounds.width);
        match event {
            Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                state.modifiers = *modifiers;
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                return Some(
                    Action::publish(crate::Message::Click {
                        time: mapper.x_to_time(position.x),
                        shift: state.modifiers.shift(),
                    })
                    .and_capture(),
                );
            }
            Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let position = cursor.position_in(bounds)?;
                let y = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => *y,
                    mouse::ScrollDelta::Pixels { y, .. } => *y / WHEEL_PAN_PIXELS,
                };
                if y == 0.0 {
                    return None;
                }
                let input = if state.modifiers.shift() {
                    let pixels = -y * WHEEL_PAN_PIXELS;
                    let seconds = pixels as f64 * mapper.viewport.span / bounds.width.max(1.0) as f64;
                    TimelineInput::PanWindow(seconds)
                } else {
                    TimelineInput::ZoomBy {
                        factor: WHEEL_ZOOM_STEP.powf(y as f64),
                        anchor: mapper.x_to_time(position.x),
                    }
                };
                return Some(Action::publish(crate::Message::Timeline(input)).and_capture());
            }
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_labels_are_kept() {
        assert_eq!(truncate_label("Clipping", 28), "Clipping");
    }

    #[test]
    fn long_labels_get_an_ellipsis() {
        let label = truncate_label("Lip-sync drift in the second act", 10);
        assert_eq!(label, "Lip-sync …");
        assert!(label.width() <= 10);
    }

    #[test]
    fn wide_characters_count_double() {
        let label = truncate_label("字幕字幕字幕", 5);
        assert_eq!(label, "字幕…");
    }
}
