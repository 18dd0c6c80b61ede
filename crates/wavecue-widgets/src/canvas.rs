//! Canvas program for one waveform view
//!
//! Draws the view's current display columns, segment bodies, markers with
//! their labels, and the playhead. Pointer input is translated into
//! `WaveformMessage`s which the host applies to its `Viewer` (see
//! `crate::apply_message`).

use iced::alignment::Vertical;
use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Program, Stroke, Text};
use iced::{mouse, Color, Point, Rectangle, Size, Theme};
use wavecue_core::layers::{Marker, PointsLayer, SegmentsLayer};
use wavecue_core::view::{DisplayFrame, ViewKind, WaveformView};

use crate::theme::{to_color, WaveformStyle};

/// Pixels scrolled per wheel line
const LINE_PIXELS: f32 = 40.0;

/// Pointer travel below which a press/release in the zoomview counts as a click
const CLICK_SLOP: f32 = 3.0;

/// Height of the marker flag drawn at the top of point markers
const FLAG_HEIGHT: f32 = 12.0;

/// Gap between a marker or segment edge and its label
const LABEL_PADDING: f32 = 4.0;

// =============================================================================
// Messages and interaction state
// =============================================================================

/// Pointer intent produced by a waveform canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaveformMessage {
    /// Seek playback to a time in seconds
    Seek(f64),
    /// Pointer pressed on a marker at view-relative x
    DragStart { x: f64 },
    DragMove { x: f64 },
    DragEnd,
    /// Scroll the zoomview by pixels (positive moves later in time)
    Scroll(f64),
}

/// Gesture in progress on a canvas
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    /// Dragging an annotation marker
    Marker,
    /// Overview press: seek follows the pointer
    Seeking,
    /// Zoomview press away from markers: click to seek or drag to pan
    Pan { start_x: f32, last_x: f32, moved: bool },
}

/// Pointer input reduced to what the gesture logic needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pointer {
    Press { x: f32 },
    Move { x: f32 },
    Release { x: Option<f32> },
    /// Wheel delta already converted to pixels
    Wheel { pixels: f32 },
}

/// Advance `gesture` for one pointer event
///
/// Editable marker hits are looked up in the view's layers so a press on
/// one starts a drag in either view. Presses anywhere else, including on
/// markers that are not editable, seek (overview) or pan (zoomview).
pub fn handle_pointer(
    view: &WaveformView,
    gesture: &mut Gesture,
    pointer: Pointer,
) -> Option<WaveformMessage> {
    let display = view.display();
    match pointer {
        Pointer::Press { x } => {
            if marker_under(view, x) {
                *gesture = Gesture::Marker;
                return Some(WaveformMessage::DragStart { x: x as f64 });
            }
            match view.kind() {
                ViewKind::Overview => {
                    *gesture = Gesture::Seeking;
                    Some(WaveformMessage::Seek(seek_time(&display, x)))
                }
                ViewKind::Zoomview => {
                    *gesture = Gesture::Pan {
                        start_x: x,
                        last_x: x,
                        moved: false,
                    };
                    None
                }
            }
        }
        Pointer::Move { x } => match gesture {
            Gesture::Marker => Some(WaveformMessage::DragMove { x: x as f64 }),
            Gesture::Seeking => Some(WaveformMessage::Seek(seek_time(&display, x))),
            Gesture::Pan {
                start_x,
                last_x,
                moved,
            } => {
                if !*moved && (x - *start_x).abs() < CLICK_SLOP {
                    return None;
                }
                *moved = true;
                let delta = *last_x - x;
                *last_x = x;
                (delta != 0.0).then_some(WaveformMessage::Scroll(delta as f64))
            }
            Gesture::Idle => None,
        },
        Pointer::Release { x } => {
            let finished = std::mem::take(gesture);
            match finished {
                Gesture::Marker => Some(WaveformMessage::DragEnd),
                Gesture::Pan { start_x, moved, .. } if !moved => {
                    let x = x.unwrap_or(start_x);
                    Some(WaveformMessage::Seek(seek_time(&display, x)))
                }
                _ => None,
            }
        }
        Pointer::Wheel { pixels } => match view.kind() {
            ViewKind::Zoomview if pixels != 0.0 => Some(WaveformMessage::Scroll(pixels as f64)),
            _ => None,
        },
    }
}

fn marker_under(view: &WaveformView, x: f32) -> bool {
    let x = x as f64;
    view.points_layer().draggable_at(x).is_some()
        || view.segments_layer().draggable_at(x).is_some()
}

fn seek_time(display: &DisplayFrame<'_>, x: f32) -> f64 {
    display.time_at(x.max(0.0) as f64).max(0.0)
}

/// Wheel delta in pixels, positive for later in time
fn wheel_pixels(delta: mouse::ScrollDelta) -> f32 {
    let (x, y, factor) = match delta {
        mouse::ScrollDelta::Lines { x, y } => (x, y, LINE_PIXELS),
        mouse::ScrollDelta::Pixels { x, y } => (x, y, 1.0),
    };
    let dominant = if x.abs() > y.abs() { x } else { -y };
    dominant * factor
}

// =============================================================================
// Canvas program
// =============================================================================

/// Canvas program rendering one `WaveformView`
pub struct WaveformCanvas<'a, Message> {
    pub view: &'a WaveformView,
    pub style: WaveformStyle,
    pub on_message: Box<dyn Fn(WaveformMessage) -> Message + 'a>,
}

impl<'a, Message> WaveformCanvas<'a, Message> {
    fn publish(&self, message: Option<WaveformMessage>) -> Option<canvas::Action<Message>> {
        message.map(|m| canvas::Action::publish((self.on_message)(m)))
    }
}

impl<'a, Message> Program<Message> for WaveformCanvas<'a, Message>
where
    Message: Clone,
{
    type State = Gesture;

    fn update(
        &self,
        gesture: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let position = cursor.position_in(bounds);

        let pointer = match (event, position) {
            (Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)), Some(p)) => {
                Pointer::Press { x: p.x }
            }
            (Event::Mouse(mouse::Event::CursorMoved { .. }), Some(p)) => Pointer::Move { x: p.x },
            (Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)), p) => {
                Pointer::Release { x: p.map(|p| p.x) }
            }
            (Event::Mouse(mouse::Event::WheelScrolled { delta }), Some(_)) => Pointer::Wheel {
                pixels: wheel_pixels(*delta),
            },
            _ => return None,
        };

        self.publish(handle_pointer(self.view, gesture, pointer))
    }

    fn mouse_interaction(
        &self,
        gesture: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        match gesture {
            Gesture::Marker => return mouse::Interaction::ResizingHorizontally,
            Gesture::Pan { moved: true, .. } => return mouse::Interaction::Grabbing,
            _ => {}
        }
        let Some(position) = cursor.position_in(bounds) else {
            return mouse::Interaction::default();
        };
        if marker_under(self.view, position.x) {
            mouse::Interaction::ResizingHorizontally
        } else {
            match self.view.kind() {
                ViewKind::Overview => mouse::Interaction::Pointer,
                ViewKind::Zoomview => mouse::Interaction::Grab,
            }
        }
    }

    fn draw(
        &self,
        _gesture: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), self.style.background);

        let width = bounds.width;
        let height = bounds.height;
        let display = self.view.display();

        draw_segment_bodies(&mut frame, self.view.segments_layer(), &self.style, height);
        draw_peaks(&mut frame, &display, width, height, self.style.waveform);
        draw_segment_markers(&mut frame, self.view.segments_layer(), &self.style, height);
        draw_points(&mut frame, self.view.points_layer(), &self.style, height);
        for label in marker_labels(self.view, height) {
            frame.fill_text(Text {
                content: label.text.to_string(),
                position: Point::new(label.x, label.y),
                size: self.style.label_size.into(),
                color: label.color,
                align_y: label.align_y.into(),
                ..Text::default()
            });
        }

        let playhead = self.view.playhead();
        if playhead.is_visible() && !self.view.is_animating() {
            let x = playhead.x() as f32;
            frame.stroke(
                &Path::line(Point::new(x, 0.0), Point::new(x, height)),
                Stroke::default()
                    .with_color(self.style.playhead)
                    .with_width(1.5),
            );
        }

        vec![frame.into_geometry()]
    }
}

// =============================================================================
// Drawing helpers
// =============================================================================

/// Draw min/max columns, one lane per channel
fn draw_peaks(frame: &mut Frame, display: &DisplayFrame<'_>, width: f32, height: f32, color: Color) {
    let channels = display.data.channel_count().max(1);
    let lane = height / channels as f32;
    let half = lane * 0.45;
    let columns = display.width.min(width.max(0.0).ceil() as usize);

    for channel in 0..channels {
        let centre = lane * (channel as f32 + 0.5);
        for x in 0..columns {
            let Some(peak) = display.column(channel, x) else {
                break;
            };
            let top = centre - peak.max.clamp(-1.0, 1.0) * half;
            let bottom = centre - peak.min.clamp(-1.0, 1.0) * half;
            frame.fill_rectangle(
                Point::new(x as f32, top),
                Size::new(1.0, (bottom - top).max(1.0)),
                color,
            );
        }
    }
}

fn draw_segment_bodies(frame: &mut Frame, layer: &SegmentsLayer, style: &WaveformStyle, height: f32) {
    if !layer.is_visible() {
        return;
    }
    for (_, shape) in layer.shapes() {
        let body_color = Color {
            a: style.segment_body_alpha,
            ..to_color(shape.color)
        };
        frame.fill_rectangle(
            Point::new(shape.body.x_start as f32, 0.0),
            Size::new(shape.body.width() as f32, height),
            body_color,
        );
    }
}

fn draw_segment_markers(frame: &mut Frame, layer: &SegmentsLayer, style: &WaveformStyle, height: f32) {
    if !layer.is_visible() {
        return;
    }
    for (_, shape) in layer.shapes() {
        for marker in [&shape.start, &shape.end] {
            let x = marker.position() as f32;
            frame.stroke(
                &Path::line(Point::new(x, 0.0), Point::new(x, height)),
                Stroke::default()
                    .with_color(to_color(marker.color()))
                    .with_width(style.marker_line_width),
            );
        }
    }
}

fn draw_points(frame: &mut Frame, layer: &PointsLayer, style: &WaveformStyle, height: f32) {
    if !layer.is_visible() {
        return;
    }
    for (_, marker) in layer.shapes() {
        let x = marker.position() as f32;
        let color = to_color(marker.color());

        frame.stroke(
            &Path::line(Point::new(x, 0.0), Point::new(x, height)),
            Stroke::default()
                .with_color(color)
                .with_width(style.marker_line_width),
        );

        let flag = Path::new(|builder| {
            builder.move_to(Point::new(x, FLAG_HEIGHT));
            builder.line_to(Point::new(x - FLAG_HEIGHT / 2.0, 0.0));
            builder.line_to(Point::new(x + FLAG_HEIGHT / 2.0, 0.0));
            builder.close();
        });
        frame.fill(&flag, color);
    }
}

/// Text drawn next to a marker
#[derive(Debug, Clone, PartialEq)]
struct MarkerLabel<'a> {
    x: f32,
    y: f32,
    align_y: Vertical,
    text: &'a str,
    color: Color,
}

/// Labels of the visible markers
///
/// Point labels hang beside the flag at the top of the view. Segment labels
/// sit inside the body at the bottom. Empty labels are skipped.
fn marker_labels(view: &WaveformView, height: f32) -> Vec<MarkerLabel<'_>> {
    let mut labels = Vec::new();

    if view.points_layer().is_visible() {
        for (_, marker) in view.points_layer().shapes() {
            if let Marker::Point { x, label, color, .. } = marker {
                if !label.is_empty() {
                    labels.push(MarkerLabel {
                        x: *x as f32 + FLAG_HEIGHT / 2.0 + LABEL_PADDING,
                        y: LABEL_PADDING,
                        align_y: Vertical::Top,
                        text: label,
                        color: to_color(*color),
                    });
                }
            }
        }
    }

    if view.segments_layer().is_visible() {
        for (_, shape) in view.segments_layer().shapes() {
            if !shape.label.is_empty() {
                labels.push(MarkerLabel {
                    x: shape.body.x_start as f32 + LABEL_PADDING,
                    y: height - LABEL_PADDING,
                    align_y: Vertical::Bottom,
                    text: &shape.label,
                    color: to_color(shape.color),
                });
            }
        }
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wavecue_core::annotations::{Point as CuePoint, PointOptions, Points, SegmentOptions, Segments};
    use crate::theme::ZOOMVIEW_HEIGHT;
    use wavecue_core::config::ViewerConfig;
    use wavecue_core::waveform::WaveformData;
    use wavecue_core::Rgba;

    /// 10 seconds at 1000Hz, zoomview 200px at scale 10 (100 px per second)
    fn zoomview() -> WaveformView {
        let samples = vec![0.5f32; 10_000];
        let source = Arc::new(WaveformData::from_samples(&samples, 1, 1000, 10).unwrap());
        let (view, warning) =
            WaveformView::zoomview(source, 200, 10, &ViewerConfig::default()).unwrap();
        assert!(warning.is_none());
        view
    }

    fn overview() -> WaveformView {
        let samples = vec![0.5f32; 10_000];
        let source = Arc::new(WaveformData::from_samples(&samples, 1, 1000, 10).unwrap());
        WaveformView::overview(source, 100, &ViewerConfig::default()).unwrap()
    }

    fn with_point(view: &mut WaveformView, time: f64) {
        with_points(view, vec![PointOptions::at(time).editable(true)]);
    }

    fn with_points(view: &mut WaveformView, options: Vec<PointOptions>) {
        let mut points = Points::new(Rgba::rgb(1.0, 0.0, 0.0));
        points.add(options).unwrap();
        let all: Vec<CuePoint> = points.all().to_vec();
        view.refresh_layers(&all, &[]);
    }

    #[test]
    fn test_zoomview_click_seeks() {
        let view = zoomview();
        let mut gesture = Gesture::default();

        assert_eq!(handle_pointer(&view, &mut gesture, Pointer::Press { x: 50.0 }), None);
        assert_eq!(handle_pointer(&view, &mut gesture, Pointer::Move { x: 51.0 }), None);
        let message = handle_pointer(&view, &mut gesture, Pointer::Release { x: Some(51.0) });
        assert_eq!(message, Some(WaveformMessage::Seek(0.51)));
        assert_eq!(gesture, Gesture::Idle);
    }

    #[test]
    fn test_zoomview_drag_pans() {
        let view = zoomview();
        let mut gesture = Gesture::default();

        handle_pointer(&view, &mut gesture, Pointer::Press { x: 100.0 });
        assert_eq!(
            handle_pointer(&view, &mut gesture, Pointer::Move { x: 80.0 }),
            Some(WaveformMessage::Scroll(20.0))
        );
        assert_eq!(
            handle_pointer(&view, &mut gesture, Pointer::Move { x: 90.0 }),
            Some(WaveformMessage::Scroll(-10.0))
        );
        assert_eq!(
            handle_pointer(&view, &mut gesture, Pointer::Release { x: Some(90.0) }),
            None
        );
    }

    #[test]
    fn test_press_on_marker_drags() {
        let mut view = zoomview();
        with_point(&mut view, 1.0);
        let mut gesture = Gesture::default();

        assert_eq!(
            handle_pointer(&view, &mut gesture, Pointer::Press { x: 101.0 }),
            Some(WaveformMessage::DragStart { x: 101.0 })
        );
        assert_eq!(
            handle_pointer(&view, &mut gesture, Pointer::Move { x: 140.0 }),
            Some(WaveformMessage::DragMove { x: 140.0 })
        );
        // Release outside the canvas still ends the drag
        assert_eq!(
            handle_pointer(&view, &mut gesture, Pointer::Release { x: None }),
            Some(WaveformMessage::DragEnd)
        );
    }

    #[test]
    fn test_press_on_fixed_marker_falls_through() {
        let mut view = zoomview();
        with_points(&mut view, vec![PointOptions::at(1.0)]);
        let mut gesture = Gesture::default();

        // Click on the fixed marker seeks instead of dragging
        assert_eq!(handle_pointer(&view, &mut gesture, Pointer::Press { x: 101.0 }), None);
        assert!(matches!(gesture, Gesture::Pan { .. }));
        assert_eq!(
            handle_pointer(&view, &mut gesture, Pointer::Release { x: Some(101.0) }),
            Some(WaveformMessage::Seek(1.01))
        );

        let mut overview = overview();
        with_points(&mut overview, vec![PointOptions::at(5.0)]);
        let mut gesture = Gesture::default();
        assert_eq!(
            handle_pointer(&overview, &mut gesture, Pointer::Press { x: 50.0 }),
            Some(WaveformMessage::Seek(5.0))
        );
        assert_eq!(gesture, Gesture::Seeking);
    }

    #[test]
    fn test_fixed_marker_does_not_hide_editable_one() {
        let mut view = zoomview();
        with_points(
            &mut view,
            vec![PointOptions::at(1.0), PointOptions::at(1.02).editable(true)],
        );
        let mut gesture = Gesture::default();
        assert_eq!(
            handle_pointer(&view, &mut gesture, Pointer::Press { x: 101.0 }),
            Some(WaveformMessage::DragStart { x: 101.0 })
        );
    }

    #[test]
    fn test_labels_follow_markers() {
        let mut view = zoomview();
        let mut points = Points::new(Rgba::rgb(1.0, 0.0, 0.0));
        points
            .add(vec![PointOptions::at(1.0).label("drop"), PointOptions::at(1.5)])
            .unwrap();
        let mut segments = Segments::new(Rgba::rgb(0.0, 0.0, 1.0));
        segments
            .add(vec![SegmentOptions::range(0.5, 1.5).label("verse")])
            .unwrap();
        view.refresh_layers(points.all(), segments.all());

        let labels = marker_labels(&view, ZOOMVIEW_HEIGHT);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].text, "drop");
        assert_eq!(labels[0].x, 100.0 + FLAG_HEIGHT / 2.0 + LABEL_PADDING);
        assert_eq!(labels[0].color, Color::from_rgb(1.0, 0.0, 0.0));
        assert_eq!(labels[1].text, "verse");
        assert_eq!(labels[1].x, 50.0 + LABEL_PADDING);
        assert_eq!(labels[1].y, ZOOMVIEW_HEIGHT - LABEL_PADDING);

        // Scrolled out of view, no labels remain
        view.set_start_time(5.0).unwrap();
        view.refresh_layers(points.all(), segments.all());
        assert!(marker_labels(&view, ZOOMVIEW_HEIGHT).is_empty());
    }

    #[test]
    fn test_overview_press_and_move_seek() {
        let view = overview();
        let mut gesture = Gesture::default();

        // 100px for 10 seconds
        assert_eq!(
            handle_pointer(&view, &mut gesture, Pointer::Press { x: 50.0 }),
            Some(WaveformMessage::Seek(5.0))
        );
        assert_eq!(
            handle_pointer(&view, &mut gesture, Pointer::Move { x: 70.0 }),
            Some(WaveformMessage::Seek(7.0))
        );
        assert_eq!(
            handle_pointer(&view, &mut gesture, Pointer::Release { x: Some(70.0) }),
            None
        );
    }

    #[test]
    fn test_wheel_scrolls_zoomview_only() {
        let mut gesture = Gesture::default();
        assert_eq!(
            handle_pointer(&zoomview(), &mut gesture, Pointer::Wheel { pixels: 40.0 }),
            Some(WaveformMessage::Scroll(40.0))
        );
        assert_eq!(
            handle_pointer(&overview(), &mut gesture, Pointer::Wheel { pixels: 40.0 }),
            None
        );
    }

    #[test]
    fn test_wheel_pixels() {
        assert_eq!(wheel_pixels(mouse::ScrollDelta::Lines { x: 0.0, y: -1.0 }), 40.0);
        assert_eq!(wheel_pixels(mouse::ScrollDelta::Pixels { x: 15.0, y: 2.0 }), 15.0);
    }
}
