//! Applying canvas messages to a `Viewer`

use wavecue_core::view::{ScrollDelta, ViewKind};
use wavecue_core::{Viewer, ViewerError, ViewerResult};

use crate::canvas::WaveformMessage;

/// Apply a message published by the canvas of view `kind`
///
/// A drag that started away from any marker (the marker moved between draw
/// and press) is ignored, as are moves and ends for it.
pub fn apply_message(viewer: &mut Viewer, kind: ViewKind, message: WaveformMessage) -> ViewerResult<()> {
    match message {
        WaveformMessage::Seek(time) => viewer.seek(time),
        WaveformMessage::DragStart { x } => {
            if viewer.begin_drag(kind, x)?.is_none() {
                log::debug!("No marker under x={:.1} in {}", x, kind.name());
            }
            Ok(())
        }
        WaveformMessage::DragMove { x } => ignore_missing_drag(viewer.drag_to(x)),
        WaveformMessage::DragEnd => ignore_missing_drag(viewer.end_drag()),
        WaveformMessage::Scroll(pixels) => viewer.scroll_waveform(ScrollDelta::pixels(pixels)),
    }
}

fn ignore_missing_drag(result: ViewerResult<()>) -> ViewerResult<()> {
    match result {
        Err(ViewerError::NoDragSession) => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;
    use wavecue_core::annotations::PointOptions;
    use wavecue_core::config::ViewerConfig;
    use wavecue_core::waveform::WaveformData;
    use wavecue_core::{MediaPlayer, ViewWidths, ViewerEvent};

    #[derive(Clone, Default)]
    struct StubPlayer {
        sought: Rc<Cell<Option<f64>>>,
    }

    impl MediaPlayer for StubPlayer {
        fn current_time(&self) -> f64 {
            0.0
        }

        fn duration(&self) -> f64 {
            10.0
        }

        fn is_playing(&self) -> bool {
            false
        }

        fn is_seeking(&self) -> bool {
            false
        }

        fn seek(&mut self, time: f64) {
            self.sought.set(Some(time));
        }
    }

    fn viewer() -> (Viewer, StubPlayer) {
        let samples = vec![0.25f32; 10_000];
        let source = Arc::new(WaveformData::from_samples(&samples, 1, 1000, 10).unwrap());
        let mut config = ViewerConfig::default();
        config.zoomview.zoom_levels = vec![10];
        config.zoomview.animation.enabled = false;
        let player = StubPlayer::default();
        let viewer = Viewer::new(
            source,
            Box::new(player.clone()),
            config,
            ViewWidths {
                overview: 100,
                zoomview: 200,
            },
        )
        .unwrap();
        (viewer, player)
    }

    #[test]
    fn test_seek_clamps_to_duration() {
        let (mut viewer, player) = viewer();
        apply_message(&mut viewer, ViewKind::Overview, WaveformMessage::Seek(12.0)).unwrap();
        assert_eq!(player.sought.get(), Some(10.0));
    }

    #[test]
    fn test_scroll_moves_zoomview() {
        let (mut viewer, _player) = viewer();
        apply_message(&mut viewer, ViewKind::Zoomview, WaveformMessage::Scroll(150.0)).unwrap();
        assert_eq!(viewer.view(ViewKind::Zoomview).frame_offset(), 150);
    }

    #[test]
    fn test_drag_sequence() {
        let (mut viewer, _player) = viewer();
        viewer
            .add_point(PointOptions::at(1.0).id("p").editable(true))
            .unwrap();
        viewer.drain_events();

        for message in [
            WaveformMessage::DragStart { x: 100.0 },
            WaveformMessage::DragMove { x: 130.0 },
            WaveformMessage::DragEnd,
        ] {
            apply_message(&mut viewer, ViewKind::Zoomview, message).unwrap();
        }
        assert!((viewer.point("p").unwrap().time() - 1.3).abs() < 1e-9);
        assert!(matches!(
            viewer.drain_events().last(),
            Some(ViewerEvent::PointDragEnd { .. })
        ));
    }

    #[test]
    fn test_stray_drag_messages_are_ignored() {
        let (mut viewer, _player) = viewer();
        apply_message(&mut viewer, ViewKind::Zoomview, WaveformMessage::DragStart { x: 10.0 }).unwrap();
        apply_message(&mut viewer, ViewKind::Zoomview, WaveformMessage::DragMove { x: 20.0 }).unwrap();
        apply_message(&mut viewer, ViewKind::Zoomview, WaveformMessage::DragEnd).unwrap();
        assert!(viewer.drain_events().is_empty());
    }
}
