//! Subscriptions feeding the viewer from outside the UI thread
//!
//! - `frame_ticks`: display refresh ticks for zoom animation and cue scans
//! - `build_results`: finished waveform builds from a `WaveformBuilder`
//!
//! ```ignore
//! fn subscription(&self) -> Subscription<Message> {
//!     let mut subs = vec![build_results(&self.builder).map(Message::WaveformBuilt)];
//!     if self.viewer.wants_frame() {
//!         subs.push(frame_ticks().map(|_| Message::Frame));
//!     }
//!     Subscription::batch(subs)
//! }
//! ```

use std::any::TypeId;
use std::hash::Hash;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use iced::advanced::subscription::{self, EventStream, Hasher, Recipe};
use iced::futures::stream::{self, BoxStream};
use iced::{time, Subscription};
use tokio::time::{Interval, MissedTickBehavior};
use wavecue_core::waveform::{BuildResult, WaveformBuilder};

/// Interval between display ticks (~60Hz)
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// How often the builder's result channel is checked while it is empty
const BUILD_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Display refresh ticks
///
/// Only subscribe while `Viewer::wants_frame` is true so an idle viewer
/// costs nothing.
pub fn frame_ticks() -> Subscription<Instant> {
    time::every(FRAME_INTERVAL)
}

/// Finished builds from a background `WaveformBuilder`
///
/// One subscription per builder. The stream ends once the builder is
/// dropped.
pub fn build_results(builder: &WaveformBuilder) -> Subscription<BuildResult> {
    subscription::from_recipe(BuildResults {
        results: builder.result_receiver(),
    })
}

/// What one look at the result channel found
#[derive(Debug)]
enum Polled {
    Ready(BuildResult),
    Pending,
    Closed,
}

fn poll_results(results: &Mutex<Receiver<BuildResult>>) -> Polled {
    let Ok(receiver) = results.lock() else {
        log::warn!("Build result channel lock poisoned, ending subscription");
        return Polled::Closed;
    };
    match receiver.try_recv() {
        Ok(result) => Polled::Ready(result),
        Err(TryRecvError::Empty) => Polled::Pending,
        Err(TryRecvError::Disconnected) => {
            log::debug!("Waveform builder gone, ending build result subscription");
            Polled::Closed
        }
    }
}

struct BuildResults {
    results: Arc<Mutex<Receiver<BuildResult>>>,
}

impl Recipe for BuildResults {
    type Output = BuildResult;

    fn hash(&self, state: &mut Hasher) {
        TypeId::of::<Self>().hash(state);
        (Arc::as_ptr(&self.results) as usize).hash(state);
    }

    fn stream(self: Box<Self>, _input: EventStream) -> BoxStream<'static, BuildResult> {
        // The interval is created on first use, inside the executor
        Box::pin(stream::unfold(
            (self.results, None::<Interval>),
            |(results, mut poll)| async move {
                loop {
                    match poll_results(&results) {
                        Polled::Ready(result) => {
                            log::debug!("Build {} delivered after {:?}", result.id, result.elapsed);
                            return Some((result, (results, poll)));
                        }
                        Polled::Pending => {
                            poll.get_or_insert_with(|| {
                                let mut interval = tokio::time::interval(BUILD_POLL_INTERVAL);
                                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                                interval
                            })
                            .tick()
                            .await;
                        }
                        Polled::Closed => return None,
                    }
                }
            },
        ))
    }
}
