//! Background waveform data acquisition
//!
//! Generating columns from raw PCM can take tens of milliseconds for long
//! tracks. The `WaveformBuilder` runs that work on a dedicated thread so the
//! UI thread never blocks:
//!
//! 1. Host sends a `BuildRequest` with interleaved samples
//! 2. Builder thread runs `WaveformData::from_samples()`
//! 3. Host polls `try_recv()` (or bridges `result_receiver()` into its event
//!    loop) and hands the finished store to a `Viewer`
//!
//! Failures come back as `BuildResult { result: Err(..) }`; this is the only
//! path by which sample-store errors reach the viewer's host.
//!
//! ```ignore
//! let builder = WaveformBuilder::spawn()?;
//! builder.submit(BuildRequest { id: 0, samples, channels: 2, sample_rate: 44100, scale: 256 })?;
//!
//! // later, in the tick handler
//! while let Some(done) = builder.try_recv() {
//!     let data = done.result?;
//! }
//! ```

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::WaveformData;
use crate::error::{ViewerError, ViewerResult};

/// Request to build waveform data from PCM
pub struct BuildRequest {
    /// Caller-chosen identifier echoed in the result
    pub id: usize,
    /// Interleaved samples
    pub samples: Arc<Vec<f32>>,
    /// Number of interleaved channels
    pub channels: usize,
    pub sample_rate: u32,
    /// Samples per pixel of the generated store (the finest zoom available)
    pub scale: u32,
}

impl std::fmt::Debug for BuildRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildRequest")
            .field("id", &self.id)
            .field("samples", &format!("<{} samples>", self.samples.len()))
            .field("channels", &self.channels)
            .field("sample_rate", &self.sample_rate)
            .field("scale", &self.scale)
            .finish()
    }
}

/// Result of a build
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// Identifier matching the request
    pub id: usize,
    pub result: ViewerResult<Arc<WaveformData>>,
    /// Time spent generating
    pub elapsed: Duration,
}

/// Background thread generating `WaveformData`
pub struct WaveformBuilder {
    tx: Sender<BuildRequest>,
    rx: Arc<Mutex<Receiver<BuildResult>>>,
    _handle: JoinHandle<()>,
}

impl WaveformBuilder {
    /// Spawn the builder thread
    pub fn spawn() -> ViewerResult<Self> {
        let (request_tx, request_rx) = std::sync::mpsc::channel::<BuildRequest>();
        let (result_tx, result_rx) = std::sync::mpsc::channel::<BuildResult>();

        let handle = thread::Builder::new()
            .name("waveform-builder".to_string())
            .spawn(move || builder_thread(request_rx, result_tx))
            .map_err(|e| ViewerError::SampleStore(format!("failed to spawn builder: {}", e)))?;

        log::info!("WaveformBuilder background thread started");

        Ok(Self {
            tx: request_tx,
            rx: Arc::new(Mutex::new(result_rx)),
            _handle: handle,
        })
    }

    /// Queue a build (non-blocking)
    pub fn submit(&self, request: BuildRequest) -> ViewerResult<()> {
        self.tx
            .send(request)
            .map_err(|e| ViewerError::SampleStore(format!("builder thread disconnected: {}", e)))
    }

    /// Poll for a finished build (non-blocking)
    pub fn try_recv(&self) -> Option<BuildResult> {
        let rx = self.rx.lock().ok()?;
        match rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::error!("WaveformBuilder thread disconnected unexpectedly");
                None
            }
        }
    }

    /// Shared receiver, for bridging results into a UI subscription
    pub fn result_receiver(&self) -> Arc<Mutex<Receiver<BuildResult>>> {
        Arc::clone(&self.rx)
    }
}

fn builder_thread(rx: Receiver<BuildRequest>, tx: Sender<BuildResult>) {
    log::debug!("WaveformBuilder thread starting");

    while let Ok(request) = rx.recv() {
        let start = std::time::Instant::now();
        let result = WaveformData::from_samples(
            &request.samples,
            request.channels,
            request.sample_rate,
            request.scale,
        )
        .map(Arc::new);

        let elapsed = start.elapsed();
        match &result {
            Ok(data) => log::debug!(
                "Built waveform id={} in {:?} ({} columns)",
                request.id,
                elapsed,
                data.length()
            ),
            Err(e) => log::warn!("Waveform build id={} failed: {}", request.id, e),
        }

        if tx
            .send(BuildResult {
                id: request.id,
                result,
                elapsed,
            })
            .is_err()
        {
            break;
        }
    }

    log::debug!("WaveformBuilder thread shutting down");
}
