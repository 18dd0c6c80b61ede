//! Min/max column store for waveform display
//!
//! A `WaveformData` holds one min/max pair per pixel column per channel at a
//! fixed resolution (`scale`, samples per pixel). It is immutable once built:
//! resampling always produces a new store, so the full-resolution source can
//! be shared between views behind an `Arc`.

use crate::error::{ViewerError, ViewerResult};
use crate::timescale::TimeScale;

/// Min/max pair for one pixel column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub min: f32,
    pub max: f32,
}

impl Peak {
    pub const SILENT: Peak = Peak { min: 0.0, max: 0.0 };
}

/// Per-channel column data (parallel min/max arrays)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelData {
    pub min: Vec<f32>,
    pub max: Vec<f32>,
}

impl ChannelData {
    fn with_capacity(n: usize) -> Self {
        Self {
            min: Vec::with_capacity(n),
            max: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.min.len()
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_empty()
    }

    pub fn peak(&self, index: usize) -> Option<Peak> {
        Some(Peak {
            min: *self.min.get(index)?,
            max: *self.max.get(index)?,
        })
    }
}

/// Target resolution for `WaveformData::resample`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resample {
    /// Explicit samples per pixel
    Scale(u32),
    /// Fit the whole track into this many pixels
    Width(u32),
}

/// Immutable waveform column store
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformData {
    sample_rate: u32,
    scale: u32,
    channels: Vec<ChannelData>,
}

impl WaveformData {
    /// Build from precomputed columns (e.g. data supplied by a host decoder)
    pub fn from_columns(
        sample_rate: u32,
        scale: u32,
        channels: Vec<ChannelData>,
    ) -> ViewerResult<Self> {
        if sample_rate == 0 || scale == 0 {
            return Err(ViewerError::SampleStore(format!(
                "invalid sample rate {} or scale {}",
                sample_rate, scale
            )));
        }
        if channels.is_empty() {
            return Err(ViewerError::SampleStore("no channels".to_string()));
        }
        let len = channels[0].len();
        if channels.iter().any(|c| c.min.len() != len || c.max.len() != len) {
            return Err(ViewerError::SampleStore(
                "channel column counts differ".to_string(),
            ));
        }
        Ok(Self {
            sample_rate,
            scale,
            channels,
        })
    }

    /// Generate peaks from interleaved PCM samples
    ///
    /// Downsamples to one min/max pair per `scale` frames. The last column may
    /// cover fewer frames than the others.
    pub fn from_samples(
        samples: &[f32],
        channel_count: usize,
        sample_rate: u32,
        scale: u32,
    ) -> ViewerResult<Self> {
        if channel_count == 0 || scale == 0 || sample_rate == 0 {
            return Err(ViewerError::SampleStore(format!(
                "invalid layout: {} channels, scale {}, rate {}",
                channel_count, scale, sample_rate
            )));
        }
        let frames = samples.len() / channel_count;
        if frames == 0 {
            return Err(ViewerError::SampleStore("no audio frames".to_string()));
        }

        let scale_frames = scale as usize;
        let columns = frames.div_ceil(scale_frames);
        let mut channels: Vec<ChannelData> = (0..channel_count)
            .map(|_| ChannelData::with_capacity(columns))
            .collect();

        for col in 0..columns {
            let start = col * scale_frames;
            let end = ((col + 1) * scale_frames).min(frames);
            for (ch, data) in channels.iter_mut().enumerate() {
                let mut min = f32::INFINITY;
                let mut max = f32::NEG_INFINITY;
                for frame in start..end {
                    let sample = samples[frame * channel_count + ch];
                    min = min.min(sample);
                    max = max.max(sample);
                }
                data.min.push(min);
                data.max.push(max);
            }
        }

        log::debug!(
            "Generated waveform data: {} frames -> {} columns x {} channels at scale {}",
            frames,
            columns,
            channel_count,
            scale
        );

        Ok(Self {
            sample_rate,
            scale,
            channels,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Samples per pixel
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Number of pixel columns
    pub fn length(&self) -> usize {
        self.channels.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, index: usize) -> Option<&ChannelData> {
        self.channels.get(index)
    }

    /// Min/max at a column, `None` past the end
    pub fn at(&self, channel: usize, index: usize) -> Option<Peak> {
        self.channels.get(channel)?.peak(index)
    }

    /// Track duration in seconds
    pub fn duration(&self) -> f64 {
        self.length() as f64 * self.scale as f64 / self.sample_rate as f64
    }

    pub fn timescale(&self) -> TimeScale {
        TimeScale::new(self.sample_rate, self.scale)
    }

    pub fn seconds_per_pixel(&self) -> f64 {
        self.timescale().seconds_per_pixel()
    }

    /// Time at the left edge of column `pixel`
    pub fn time_of(&self, pixel: usize) -> f64 {
        self.timescale().pixels_to_time(pixel as f64)
    }

    /// Column containing `time`
    pub fn pixel_of(&self, time: f64) -> i64 {
        self.timescale().time_to_pixels(time)
    }

    /// Resolve a resample target to a concrete scale
    ///
    /// Width targets round up so the result never exceeds the requested width.
    pub fn scale_for(&self, target: Resample) -> u32 {
        match target {
            Resample::Scale(scale) => scale,
            Resample::Width(width) => {
                let total = self.length() as u64 * self.scale as u64;
                let width = width.max(1) as u64;
                (total.div_ceil(width) as u32).max(self.scale)
            }
        }
    }

    /// Resample the full track to a coarser resolution
    ///
    /// Fails with `ResolutionUnavailable` when asked for detail finer than
    /// this store holds.
    pub fn resample(&self, target: Resample) -> ViewerResult<WaveformData> {
        let scale = self.scale_for(target);
        let length = self.output_length(scale)?;
        self.resample_range(scale, 0, length)
    }

    /// Resample only output columns `start_column..start_column + width`
    ///
    /// Columns past the end of the track are omitted, so the result may be
    /// narrower than `width`.
    pub fn resample_range(
        &self,
        scale: u32,
        start_column: usize,
        width: usize,
    ) -> ViewerResult<WaveformData> {
        let length = self.output_length(scale)?;
        let start = start_column.min(length);
        let end = start_column.saturating_add(width).min(length);

        if scale == self.scale {
            let channels = self
                .channels
                .iter()
                .map(|c| ChannelData {
                    min: c.min[start..end].to_vec(),
                    max: c.max[start..end].to_vec(),
                })
                .collect();
            return Ok(Self {
                sample_rate: self.sample_rate,
                scale,
                channels,
            });
        }

        let input_len = self.length();
        let in_scale = self.scale as u64;
        let out_scale = scale as u64;

        let channels = self
            .channels
            .iter()
            .map(|input| {
                let mut out = ChannelData::with_capacity(end - start);
                for col in start..end {
                    // Input columns overlapping output samples [col*out, (col+1)*out)
                    let first = (col as u64 * out_scale / in_scale) as usize;
                    let last = (((col as u64 + 1) * out_scale).div_ceil(in_scale) as usize)
                        .min(input_len);

                    let mut min = f32::INFINITY;
                    let mut max = f32::NEG_INFINITY;
                    for i in first..last {
                        min = min.min(input.min[i]);
                        max = max.max(input.max[i]);
                    }
                    if min == f32::INFINITY {
                        min = 0.0;
                        max = 0.0;
                    }
                    out.min.push(min);
                    out.max.push(max);
                }
                out
            })
            .collect();

        Ok(Self {
            sample_rate: self.sample_rate,
            scale,
            channels,
        })
    }

    /// Number of columns the whole track occupies at `scale`
    pub fn output_length(&self, scale: u32) -> ViewerResult<usize> {
        if scale < self.scale {
            return Err(ViewerError::ResolutionUnavailable {
                requested: scale,
                minimum: self.scale,
            });
        }
        let total = self.length() as u64 * self.scale as u64;
        Ok(total.div_ceil(scale as u64) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(frames: usize) -> Vec<f32> {
        (0..frames).map(|i| i as f32 / frames as f32).collect()
    }

    #[test]
    fn test_from_samples_columns() {
        let samples = ramp(1000);
        let data = WaveformData::from_samples(&samples, 1, 100, 10).unwrap();
        assert_eq!(data.length(), 100);
        assert_eq!(data.scale(), 10);
        assert!((data.duration() - 10.0).abs() < 1e-9);

        let first = data.at(0, 0).unwrap();
        assert_eq!(first.min, 0.0);
        assert!((first.max - 0.009).abs() < 1e-6);
        assert!(data.at(0, 100).is_none());
    }

    #[test]
    fn test_from_samples_interleaved_stereo() {
        // Left ramps up, right is constant negative
        let mut samples = Vec::new();
        for i in 0..20 {
            samples.push(i as f32);
            samples.push(-1.0);
        }
        let data = WaveformData::from_samples(&samples, 2, 100, 10).unwrap();
        assert_eq!(data.channel_count(), 2);
        assert_eq!(data.at(0, 1).unwrap(), Peak { min: 10.0, max: 19.0 });
        assert_eq!(data.at(1, 1).unwrap(), Peak { min: -1.0, max: -1.0 });
    }

    #[test]
    fn test_from_samples_rejects_empty() {
        assert!(WaveformData::from_samples(&[], 1, 44100, 256).is_err());
        assert!(WaveformData::from_samples(&[0.0; 10], 0, 44100, 256).is_err());
    }

    #[test]
    fn test_resample_combines_columns() {
        let data = WaveformData::from_samples(&ramp(1000), 1, 100, 10).unwrap();
        let coarse = data.resample(Resample::Scale(40)).unwrap();
        assert_eq!(coarse.length(), 25);
        // Column 0 covers input columns 0..4 = samples 0..40
        let peak = coarse.at(0, 0).unwrap();
        assert_eq!(peak.min, 0.0);
        assert!((peak.max - 0.039).abs() < 1e-6);
        assert!((coarse.duration() - data.duration()).abs() < 1e-9);
    }

    #[test]
    fn test_resample_finer_is_unavailable() {
        let data = WaveformData::from_samples(&ramp(1000), 1, 100, 10).unwrap();
        let err = data.resample(Resample::Scale(5)).unwrap_err();
        assert_eq!(
            err,
            ViewerError::ResolutionUnavailable {
                requested: 5,
                minimum: 10
            }
        );
    }

    #[test]
    fn test_resample_width_fits() {
        let data = WaveformData::from_samples(&ramp(1000), 1, 100, 10).unwrap();
        let fitted = data.resample(Resample::Width(30)).unwrap();
        assert!(fitted.length() <= 30);
        assert_eq!(fitted.scale(), 34);
    }

    #[test]
    fn test_resample_range_matches_full_resample() {
        let data = WaveformData::from_samples(&ramp(5000), 1, 100, 10).unwrap();
        let full = data.resample(Resample::Scale(30)).unwrap();
        let window = data.resample_range(30, 50, 20).unwrap();
        assert_eq!(window.length(), 20);
        for i in 0..20 {
            assert_eq!(window.at(0, i), full.at(0, 50 + i));
        }
    }

    #[test]
    fn test_resample_range_past_end_is_truncated() {
        let data = WaveformData::from_samples(&ramp(1000), 1, 100, 10).unwrap();
        let window = data.resample_range(10, 90, 50).unwrap();
        assert_eq!(window.length(), 10);
    }
}
