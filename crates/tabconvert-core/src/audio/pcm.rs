//! Decoded PCM buffers and float to 16-bit sample conversion.

use crate::ConvertError;

/// Mono or stereo only.
pub const MAX_CHANNELS: usize = 2;

/// A decoded audio signal.
///
/// Samples are stored per channel (planar) as floats nominally in
/// `[-1.0, 1.0]`. All channels have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmAudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl PcmAudioBuffer {
    /// Create a buffer from planar channel data.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::InvalidAudio` if the sample rate is zero, there
    /// are not one or two channels, or the channels differ in length.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, ConvertError> {
        if sample_rate == 0 {
            return Err(ConvertError::InvalidAudio("sample rate must be non-zero".to_string()));
        }
        if channels.is_empty() || channels.len() > MAX_CHANNELS {
            return Err(ConvertError::InvalidAudio(format!(
                "expected 1 or 2 channels, got {}",
                channels.len()
            )));
        }
        let frames = channels[0].len();
        if let Some(bad) = channels.iter().find(|c| c.len() != frames) {
            return Err(ConvertError::InvalidAudio(format!(
                "channel lengths differ ({} vs {})",
                frames,
                bad.len()
            )));
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Result<Self, ConvertError> {
        Self::new(sample_rate, vec![samples])
    }

    pub fn stereo(sample_rate: u32, left: Vec<f32>, right: Vec<f32>) -> Result<Self, ConvertError> {
        Self::new(sample_rate, vec![left, right])
    }

    /// Build a buffer from interleaved samples, keeping at most the first
    /// two channels.
    pub fn from_interleaved(
        sample_rate: u32,
        channel_count: usize,
        samples: &[f32],
    ) -> Result<Self, ConvertError> {
        if channel_count == 0 {
            return Err(ConvertError::InvalidAudio("expected at least one channel".to_string()));
        }
        if samples.len() % channel_count != 0 {
            return Err(ConvertError::InvalidAudio(format!(
                "{} interleaved samples do not divide into {} channels",
                samples.len(),
                channel_count
            )));
        }

        let kept = channel_count.min(MAX_CHANNELS);
        let channels = (0..kept)
            .map(|ch| {
                samples
                    .iter()
                    .skip(ch)
                    .step_by(channel_count)
                    .copied()
                    .collect()
            })
            .collect();
        Self::new(sample_rate, channels)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// 1 for mono, 2 for stereo.
    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Samples of one channel. Panics if `index` is out of range.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }
}

/// Convert one float sample to signed 16-bit.
///
/// The sample is clamped to `[-1, 1]`, then negative values are scaled by
/// 32768 and the rest by 32767, truncating toward zero. NaN becomes 0.
#[inline]
pub fn sample_to_i16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Convert a run of float samples to signed 16-bit.
pub fn samples_to_i16(samples: &[f32]) -> Vec<i16> {
    samples.iter().map(|&s| sample_to_i16(s)).collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: conversion is monotonic.
        #[test]
        fn prop_monotonic(a in -2.0f32..2.0, b in -2.0f32..2.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(sample_to_i16(lo) <= sample_to_i16(hi));
        }

        /// Property: sign is preserved (zero may absorb tiny values).
        #[test]
        fn prop_sign_preserved(s in -1.0f32..=1.0) {
            let v = sample_to_i16(s);
            if s > 0.0 {
                prop_assert!(v >= 0);
            } else {
                prop_assert!(v <= 0);
            }
        }
    }
}
