//! Sampled height field describing the destructible ground.

use std::f32::consts::PI;

use glam::Vec2;
use tanx_core::BEDROCK_ELEVATION;

/// Largest rise, in elevation per cell, the field keeps around an edit.
pub const MAX_SLOPE: f32 = 1.5;

const SMOOTHING_KERNEL: [f32; 5] = [0.1, 0.2, 0.4, 0.2, 0.1];
const CRATER_DEPTH_RATIO: f32 = 0.7;
const CRATER_SMOOTHING_REACH: f32 = 1.5;
const CRATER_SMOOTHING_PASSES: usize = 2;

/// Surface elevations sampled `detail` times per cell across the world width.
///
/// Sample `i` sits at `x = i / detail`, so the field holds
/// `width * detail + 1` samples covering both world edges. Heights between
/// samples are linearly interpolated.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainField {
    width: u32,
    detail: u32,
    samples: Vec<f32>,
}

impl TerrainField {
    pub(crate) fn flat(width: u32, detail: u32, elevation: f32) -> Self {
        let detail = detail.max(1);
        let len = width as usize * detail as usize + 1;
        Self {
            width,
            detail,
            samples: vec![elevation; len],
        }
    }

    /// Number of cells spanned by the field.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Samples taken per cell.
    #[must_use]
    pub const fn detail(&self) -> u32 {
        self.detail
    }

    /// Raw elevation samples from left to right.
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Terrain elevation at `x`, clamping positions outside the field to its edges.
    #[must_use]
    pub fn height_at(&self, x: f32) -> f32 {
        let last = self.samples.len() - 1;
        if last == 0 {
            return self.samples[0];
        }
        let x = if x.is_nan() { 0.0 } else { x };
        let position = x.clamp(0.0, self.width as f32) * self.detail as f32;
        let index = (position.floor() as usize).min(last - 1);
        let t = position - index as f32;
        let left = self.samples[index];
        let right = self.samples[index + 1];
        left + (right - left) * t
    }

    /// Lowers the surface inside a circle using a cosine falloff.
    ///
    /// The carve reaches `0.7 * radius` below `center.y` at the center and
    /// fades to nothing at the rim. The surrounding window is then smoothed and
    /// slope-limited, and no sample ever ends up higher than it was before the
    /// call. Returns whether any sample changed.
    pub fn carve_circle(&mut self, center: Vec2, radius: f32) -> bool {
        if !(radius > 0.0) || !center.is_finite() {
            return false;
        }
        if center.x + radius < 0.0 || center.x - radius > self.width as f32 {
            return false;
        }

        let reach = radius * CRATER_SMOOTHING_REACH;
        let (lo, hi) = self.sample_range(center.x - reach, center.x + reach);
        let before = self.samples.clone();
        let depth = radius * CRATER_DEPTH_RATIO;
        let mut carved = false;

        for index in lo..=hi {
            let distance = (self.sample_x(index) - center.x).abs();
            if distance >= radius {
                continue;
            }
            let profile = (distance / radius * PI).cos() * 0.5 + 0.5;
            let target = center.y - profile * depth;
            let sample = &mut self.samples[index];
            if target < *sample {
                *sample = target;
                carved = true;
            }
        }
        if !carved {
            return false;
        }

        self.smooth_range(lo, hi, CRATER_SMOOTHING_PASSES);
        for index in lo..=hi {
            let sample = &mut self.samples[index];
            *sample = sample.min(before[index]).max(BEDROCK_ELEVATION);
        }
        self.limit_slope(lo, hi);

        self.samples != before
    }

    /// Sets every sample within `[left, right]` to `elevation`.
    pub(crate) fn level_range(&mut self, left: f32, right: f32, elevation: f32) {
        let detail = self.detail as f32;
        let last = self.samples.len() - 1;
        let lo = ((left.max(0.0) * detail).ceil() as usize).min(last);
        let hi = ((right.max(0.0) * detail).floor() as usize).min(last);
        for sample in self.samples.iter_mut().take(hi + 1).skip(lo) {
            *sample = elevation;
        }
    }

    /// Lowest elevation anywhere within `[left, right]`.
    pub(crate) fn lowest_between(&self, left: f32, right: f32) -> f32 {
        let detail = self.detail as f32;
        let last = self.samples.len() - 1;
        let lo = ((left.max(0.0) * detail).ceil() as usize).min(last);
        let hi = ((right.max(0.0) * detail).floor() as usize).min(last);
        let edges = self.height_at(left).min(self.height_at(right));
        self.samples
            .iter()
            .take(hi + 1)
            .skip(lo)
            .fold(edges, |lowest, &sample| lowest.min(sample))
    }

    /// Runs the smoothing kernel over the whole field.
    pub(crate) fn smooth(&mut self, passes: usize) {
        let last = self.samples.len() - 1;
        self.smooth_range(0, last, passes);
    }

    /// Caps the slope between every pair of neighbouring samples.
    pub(crate) fn limit_slope_everywhere(&mut self) {
        let last = self.samples.len() - 1;
        self.limit_slope(0, last);
    }

    fn sample_x(&self, index: usize) -> f32 {
        index as f32 / self.detail as f32
    }

    fn sample_range(&self, from: f32, to: f32) -> (usize, usize) {
        let detail = self.detail as f32;
        let last = self.samples.len() - 1;
        let lo = ((from.max(0.0) * detail).floor() as usize).min(last);
        let hi = ((to.max(0.0) * detail).ceil() as usize).min(last);
        (lo, hi.max(lo))
    }

    fn smooth_range(&mut self, lo: usize, hi: usize, passes: usize) {
        let last = self.samples.len() - 1;
        for _ in 0..passes {
            let source = self.samples.clone();
            for index in lo..=hi {
                let mut total = 0.0;
                for (offset, weight) in SMOOTHING_KERNEL.iter().enumerate() {
                    let neighbour = (index + offset).saturating_sub(2).min(last);
                    total += source[neighbour] * weight;
                }
                self.samples[index] = total;
            }
        }
    }

    /// Lowers samples until no neighbour rises by more than [`MAX_SLOPE`] per cell.
    ///
    /// Both passes start inside `[lo, hi]` and keep walking outward only while
    /// they still find violations, so untouched terrain is left alone.
    fn limit_slope(&mut self, lo: usize, hi: usize) {
        let step = MAX_SLOPE / self.detail as f32;
        let last = self.samples.len() - 1;

        let mut index = lo.max(1);
        while index <= last {
            let cap = self.samples[index - 1] + step;
            if self.samples[index] > cap {
                self.samples[index] = cap;
            } else if index > hi {
                break;
            }
            index += 1;
        }

        let mut index = hi.min(last.saturating_sub(1));
        loop {
            let cap = self.samples[index + 1] + step;
            if self.samples[index] > cap {
                self.samples[index] = cap;
            } else if index < lo {
                break;
            }
            if index == 0 {
                break;
            }
            index -= 1;
        }
    }
}
