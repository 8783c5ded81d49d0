//! Time-domain runner for a designed recurrence.

use crate::design::FilterDesign;

/// Direct Form I evaluation of a [`FilterDesign`].
///
/// ```text
/// y[n] = Σ xc[k]·x[n-nz+k] + Σ yc[k]·y[n-np+k]
/// ```
///
/// Inputs are divided by the magnitude of the design's reference gain, so a
/// low-pass settles to one for a unit step.
#[derive(Debug, Clone)]
pub struct Recurrence {
    x_coeffs: Vec<f64>,
    y_coeffs: Vec<f64>,
    input_scale: f64,

    /// Input delay line, oldest first; last slot is x[n]
    xv: Vec<f64>,
    /// Output delay line, oldest first
    yv: Vec<f64>,
}

impl Recurrence {
    /// Runner with cleared delay lines.
    pub fn new(design: &FilterDesign) -> Self {
        let g = design.reference_gain().norm();
        let input_scale = if g > 0.0 && g.is_finite() { 1.0 / g } else { 1.0 };
        Self {
            x_coeffs: design.x_coeffs.clone(),
            y_coeffs: design.y_coeffs.clone(),
            input_scale,
            xv: vec![0.0; design.x_coeffs.len()],
            yv: vec![0.0; design.y_coeffs.len()],
        }
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        if !self.xv.is_empty() {
            self.xv.rotate_left(1);
            let last = self.xv.len() - 1;
            self.xv[last] = input * self.input_scale;
        }

        let feed_forward: f64 = self.x_coeffs.iter().zip(&self.xv).map(|(c, x)| c * x).sum();
        let feedback: f64 = self.y_coeffs.iter().zip(&self.yv).map(|(c, y)| c * y).sum();
        let output = feed_forward + feedback;

        if !self.yv.is_empty() {
            self.yv.rotate_left(1);
            let last = self.yv.len() - 1;
            self.yv[last] = output;
        }
        output
    }

    /// Filter a block of `f32` samples in place.
    pub fn process_block(&mut self, samples: &mut [f32]) {
        for s in samples.iter_mut() {
            *s = self.process(f64::from(*s)) as f32;
        }
    }

    /// Clear the delay lines.
    pub fn reset(&mut self) {
        self.xv.fill(0.0);
        self.yv.fill(0.0);
    }
}
