//! Zero-mean normalized cross-correlation (NCC) for template matching.
//!
//! Scores are in `[-1, 1]`; 1 means the patch is an affine brightness
//! transform of the template. Flat patches carry no structure and score 0.

use std::ops::RangeInclusive;

use ndarray::{s, Array2, ArrayView2, Zip};

use crate::shared::constants::FLAT_PATCH_EPSILON;

/// Template with its mean removed and its norm precomputed.
#[derive(Clone, Debug)]
pub struct ZeroMeanTemplate {
    centered: Array2<f32>,
    norm: f32,
}

impl ZeroMeanTemplate {
    pub fn new(pixels: ArrayView2<'_, f32>) -> Self {
        let mean = pixels.mean().unwrap_or(0.0);
        let centered = pixels.mapv(|v| v - mean);
        let norm = centered.iter().map(|v| v * v).sum::<f32>().sqrt();
        Self { centered, norm }
    }

    /// `(height, width)`.
    pub fn dim(&self) -> (usize, usize) {
        self.centered.dim()
    }

    pub fn is_flat(&self) -> bool {
        is_flat(self.norm, self.centered.len())
    }

    /// NCC between this template and a patch of the same shape.
    pub fn score(&self, patch: ArrayView2<'_, f32>) -> f32 {
        debug_assert_eq!(patch.dim(), self.centered.dim());
        if self.is_flat() {
            return 0.0;
        }

        let n = patch.len() as f32;
        let mut sum = 0.0f32;
        let mut sum_sq = 0.0f32;
        let mut cross = 0.0f32;
        // The template is zero-mean, so the patch mean drops out of `cross`.
        Zip::from(&patch).and(&self.centered).for_each(|&p, &c| {
            sum += p;
            sum_sq += p * p;
            cross += p * c;
        });

        let patch_norm_sq = (sum_sq - sum * sum / n).max(0.0);
        if is_flat(patch_norm_sq.sqrt(), patch.len()) {
            return 0.0;
        }
        (cross / (patch_norm_sq.sqrt() * self.norm)).clamp(-1.0, 1.0)
    }
}

fn is_flat(norm: f32, len: usize) -> bool {
    norm * norm <= FLAT_PATCH_EPSILON * len as f32
}

/// Best-scoring top-left position of `template` inside `image`.
///
/// Candidates are every `(x, y)` in the given ranges; callers keep the ranges
/// inside the image. Ties go to the candidate nearest `origin`.
pub fn best_match(
    image: &Array2<f32>,
    template: &ZeroMeanTemplate,
    xs: RangeInclusive<usize>,
    ys: RangeInclusive<usize>,
    origin: (usize, usize),
) -> Option<(usize, usize, f32)> {
    let (th, tw) = template.dim();
    let (ih, iw) = image.dim();
    let mut best: Option<(usize, usize, f32, usize)> = None;

    for y in ys {
        if y + th > ih {
            break;
        }
        for x in xs.clone() {
            if x + tw > iw {
                break;
            }
            let score = template.score(image.slice(s![y..y + th, x..x + tw]));
            let dist = x.abs_diff(origin.0).pow(2) + y.abs_diff(origin.1).pow(2);
            let better = match best {
                None => true,
                Some((_, _, s, d)) => score > s || (score == s && dist < d),
            };
            if better {
                best = Some((x, y, score, dist));
            }
        }
    }
    best.map(|(x, y, score, _)| (x, y, score))
}
