//! Seeded terrain generators for the classic and urban styles.

use std::f32::consts::PI;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tanx_core::TerrainSettings;

use crate::{
    structures::{FLOOR_HEIGHT, MAX_GENERATED_FLOORS},
    terrain::TerrainField,
};

/// Columns kept free of buildings at both world edges so tanks can spawn.
pub const SPAWN_MARGIN: i32 = 6;

/// Vertical space kept clear above the tallest generated building.
const URBAN_HEADROOM: f32 = 4.0;

/// Noise layers as (spacing in cells, share of the elevation range).
const NOISE_LAYERS: [(u32, f32); 3] = [(18, 0.55), (9, 0.3), (4, 0.15)];

/// City block laid out by the urban generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Lot {
    pub(crate) left: i32,
    pub(crate) width: u32,
    pub(crate) level: f32,
    pub(crate) floors: u32,
}

/// Rolling hills built from layered value noise.
pub(crate) fn classic(settings: &TerrainSettings, rng: &mut ChaCha8Rng) -> TerrainField {
    let detail = settings.effective_detail();
    let mut field = TerrainField::flat(settings.width, detail, settings.min_height);
    let len = field.samples().len();
    let span = settings.max_height - settings.min_height;

    let mut noise = vec![0.0_f32; len];
    for (spacing, strength) in NOISE_LAYERS {
        let layer = value_noise(rng, len, (spacing * detail) as usize);
        for (total, value) in noise.iter_mut().zip(layer) {
            *total += value * strength;
        }
    }

    for (sample, value) in field.samples_mut().iter_mut().zip(&noise) {
        let elevation = settings.min_height + value * span;
        *sample = elevation.clamp(settings.min_height, settings.max_height);
    }
    smooth_clamped(&mut field, settings);
    field.limit_slope_everywhere();
    field
}

/// Stepped city-block platforms separated by streets.
///
/// Returns the leveled terrain together with every lot. Lots whose platform
/// leaves too little headroom carry zero floors.
pub(crate) fn urban(
    settings: &TerrainSettings,
    rng: &mut ChaCha8Rng,
) -> (TerrainField, Vec<Lot>) {
    let detail = settings.effective_detail();
    let min = settings.min_height;
    let max = settings.max_height;
    let start_level = ((min + max) * 0.5).round().clamp(min, max);

    let width = settings.width as i32;
    let mut cell_levels = vec![start_level; settings.width as usize];
    let mut lots = Vec::new();
    let mut level = start_level;
    let mut x = SPAWN_MARGIN;

    while x + 3 <= width - SPAWN_MARGIN {
        let lot_width: i32 = rng.gen_range(3..=5);
        if x + lot_width > width - SPAWN_MARGIN {
            break;
        }
        let street: i32 = rng.gen_range(2..=4);
        level = (level + rng.gen_range(-2_i32..=2) as f32).clamp(min, max);

        let end = (x + lot_width + street).min(width);
        for cell in &mut cell_levels[x as usize..end as usize] {
            *cell = level;
        }

        let floors = floor_count(settings.height as f32 - level, rng);
        lots.push(Lot {
            left: x,
            width: lot_width as u32,
            level,
            floors,
        });
        x += lot_width + street;
    }
    for cell in cell_levels.iter_mut().skip(x.max(0) as usize) {
        *cell = level;
    }

    let mut field = TerrainField::flat(settings.width, detail, start_level);
    let last_cell = cell_levels.len().saturating_sub(1);
    for (index, sample) in field.samples_mut().iter_mut().enumerate() {
        let cell = (index / detail as usize).min(last_cell);
        *sample = cell_levels[cell];
    }
    smooth_clamped(&mut field, settings);
    for lot in &lots {
        let left = lot.left as f32;
        field.level_range(left, left + lot.width as f32, lot.level);
    }

    (field, lots)
}

fn floor_count(clearance: f32, rng: &mut ChaCha8Rng) -> u32 {
    let available = clearance - URBAN_HEADROOM;
    if available < FLOOR_HEIGHT {
        return 0;
    }
    let most = ((available / FLOOR_HEIGHT).floor() as u32).min(MAX_GENERATED_FLOORS);
    let fewest = (most / 2).max(1);
    rng.gen_range(fewest..=most)
}

fn smooth_clamped(field: &mut TerrainField, settings: &TerrainSettings) {
    field.smooth(settings.smoothing as usize);
    for sample in field.samples_mut() {
        *sample = sample.clamp(settings.min_height, settings.max_height);
    }
}

/// One octave of cosine-interpolated value noise in `[0, 1)`.
fn value_noise(rng: &mut ChaCha8Rng, len: usize, spacing: usize) -> Vec<f32> {
    let spacing = spacing.max(1);
    let knots: Vec<f32> = (0..len / spacing + 2).map(|_| rng.gen::<f32>()).collect();
    (0..len)
        .map(|index| {
            let knot = index / spacing;
            let t = (index % spacing) as f32 / spacing as f32;
            let eased = (1.0 - (t * PI).cos()) * 0.5;
            knots[knot] + (knots[knot + 1] - knots[knot]) * eased
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use tanx_core::TerrainStyle;

    fn settings(style: TerrainStyle) -> TerrainSettings {
        TerrainSettings::default().with_seed(99).with_style(style)
    }

    #[test]
    fn classic_stays_within_elevation_bounds() {
        let settings = settings(TerrainStyle::Classic);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let field = classic(&settings, &mut rng);

        assert_eq!(
            field.samples().len(),
            (settings.width * settings.detail + 1) as usize
        );
        for &sample in field.samples() {
            assert!(sample >= settings.min_height - 1e-4);
            assert!(sample <= settings.max_height + 1e-4);
        }
    }

    #[test]
    fn urban_lots_respect_spawn_margin_and_are_level() {
        let settings = settings(TerrainStyle::Urban);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let (field, lots) = urban(&settings, &mut rng);

        assert!(!lots.is_empty());
        for lot in &lots {
            assert!(lot.left >= SPAWN_MARGIN);
            assert!(lot.left + lot.width as i32 <= settings.width as i32 - SPAWN_MARGIN);
            assert!(lot.floors <= MAX_GENERATED_FLOORS);
            for offset in 0..=lot.width {
                let x = lot.left as f32 + offset as f32;
                assert_eq!(field.height_at(x), lot.level);
            }
        }
    }

    #[test]
    fn value_noise_is_unit_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let layer = value_noise(&mut rng, 200, 16);
        assert_eq!(layer.len(), 200);
        assert!(layer.iter().all(|value| (0.0..1.0).contains(value)));
    }
}
