//! Damage profiles and the distance falloff shared by splash and collapse damage.

/// Distance within which area damage is dealt in full.
pub const FULL_DAMAGE_RADIUS: f32 = 0.5;

const SPLASH_SCALE: f32 = 0.6;

/// Damage and blast size applied by one impact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageProfile {
    /// Hit points removed by a direct hit and by area damage at point blank.
    pub base_damage: u32,
    /// Radius of the area damage and of ground craters.
    pub splash_radius: f32,
}

impl DamageProfile {
    /// Creates a profile from base damage and splash radius.
    #[must_use]
    pub const fn new(base_damage: u32, splash_radius: f32) -> Self {
        Self {
            base_damage,
            splash_radius,
        }
    }

    /// Returns the profile with both damage and radius multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        let factor = factor.max(0.0);
        Self {
            base_damage: (self.base_damage as f32 * factor).round() as u32,
            splash_radius: self.splash_radius * factor,
        }
    }

    /// Area damage this profile deals at `distance` from the impact.
    #[must_use]
    pub fn splash_at(&self, distance: f32) -> u32 {
        falloff_damage(self.base_damage, self.splash_radius, distance)
    }
}

/// Area damage dealt at `distance` from an impact.
///
/// Anything within [`FULL_DAMAGE_RADIUS`] takes `base` in full. Beyond that the
/// damage drops linearly to the rim, is scaled down, and never falls below one
/// hit point while still inside `radius`. Nothing is dealt past the rim.
#[must_use]
pub fn falloff_damage(base: u32, radius: f32, distance: f32) -> u32 {
    if base == 0 || !(distance <= radius) {
        return 0;
    }
    if distance <= FULL_DAMAGE_RADIUS {
        return base;
    }
    let falloff = 1.0 - distance / radius;
    ((base as f32 * falloff * SPLASH_SCALE) as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_blank_deals_full_damage() {
        assert_eq!(falloff_damage(25, 1.8, 0.0), 25);
        assert_eq!(falloff_damage(25, 1.8, 0.5), 25);
    }

    #[test]
    fn damage_drops_off_towards_the_rim() {
        assert_eq!(falloff_damage(25, 1.8, 0.9), 7);
        assert_eq!(falloff_damage(25, 1.8, 1.79), 1);
        assert_eq!(falloff_damage(25, 1.8, 1.81), 0);
        assert_eq!(falloff_damage(25, 1.8, f32::NAN), 0);
    }

    #[test]
    fn scaling_grows_damage_and_radius() {
        let profile = DamageProfile::new(25, 1.8).scaled(2.0);
        assert_eq!(profile.base_damage, 50);
        assert!((profile.splash_radius - 3.6).abs() < 1e-6);
        assert_eq!(profile.splash_at(0.2), 50);
    }
}
