use rand::Rng;

/// Default swing of a flicker around its base value.
pub const DEFAULT_FLICKER_AMPLITUDE: i32 = 24;
/// Default shortest and longest wait between flicker changes, in seconds.
pub const DEFAULT_FLICKER_INTERVAL: (f32, f32) = (0.05, 0.25);

/// A light write requested by a process.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LightChange {
    pub index: usize,
    pub value: i32,
}

/// Periodic jobs driven once per simulation tick.
#[derive(Clone, Debug, PartialEq)]
pub enum LightProcess {
    Flicker(Flicker),
}

impl LightProcess {
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) -> Option<LightChange> {
        match self {
            LightProcess::Flicker(f) => f.update(dt, rng),
        }
    }

    /// Cell this process writes to.
    pub fn target(&self) -> usize {
        match self {
            LightProcess::Flicker(f) => f.index,
        }
    }
}

/// Re-sets a light to `base ± amplitude` at random intervals.
#[derive(Clone, Debug, PartialEq)]
pub struct Flicker {
    pub index: usize,
    pub base: i32,
    pub amplitude: i32,
    /// Inclusive `(min, max)` wait in seconds.
    pub interval: (f32, f32),
    countdown: f32,
}

impl Flicker {
    /// Fires on the first update.
    pub fn new(index: usize, base: i32) -> Self {
        Self {
            index,
            base,
            amplitude: DEFAULT_FLICKER_AMPLITUDE,
            interval: DEFAULT_FLICKER_INTERVAL,
            countdown: 0.0,
        }
    }

    pub fn with_amplitude(mut self, amplitude: i32) -> Self {
        self.amplitude = amplitude.max(0);
        self
    }

    pub fn with_interval(mut self, min: f32, max: f32) -> Self {
        let min = min.max(0.0);
        self.interval = (min, max.max(min));
        self
    }

    pub fn countdown(&self) -> f32 {
        self.countdown
    }

    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) -> Option<LightChange> {
        self.countdown -= dt;
        if self.countdown > 0.0 {
            return None;
        }
        let (min, max) = self.interval;
        self.countdown = if max > min { rng.gen_range(min..=max) } else { min };
        let value = self.base.saturating_add(rng.gen_range(-self.amplitude..=self.amplitude)).max(0);
        Some(LightChange { index: self.index, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fires_immediately_then_waits() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut f = Flicker::new(7, 100).with_interval(0.5, 0.5);
        let first = f.update(0.0, &mut rng).unwrap();
        assert_eq!(first.index, 7);
        assert!(f.update(0.25, &mut rng).is_none());
        assert!(f.update(0.25, &mut rng).is_some());
    }

    #[test]
    fn values_stay_within_amplitude() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut p = LightProcess::Flicker(Flicker::new(0, 64).with_amplitude(10));
        for _ in 0..200 {
            if let Some(c) = p.update(1.0, &mut rng) {
                assert!((54..=74).contains(&c.value));
            }
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut f = Flicker::new(0, 64);
            (0..20).filter_map(|_| f.update(0.1, &mut rng)).map(|c| c.value).collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn extreme_base_and_amplitude_saturate() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut f = Flicker::new(0, i32::MAX - 1).with_amplitude(i32::MAX);
        for _ in 0..64 {
            if let Some(c) = f.update(1.0, &mut rng) {
                assert!(c.value >= 0);
            }
        }
    }
}
