//! Non-overlapping balloon layout
//!
//! Balloons are placed one at a time in lineup order. Each gets a random size
//! and up to `max_attempts` random positions inside the placeable band; the
//! first position clear of every earlier balloon wins. A balloon that finds no
//! room gets one retry at a smaller size. After that a distractor is dropped,
//! but the target is forced in (ignoring overlap) so every round stays solvable.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::overlap::{Bounds, clear_of_all};
use super::rng::RandomSource;
use super::words::WordEntry;
use crate::error::{ConfigError, RoundWarning};
use crate::settings::LayoutConfig;

/// The play area balloons are laid out in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub width: f32,
    pub height: f32,
    /// Fraction of `height` above which nothing is placed
    pub band_start: f32,
}

impl Region {
    pub fn new(width: f32, height: f32, band_start: f32) -> Result<Self, ConfigError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidRegion { width, height });
        }
        if !(0.0..1.0).contains(&band_start) {
            return Err(ConfigError::InvalidBandStart(band_start));
        }
        Ok(Self {
            width,
            height,
            band_start,
        })
    }

    /// Top edge of the placeable band
    #[inline]
    pub fn band_top(&self) -> f32 {
        self.band_start * self.height
    }

    #[inline]
    pub fn band_height(&self) -> f32 {
        self.height - self.band_top()
    }

    /// True when `bounds` lies inside the placeable band
    pub fn contains(&self, bounds: &Bounds) -> bool {
        bounds.within(
            Vec2::new(0.0, self.band_top()),
            Vec2::new(self.width, self.height),
        )
    }
}

/// Balloon colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalloonColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Pink,
    Cyan,
}

impl BalloonColor {
    pub const ALL: [BalloonColor; 8] = [
        BalloonColor::Red,
        BalloonColor::Blue,
        BalloonColor::Green,
        BalloonColor::Yellow,
        BalloonColor::Purple,
        BalloonColor::Orange,
        BalloonColor::Pink,
        BalloonColor::Cyan,
    ];

    /// CSS class name
    pub fn as_str(&self) -> &'static str {
        match self {
            BalloonColor::Red => "red",
            BalloonColor::Blue => "blue",
            BalloonColor::Green => "green",
            BalloonColor::Yellow => "yellow",
            BalloonColor::Purple => "purple",
            BalloonColor::Orange => "orange",
            BalloonColor::Pink => "pink",
            BalloonColor::Cyan => "cyan",
        }
    }

    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.index(Self::ALL.len())]
    }
}

/// A balloon with its final position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    /// Index of the entry in the lineup; used as the click id
    pub id: usize,
    pub entry: WordEntry,
    /// Top-left corner in region coordinates
    pub pos: Vec2,
    /// Edge length of the bounding square
    pub size: f32,
    pub color: BalloonColor,
    /// Placed without the overlap check
    pub forced: bool,
}

impl PlacedItem {
    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Hit test for a point in region coordinates
    pub fn contains_point(&self, point: Vec2) -> bool {
        let max = self.pos + Vec2::splat(self.size);
        point.x >= self.pos.x && point.x <= max.x && point.y >= self.pos.y && point.y <= max.y
    }
}

/// Result of laying out a lineup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutOutcome {
    pub placed: Vec<PlacedItem>,
    pub warnings: Vec<RoundWarning>,
}

impl LayoutOutcome {
    pub fn target(&self) -> Option<&PlacedItem> {
        self.placed.iter().find(|p| p.entry.is_target)
    }

    pub fn distractor_count(&self) -> usize {
        self.placed.iter().filter(|p| !p.entry.is_target).count()
    }

    fn warn(&mut self, warning: RoundWarning) {
        log::warn!("Layout: {}", warning);
        self.warnings.push(warning);
    }
}

/// Lay out `items` inside `region`
pub fn layout<R: RandomSource + ?Sized>(
    items: &[WordEntry],
    region: &Region,
    config: &LayoutConfig,
    rng: &mut R,
) -> LayoutOutcome {
    let mut outcome = LayoutOutcome {
        placed: Vec::with_capacity(items.len()),
        warnings: Vec::new(),
    };
    let mut occupied: Vec<Bounds> = Vec::with_capacity(items.len());

    for (id, entry) in items.iter().enumerate() {
        let size = rng.range(config.min_size, config.max_size);
        let color = BalloonColor::random(rng);

        let shrunk = (size - config.shrink_delta).max(config.size_floor);
        let found = find_slot(size, region, config, &occupied, rng)
            .or_else(|| find_slot(shrunk, region, config, &occupied, rng));

        let (bounds, forced) = match found {
            Some(bounds) => (bounds, false),
            None if entry.is_target => {
                outcome.warn(RoundWarning::TargetPlacementForced {
                    word: entry.text.clone(),
                });
                (forced_slot(shrunk, region, config.bottom_margin, rng), true)
            }
            None => {
                outcome.warn(RoundWarning::PlacementDegraded {
                    word: entry.text.clone(),
                });
                continue;
            }
        };

        occupied.push(bounds);
        outcome.placed.push(PlacedItem {
            id,
            entry: entry.clone(),
            pos: bounds.min,
            size: bounds.size,
            color,
            forced,
        });
    }

    outcome
}

/// Random search for a free slot of the given size
fn find_slot<R: RandomSource + ?Sized>(
    size: f32,
    region: &Region,
    config: &LayoutConfig,
    occupied: &[Bounds],
    rng: &mut R,
) -> Option<Bounds> {
    let max_x = region.width - size;
    let min_y = region.band_top();
    let max_y = region.height - size - config.bottom_margin.max(0.0);
    if max_x < 0.0 || max_y < min_y {
        return None;
    }

    for _ in 0..config.max_attempts {
        let x = rng.range(0.0, max_x);
        let y = rng.range(min_y, max_y);
        let candidate = Bounds::new(Vec2::new(x, y), size);
        if clear_of_all(&candidate, occupied, config.padding) {
            return Some(candidate);
        }
    }
    None
}

/// Anywhere in the band, shrinking to fit if the band is smaller than `size`
fn forced_slot<R: RandomSource + ?Sized>(
    size: f32,
    region: &Region,
    bottom_margin: f32,
    rng: &mut R,
) -> Bounds {
    let room = region.band_height() - bottom_margin.max(0.0);
    let room = if room > 0.0 { room } else { region.band_height() };
    let size = size.min(region.width).min(room);
    let x = rng.range(0.0, region.width - size);
    let y = rng.range(region.band_top(), region.band_top() + room - size);
    Bounds::new(Vec2::new(x, y), size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{ScriptedRandom, seeded};
    use proptest::prelude::*;

    fn lineup(target_at: usize, count: usize) -> Vec<WordEntry> {
        (0..count)
            .map(|i| {
                if i == target_at {
                    WordEntry::target("sun")
                } else {
                    WordEntry::distractor(&format!("word{}", i))
                }
            })
            .collect()
    }

    fn assert_no_overlap(outcome: &LayoutOutcome, padding: f32) {
        let free: Vec<&PlacedItem> = outcome.placed.iter().filter(|p| !p.forced).collect();
        for (i, a) in free.iter().enumerate() {
            for b in &free[i + 1..] {
                assert!(
                    !a.bounds().intersects(&b.bounds()),
                    "'{}' overlaps '{}'",
                    a.entry.text,
                    b.entry.text
                );
                let spacing = a.size / 2.0 + b.size / 2.0 + padding;
                assert!(a.center().distance(b.center()) >= spacing - 1e-3);
            }
        }
    }

    #[test]
    fn test_small_scenario() {
        let region = Region::new(500.0, 500.0, 0.5).unwrap();
        let config = LayoutConfig::default();
        let items = vec![
            WordEntry::distractor("cat"),
            WordEntry::target("sun"),
            WordEntry::distractor("dog"),
            WordEntry::distractor("hat"),
        ];
        let mut rng = seeded(12345);
        let outcome = layout(&items, &region, &config, &mut rng);

        assert_eq!(outcome.placed.iter().filter(|p| p.entry.is_target).count(), 1);
        assert!((1..=3).contains(&outcome.distractor_count()));
        for item in &outcome.placed {
            assert!(item.pos.y >= 250.0);
            assert!(item.pos.y + item.size <= 500.0 + 1e-3);
            assert!(region.contains(&item.bounds()));
        }
        assert_no_overlap(&outcome, config.padding);
    }

    #[test]
    fn test_selected_round_fits_small_region() {
        use crate::settings::{DistractorCount, SelectionConfig, TargetPolicy};
        use crate::sim::selector::RoundSelector;
        use crate::sim::words::WordBank;

        let bank = WordBank::new(vec![
            WordEntry::target("sun"),
            WordEntry::target("sock"),
            WordEntry::distractor("cat"),
            WordEntry::distractor("dog"),
            WordEntry::distractor("hat"),
        ]);
        let region = Region::new(500.0, 500.0, 0.5).unwrap();
        let config = LayoutConfig::default();

        for seed in 0..25 {
            let mut rng = seeded(seed);
            let mut selector = RoundSelector::new(SelectionConfig {
                target_policy: TargetPolicy::Random,
                distractors: DistractorCount::Fixed(3),
            });
            let selection = selector.select(1, &bank, &mut rng).unwrap();
            assert!(selection.warnings.is_empty());
            let outcome = layout(&selection.round.lineup, &region, &config, &mut rng);

            let targets: Vec<_> = outcome.placed.iter().filter(|p| p.entry.is_target).collect();
            assert_eq!(targets.len(), 1);
            assert_eq!(targets[0].entry, selection.round.target);
            assert!((1..=3).contains(&outcome.distractor_count()));
            for item in &outcome.placed {
                assert!(item.pos.y >= 250.0);
                assert!(item.pos.y + item.size <= 500.0 + 1e-3);
            }
            assert_no_overlap(&outcome, config.padding);
        }
    }

    #[test]
    fn test_negative_margin_stays_in_region() {
        // Unvalidated config straight into the engine
        let config = LayoutConfig {
            bottom_margin: -300.0,
            padding: -200.0,
            shrink_delta: -500.0,
            ..LayoutConfig::default()
        };
        let region = Region::new(800.0, 600.0, 0.4).unwrap();
        for seed in 0..20 {
            let outcome = layout(&lineup(2, 6), &region, &config, &mut seeded(seed));
            assert!(outcome.target().is_some());
            for item in &outcome.placed {
                assert!(region.contains(&item.bounds()), "{:?} escapes", item.bounds());
            }
        }
    }

    #[test]
    fn test_sizes_within_configured_range() {
        let region = Region::new(1600.0, 1200.0, 0.4).unwrap();
        let config = LayoutConfig::default();
        let mut rng = seeded(8);
        let outcome = layout(&lineup(0, 4), &region, &config, &mut rng);

        assert_eq!(outcome.placed.len(), 4);
        assert!(outcome.warnings.is_empty());
        for item in &outcome.placed {
            assert!(item.size >= config.min_size && item.size <= config.max_size);
        }
    }

    #[test]
    fn test_target_survives_tiny_region() {
        // Room for one balloon only
        let region = Region::new(130.0, 260.0, 0.5).unwrap();
        let config = LayoutConfig::default();
        for seed in 0..20 {
            let mut rng = seeded(seed);
            let outcome = layout(&lineup(4, 6), &region, &config, &mut rng);

            let target = outcome.target().expect("target must always be placed");
            assert!(region.contains(&target.bounds()));
            assert!(outcome.distractor_count() <= 1);
            assert!(
                outcome
                    .warnings
                    .iter()
                    .any(|w| matches!(w, RoundWarning::PlacementDegraded { .. }))
            );
        }
    }

    #[test]
    fn test_forced_target_when_blocked() {
        // Every draw is 0.0: all candidates land on the same corner
        let region = Region::new(800.0, 600.0, 0.4).unwrap();
        let config = LayoutConfig::default();
        let mut rng = ScriptedRandom::new(vec![0.0]);
        let outcome = layout(&lineup(1, 2), &region, &config, &mut rng);

        assert_eq!(outcome.placed.len(), 2);
        let target = outcome.target().unwrap();
        assert!(target.forced);
        assert_eq!(target.pos, Vec2::new(0.0, region.band_top()));
        assert_eq!(target.size, config.min_size - config.shrink_delta);
        assert_eq!(
            outcome.warnings,
            vec![RoundWarning::TargetPlacementForced {
                word: "sun".to_string()
            }]
        );
    }

    #[test]
    fn test_blocked_distractor_is_dropped() {
        let region = Region::new(800.0, 600.0, 0.4).unwrap();
        let config = LayoutConfig::default();
        let mut rng = ScriptedRandom::new(vec![0.0]);
        let outcome = layout(&lineup(0, 3), &region, &config, &mut rng);

        assert_eq!(outcome.placed.len(), 1);
        assert!(outcome.target().is_some());
        assert_eq!(outcome.warnings.len(), 2);
        assert!(
            outcome
                .warnings
                .iter()
                .all(|w| matches!(w, RoundWarning::PlacementDegraded { .. }))
        );
    }

    #[test]
    fn test_region_narrower_than_floor() {
        let region = Region::new(50.0, 400.0, 0.0).unwrap();
        let config = LayoutConfig::default();
        let mut rng = seeded(4);
        let outcome = layout(&lineup(0, 3), &region, &config, &mut rng);

        assert_eq!(outcome.placed.len(), 1);
        let target = outcome.target().unwrap();
        assert!(target.forced);
        assert_eq!(target.size, 50.0);
        assert!(region.contains(&target.bounds()));
    }

    #[test]
    fn test_ids_follow_lineup_order() {
        let region = Region::new(1600.0, 1200.0, 0.4).unwrap();
        let mut rng = seeded(21);
        let outcome = layout(&lineup(2, 4), &region, &LayoutConfig::default(), &mut rng);
        let ids: Vec<usize> = outcome.placed.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(outcome.placed[2].entry.is_target);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let region = Region::new(900.0, 700.0, 0.4).unwrap();
        let config = LayoutConfig::default();
        let items = lineup(3, 8);
        let a = layout(&items, &region, &config, &mut seeded(55));
        let b = layout(&items, &region, &config, &mut seeded(55));
        assert_eq!(a, b);
    }

    #[test]
    fn test_hit_test() {
        let item = PlacedItem {
            id: 0,
            entry: WordEntry::target("sun"),
            pos: Vec2::new(10.0, 20.0),
            size: 100.0,
            color: BalloonColor::Red,
            forced: false,
        };
        assert!(item.contains_point(Vec2::new(60.0, 70.0)));
        assert!(!item.contains_point(Vec2::new(5.0, 70.0)));
    }

    #[test]
    fn test_region_rejects_bad_values() {
        assert!(Region::new(0.0, 100.0, 0.5).is_err());
        assert!(Region::new(100.0, 100.0, 1.5).is_err());
    }

    proptest! {
        #[test]
        fn prop_layout_never_overlaps(
            seed in any::<u64>(),
            width in 200.0f32..1600.0,
            height in 200.0f32..1200.0,
            band_start in 0.0f32..0.8,
            count in 1usize..10,
            target_pick in any::<usize>(),
        ) {
            let region = Region::new(width, height, band_start).unwrap();
            let config = LayoutConfig::default();
            let items = lineup(target_pick % count, count);
            let mut rng = seeded(seed);
            let outcome = layout(&items, &region, &config, &mut rng);

            prop_assert!(outcome.placed.len() <= count);
            prop_assert_eq!(outcome.placed.iter().filter(|p| p.entry.is_target).count(), 1);
            for item in &outcome.placed {
                prop_assert!(region.contains(&item.bounds()));
            }
            let free: Vec<&PlacedItem> = outcome.placed.iter().filter(|p| !p.forced).collect();
            for (i, a) in free.iter().enumerate() {
                for b in &free[i + 1..] {
                    prop_assert!(!a.bounds().intersects(&b.bounds()));
                }
            }
        }
    }
}
