//! Built-in default catalog.
//!
//! Used whenever the store holds no trail list, or an empty one.

use crate::trail::{Difficulty, ElevationPoint, Trail};

fn profile(samples: &[(f64, f64)]) -> Vec<ElevationPoint> {
    let mut points: Vec<ElevationPoint> = samples
        .iter()
        .map(|&(km, m)| ElevationPoint::new(km, m))
        .collect();
    points.sort_by(|a, b| a.km.total_cmp(&b.km));
    points
}

fn highlights(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Fresh copy of the six default trails, in catalog order.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn default_trails() -> Vec<Trail> {
    vec![
        Trail {
            id: "mt-aurora-ridge".to_string(),
            name: "Mt. Aurora Ridge Loop".to_string(),
            location: "Cascadia National Park".to_string(),
            distance_km: 9.8,
            difficulty: Difficulty::Moderate,
            rating: 4.8,
            elevation_gain_m: 520.0,
            highest_point_m: Some(2120.0),
            lowest_point_m: Some(1600.0),
            duration_hours: 3.5,
            description: "A cinematic ridge-line loop with sweeping alpine views, playful \
                          switchbacks, and a soft forest floor descent. Ideal for golden-hour hikes."
                .to_string(),
            highlights: highlights(&[
                "Panoramic 270° summit overlook",
                "Wildflower meadows in late spring",
                "Shaded mossy descent perfect for hot days",
            ]),
            elevation_profile: Some(profile(&[
                (0.0, 1600.0),
                (1.5, 1820.0),
                (3.2, 2010.0),
                (4.9, 2120.0),
                (6.5, 2050.0),
                (8.0, 1880.0),
                (9.8, 1600.0),
            ])),
        },
        Trail {
            id: "ember-falls-path".to_string(),
            name: "Ember Falls Path".to_string(),
            location: "Redwood Basin Reserve".to_string(),
            distance_km: 4.2,
            difficulty: Difficulty::Easy,
            rating: 4.6,
            elevation_gain_m: 120.0,
            highest_point_m: Some(420.0),
            lowest_point_m: Some(300.0),
            duration_hours: 1.5,
            description: "A gentle, family-friendly out-and-back through towering redwoods \
                          leading to a veiled waterfall and calm plunge pool."
                .to_string(),
            highlights: highlights(&[
                "Year-round waterfall backdrop",
                "Accessible, well-maintained path",
                "Filtered light through old-growth canopy",
            ]),
            elevation_profile: Some(profile(&[
                (0.0, 300.0),
                (1.0, 340.0),
                (2.1, 390.0),
                (3.2, 420.0),
                (4.2, 390.0),
            ])),
        },
        Trail {
            id: "obsidian-ridge-traverse".to_string(),
            name: "Obsidian Ridge Traverse".to_string(),
            location: "Blackstone Range".to_string(),
            distance_km: 15.4,
            difficulty: Difficulty::Hard,
            rating: 4.9,
            elevation_gain_m: 980.0,
            highest_point_m: Some(3180.0),
            lowest_point_m: Some(2300.0),
            duration_hours: 6.0,
            description: "A bold, high-exposure traverse across volcanic rock and razor-sharp \
                          ridgelines. Demanding but unforgettable for experienced hikers."
                .to_string(),
            highlights: highlights(&[
                "Rugged volcanic formations",
                "High-elevation sunrise and sunset views",
                "Sections of light scrambling for added challenge",
            ]),
            elevation_profile: Some(profile(&[
                (0.0, 2300.0),
                (2.4, 2600.0),
                (4.8, 2850.0),
                (7.1, 3050.0),
                (9.6, 3180.0),
                (12.0, 3000.0),
                (15.4, 2400.0),
            ])),
        },
        Trail {
            id: "sage-creek-loop".to_string(),
            name: "Sage Creek Canyon Loop".to_string(),
            location: "High Desert Preserve".to_string(),
            distance_km: 7.3,
            difficulty: Difficulty::Moderate,
            rating: 4.4,
            elevation_gain_m: 260.0,
            highest_point_m: Some(980.0),
            lowest_point_m: Some(720.0),
            duration_hours: 2.5,
            description: "A warm, sandstone-framed loop tracing a seasonal creek bed with \
                          layered canyon walls and open desert sky."
                .to_string(),
            highlights: highlights(&[
                "Golden hour canyon glow",
                "Expansive desert vistas",
                "Frequent overlooks with rest spots",
            ]),
            elevation_profile: Some(profile(&[
                (0.0, 720.0),
                (1.5, 810.0),
                (3.0, 930.0),
                (4.5, 980.0),
                (5.8, 900.0),
                (7.3, 740.0),
            ])),
        },
        Trail {
            id: "silverpine-lakeside".to_string(),
            name: "Silverpine Lakeside Stroll".to_string(),
            location: "Silverpine Reservoir".to_string(),
            distance_km: 3.1,
            difficulty: Difficulty::Easy,
            rating: 4.3,
            elevation_gain_m: 40.0,
            highest_point_m: Some(620.0),
            lowest_point_m: Some(580.0),
            duration_hours: 1.0,
            description: "A relaxed shoreline path skimming mirror-like water with tall pines \
                          and dedicated benches for pauses and picnics."
                .to_string(),
            highlights: highlights(&[
                "Lakeside sunrise reflections",
                "Benches and picnic nooks",
                "Birdwatching along the marsh edge",
            ]),
            elevation_profile: Some(profile(&[
                (0.0, 580.0),
                (0.8, 592.0),
                (1.6, 605.0),
                (2.3, 612.0),
                (3.1, 600.0),
            ])),
        },
        Trail {
            id: "glacier-veil-pass".to_string(),
            name: "Glacier Veil Pass".to_string(),
            location: "Northcrest Alps".to_string(),
            distance_km: 12.7,
            difficulty: Difficulty::Hard,
            rating: 4.7,
            elevation_gain_m: 840.0,
            highest_point_m: Some(3260.0),
            lowest_point_m: Some(2450.0),
            duration_hours: 5.0,
            description: "A dramatic ascent into glacial basins, weaving past waterfalls and \
                          snowfields before topping out at a crystalline mountain pass."
                .to_string(),
            highlights: highlights(&[
                "Multiple waterfall crossings",
                "Snow patches into early summer",
                "Wide-open pass with glacier views",
            ]),
            elevation_profile: Some(profile(&[
                (0.0, 2450.0),
                (2.2, 2620.0),
                (4.4, 2830.0),
                (6.5, 3010.0),
                (8.8, 3180.0),
                (10.7, 3260.0),
                (12.7, 2550.0),
            ])),
        },
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_default_trails_count_and_order() {
        let trails = default_trails();
        let ids: Vec<&str> = trails.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "mt-aurora-ridge",
                "ember-falls-path",
                "obsidian-ridge-traverse",
                "sage-creek-loop",
                "silverpine-lakeside",
                "glacier-veil-pass",
            ]
        );
    }

    #[test]
    fn test_default_ids_unique() {
        let trails = default_trails();
        let ids: HashSet<&str> = trails.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), trails.len());
    }

    #[test]
    fn test_default_altitudes_consistent() {
        for trail in default_trails() {
            let (low, high) = trail.altitude_bounds().expect("default trails carry bounds");
            assert!(high >= low, "{} has inverted bounds", trail.id);
        }
    }

    #[test]
    fn test_default_profiles_sorted() {
        for trail in default_trails() {
            let profile = trail.profile();
            assert!(profile.len() > 1);
            assert!(profile.windows(2).all(|w| w[0].km <= w[1].km));
        }
    }

    #[test]
    fn test_descriptions_are_single_spaced() {
        for trail in default_trails() {
            assert!(!trail.description.contains("  "), "{}", trail.id);
        }
    }
}
