//! Proportional-segment encoding of bucket maps for circular charts.
//!
//! The output is an ordered list of `(color, cumulative percent)` stops in
//! the shape a conic gradient expects: every segment contributes two stops at
//! the same boundary so neighbouring colors meet at a hard edge, the first
//! stop sits at 0% and the last at 100%.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::histogram::BucketMap;

/// Default segment colors, low to high.
pub const DEFAULT_COLORS: [&str; 6] = [
    "#2ca02c", // Green
    "#1f77b4", // Blue
    "#ff7f0e", // Orange
    "#d62728", // Red
    "#9467bd", // Purple
    "#8c564b", // Brown
];

/// Color used when no bucket has data.
pub const DEFAULT_EMPTY_COLOR: &str = "#cccccc";

/// One boundary of the gradient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorStop {
    pub color: String,
    pub percent: u32,
}

impl ColorStop {
    pub fn new(color: impl Into<String>, percent: u32) -> Self {
        Self {
            color: color.into(),
            percent,
        }
    }
}

/// Ordered stop sequence, non-decreasing in `percent`, from 0 to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorStops(Vec<ColorStop>);

impl ColorStops {
    pub fn as_slice(&self) -> &[ColorStop] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColorStop> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<ColorStop> {
        self.0
    }

    /// CSS stop list, e.g. `purple 0%, purple 33%, blue 33%, blue 100%`.
    pub fn to_css(&self) -> String {
        self.0
            .iter()
            .map(|stop| format!("{} {}%", stop.color, stop.percent))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Full `conic-gradient(...)` value for a pie element.
    pub fn conic_gradient(&self) -> String {
        format!("conic-gradient({})", self.to_css())
    }
}

/// Error for a palette without any segment color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Palette must contain at least one color")]
pub struct EmptyPalette;

/// Segment colors plus the color of the "no data" chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    colors: Vec<String>,
    empty_color: String,
}

impl Palette {
    pub fn new<I, S>(colors: I, empty_color: impl Into<String>) -> Result<Self, EmptyPalette>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        if colors.is_empty() {
            return Err(EmptyPalette);
        }
        Ok(Self {
            colors,
            empty_color: empty_color.into(),
        })
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn empty_color(&self) -> &str {
        &self.empty_color
    }

    /// Color of the `index`-th rendered segment; wraps around when there are
    /// more segments than colors.
    pub fn color_for(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            empty_color: DEFAULT_EMPTY_COLOR.to_string(),
        }
    }
}

/// How per-segment percentages are rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Round each segment independently and force the last boundary to
    /// 100%. The sum of the rounded shares may drift away from 100; that
    /// drift is absorbed (or truncated) by the last segment.
    #[default]
    Drift,
    /// Largest-remainder allocation: shares are floored and the leftover
    /// points go to the largest fractional parts, so they sum to exactly
    /// 100 and no segment absorbs the error.
    LargestRemainder,
}

impl FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drift" => Ok(Self::Drift),
            "largest_remainder" | "largest-remainder" => Ok(Self::LargestRemainder),
            other => Err(format!("Unknown rounding mode: {}", other)),
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingMode::Drift => f.write_str("drift"),
            RoundingMode::LargestRemainder => f.write_str("largest_remainder"),
        }
    }
}

/// Encode `map` into gradient stops.
///
/// Zero-count buckets are skipped and colors are assigned by position among
/// the rendered buckets. When nothing is rendered the result is the single
/// no-data segment `[empty 0%, empty 100%]`.
pub fn encode(map: &BucketMap, palette: &Palette, mode: RoundingMode) -> ColorStops {
    let active: Vec<u64> = map.active().map(|(_, count)| count).collect();
    if active.is_empty() {
        return ColorStops(vec![
            ColorStop::new(palette.empty_color(), 0),
            ColorStop::new(palette.empty_color(), 100),
        ]);
    }

    let total: u64 = active.iter().sum();
    let shares = match mode {
        RoundingMode::Drift => rounded_shares(&active, total),
        RoundingMode::LargestRemainder => largest_remainder_shares(&active, total),
    };

    let last = active.len() - 1;
    let mut stops = Vec::with_capacity(active.len() * 2);
    stops.push(ColorStop::new(palette.color_for(0), 0));

    let mut boundary = 0u32;
    for (index, share) in shares.iter().take(last).enumerate() {
        boundary = (boundary + share).min(100);
        stops.push(ColorStop::new(palette.color_for(index), boundary));
        stops.push(ColorStop::new(palette.color_for(index + 1), boundary));
    }
    stops.push(ColorStop::new(palette.color_for(last), 100));

    ColorStops(stops)
}

fn rounded_shares(counts: &[u64], total: u64) -> Vec<u32> {
    counts
        .iter()
        .map(|&count| (count as f64 / total as f64 * 100.0).round() as u32)
        .collect()
}

fn largest_remainder_shares(counts: &[u64], total: u64) -> Vec<u32> {
    let total = u128::from(total);
    let mut shares: Vec<u32> = Vec::with_capacity(counts.len());
    let mut remainders: Vec<(usize, u128)> = Vec::with_capacity(counts.len());

    for (index, &count) in counts.iter().enumerate() {
        let scaled = u128::from(count) * 100;
        shares.push((scaled / total) as u32);
        remainders.push((index, scaled % total));
    }

    let assigned: u32 = shares.iter().sum();
    // Largest remainder first, earlier bucket wins ties.
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (index, _) in remainders.into_iter().take((100 - assigned) as usize) {
        shares[index] += 1;
    }
    shares
}

/// Legend row for one rendered bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub count: u64,
    pub color: String,
}

/// Legend rows for the rendered buckets, colored like their segments.
pub fn legend(map: &BucketMap, palette: &Palette) -> Vec<LegendEntry> {
    map.active()
        .enumerate()
        .map(|(index, (label, count))| LegendEntry {
            label: label.to_string(),
            count,
            color: palette.color_for(index).to_string(),
        })
        .collect()
}

/// Everything a pie widget needs: counts, stops, legend and CSS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentChart {
    pub buckets: BucketMap,
    pub stops: ColorStops,
    pub legend: Vec<LegendEntry>,
    pub gradient: String,
}

impl SegmentChart {
    pub fn build(buckets: BucketMap, palette: &Palette, mode: RoundingMode) -> Self {
        let stops = encode(&buckets, palette, mode);
        let legend = legend(&buckets, palette);
        let gradient = stops.conic_gradient();
        Self {
            buckets,
            stops,
            legend,
            gradient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn palette(colors: &[&str]) -> Palette {
        Palette::new(colors.iter().copied(), "none").unwrap()
    }

    fn pairs(stops: &ColorStops) -> Vec<(&str, u32)> {
        stops.iter().map(|s| (s.color.as_str(), s.percent)).collect()
    }

    #[test]
    fn test_two_bucket_example() {
        let map = BucketMap::from_counts([("low", 1), ("medium", 0), ("high", 2)]);
        let stops = encode(&map, &palette(&["C0", "C1"]), RoundingMode::Drift);
        assert_eq!(
            pairs(&stops),
            vec![("C0", 0), ("C0", 33), ("C1", 33), ("C1", 100)]
        );
        assert_eq!(stops.to_css(), "C0 0%, C0 33%, C1 33%, C1 100%");
    }

    #[test]
    fn test_three_buckets_match_reference_gradient() {
        let map = BucketMap::from_counts([("a", 1), ("b", 1), ("c", 1)]);
        let stops = encode(&map, &palette(&["purple", "blue", "red"]), RoundingMode::Drift);
        assert_eq!(
            stops.to_css(),
            "purple 0%, purple 33%, blue 33%, blue 66%, red 66%, red 100%"
        );
    }

    #[test]
    fn test_single_bucket_spans_whole_circle() {
        let map = BucketMap::from_counts([("low", 0), ("high", 7)]);
        let stops = encode(&map, &palette(&["C0", "C1"]), RoundingMode::Drift);
        assert_eq!(pairs(&stops), vec![("C0", 0), ("C0", 100)]);
    }

    #[test]
    fn test_empty_map_yields_no_data_segment() {
        let stops = encode(&BucketMap::default(), &palette(&["C0"]), RoundingMode::Drift);
        assert_eq!(pairs(&stops), vec![("none", 0), ("none", 100)]);

        let zeros = BucketMap::with_labels(["low", "medium", "high"]);
        let stops = encode(&zeros, &palette(&["C0"]), RoundingMode::LargestRemainder);
        assert_eq!(pairs(&stops), vec![("none", 0), ("none", 100)]);
    }

    #[test]
    fn test_drift_is_not_corrected() {
        // 1/6, 1/6, 4/6 -> 17 + 17 = 34, last segment absorbs 66 instead of 67.
        let map = BucketMap::from_counts([("a", 1), ("b", 1), ("c", 4)]);
        let stops = encode(&map, &palette(&["A", "B", "C"]), RoundingMode::Drift);
        assert_eq!(
            pairs(&stops),
            vec![("A", 0), ("A", 17), ("B", 17), ("B", 34), ("C", 34), ("C", 100)]
        );
    }

    #[test]
    fn test_drift_overshoot_is_clamped() {
        // 199 half-percent buckets round up to 1% each and would pass 100.
        let mut map = BucketMap::default();
        for i in 0..200 {
            map.add(format!("b{}", i), 1);
        }
        let stops = encode(&map, &palette(&["X"]), RoundingMode::Drift);
        assert!(stops.iter().all(|s| s.percent <= 100));
        assert!(stops.as_slice().windows(2).all(|w| w[0].percent <= w[1].percent));
        assert_eq!(stops.as_slice().last().unwrap().percent, 100);
    }

    #[test]
    fn test_largest_remainder_distributes_error() {
        let map = BucketMap::from_counts([("a", 1), ("b", 1), ("c", 1)]);
        let stops = encode(&map, &palette(&["A", "B", "C"]), RoundingMode::LargestRemainder);
        // 33.3 each; the spare point goes to the first bucket.
        assert_eq!(
            pairs(&stops),
            vec![("A", 0), ("A", 34), ("B", 34), ("B", 67), ("C", 67), ("C", 100)]
        );

        assert_eq!(largest_remainder_shares(&[1, 1, 4], 6), vec![17, 17, 66]);
        assert_eq!(largest_remainder_shares(&[1, 2], 3), vec![33, 67]);
        assert_eq!(largest_remainder_shares(&[5], 5), vec![100]);
    }

    #[test]
    fn test_palette_wraps_around() {
        let map = BucketMap::from_counts([("a", 1), ("b", 1), ("c", 2)]);
        let stops = encode(&map, &palette(&["X", "Y"]), RoundingMode::Drift);
        assert_eq!(stops.as_slice()[4].color, "X");
        assert_eq!(stops.as_slice()[5].color, "X");
    }

    #[test]
    fn test_palette_requires_a_color() {
        assert_eq!(Palette::new(Vec::<String>::new(), "grey"), Err(EmptyPalette));
        let default = Palette::default();
        assert_eq!(default.colors().len(), DEFAULT_COLORS.len());
        assert_eq!(default.empty_color(), DEFAULT_EMPTY_COLOR);
    }

    #[test]
    fn test_legend_skips_empty_buckets() {
        let map = BucketMap::from_counts([("low", 2), ("medium", 0), ("high", 5)]);
        let legend = legend(&map, &palette(&["C0", "C1", "C2"]));
        assert_eq!(
            legend,
            vec![
                LegendEntry {
                    label: "low".to_string(),
                    count: 2,
                    color: "C0".to_string()
                },
                LegendEntry {
                    label: "high".to_string(),
                    count: 5,
                    color: "C1".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_segment_chart_gradient() {
        let map = BucketMap::from_counts([("low", 1), ("high", 1)]);
        let chart = SegmentChart::build(map, &palette(&["red", "blue"]), RoundingMode::Drift);
        assert_eq!(
            chart.gradient,
            "conic-gradient(red 0%, red 50%, blue 50%, blue 100%)"
        );
        assert_eq!(chart.legend.len(), 2);
        assert_eq!(chart.buckets.total(), 2);
    }

    #[test]
    fn test_rounding_mode_parse() {
        assert_eq!("drift".parse::<RoundingMode>().unwrap(), RoundingMode::Drift);
        assert_eq!(
            "Largest-Remainder".parse::<RoundingMode>().unwrap(),
            RoundingMode::LargestRemainder
        );
        assert!("banker".parse::<RoundingMode>().is_err());
        assert_eq!(RoundingMode::LargestRemainder.to_string(), "largest_remainder");
    }

    proptest! {
        #[test]
        fn prop_stops_are_well_formed(
            counts in prop::collection::vec(0u64..50, 0..12),
            largest in any::<bool>(),
        ) {
            let map = BucketMap::from_counts(
                counts.iter().enumerate().map(|(i, c)| (format!("b{}", i), *c)),
            );
            let mode = if largest { RoundingMode::LargestRemainder } else { RoundingMode::Drift };
            let stops = encode(&map, &Palette::default(), mode);

            prop_assert!(!stops.is_empty());
            prop_assert_eq!(stops.as_slice()[0].percent, 0);
            prop_assert_eq!(stops.as_slice()[stops.len() - 1].percent, 100);
            prop_assert!(stops.as_slice().windows(2).all(|w| w[0].percent <= w[1].percent));

            let rendered = counts.iter().filter(|c| **c > 0).count();
            prop_assert_eq!(stops.len(), (rendered * 2).max(2));
        }

        #[test]
        fn prop_largest_remainder_sums_to_100(counts in prop::collection::vec(1u64..1000, 1..20)) {
            let total: u64 = counts.iter().sum();
            let shares = largest_remainder_shares(&counts, total);
            prop_assert_eq!(shares.iter().sum::<u32>(), 100);
        }
    }
}
