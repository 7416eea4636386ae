//! Seed an in-memory store, run a filtered query and print both charts.
//!
//! ```bash
//! cargo run --example query_demo
//! ```

use chrono::Utc;

use travel_tip::db::{seed_if_empty, LocalRepository};
use travel_tip::models::LatLng;
use travel_tip::services::locations::{list_view, stats_by_rating, stats_by_recency, StatsSettings, ViewOptions};
use travel_tip::services::{FilterPatch, QueryState, SortField};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let repo = LocalRepository::new();
    seed_if_empty(&repo).await?;

    let mut state = QueryState::new();
    state.set_filter(&FilterPatch::min_rate(3));
    state.set_sort(SortField::Rating, true);

    let tel_aviv = LatLng::new(32.0853, 34.7818);
    let views = list_view(&repo, &state, &ViewOptions::at(Utc::now()).with_user_pos(tel_aviv)).await?;
    println!("Locations rated 3 and up, best first:");
    for view in &views {
        println!(
            "  {:<20} {} {:>8.2} km  created {}",
            view.record.name,
            "*".repeat(view.record.rating.max(0) as usize),
            view.distance_km.unwrap_or_default(),
            view.created_ago
        );
    }

    let settings = StatsSettings::default();
    let by_rating = stats_by_rating(&repo, &settings).await?;
    println!("\nBy rating: {}", serde_json::to_string(&by_rating.buckets)?);
    println!("  {}", by_rating.gradient);

    let by_recency = stats_by_recency(&repo, &settings, Utc::now()).await?;
    println!("By recency: {}", serde_json::to_string(&by_recency.buckets)?);
    println!("  {}", by_recency.gradient);

    Ok(())
}
