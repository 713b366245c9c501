//! Reward reason tags.
//!
//! Every reward row carries one of these string tags; the dashboard
//! aggregates per tag.

/// Direct recommend bonus.
pub const RECOMMEND: &str = "recommend";
/// Team recommend bonus.
pub const RECOMMEND_TEAM: &str = "recommend_team";
/// Daily area/tier bonus.
pub const DAILY_RECOMMEND_AREA: &str = "daily_recommend_area";
/// Daily location payout.
pub const LOCATION_DAILY_REWARD: &str = "location_daily_reward";
/// Fee redistribution.
pub const FEE: &str = "fee";

/// The reasons counted as recommend rewards in the recommend view.
pub const RECOMMEND_REASONS: &[&str] = &[RECOMMEND, RECOMMEND_TEAM, DAILY_RECOMMEND_AREA];
