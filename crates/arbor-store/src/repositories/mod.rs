//! Stateless repositories over `&Connection`.
//!
//! Every method takes a `&Connection` parameter and translates between
//! Rust types and SQL. Callers own transaction boundaries: mutating service
//! flows run several repository calls against one `rusqlite::Transaction`.

pub mod balance;
pub mod balance_reward;
pub mod config;
pub mod location;
pub mod month_recommend;
pub mod recommend;
pub mod reward;
pub mod user;
pub mod user_area;
pub mod user_info;
pub mod withdraw;

pub use balance::BalanceRepo;
pub use balance_reward::BalanceRewardRepo;
pub use config::ConfigRepo;
pub use location::LocationRepo;
pub use month_recommend::MonthRecommendRepo;
pub use recommend::RecommendRepo;
pub use reward::RewardRepo;
pub use user::UserRepo;
pub use user_area::AreaRepo;
pub use user_info::UserInfoRepo;
pub use withdraw::WithdrawRepo;

/// Build a `(?, ?, ...)` placeholder list for an `IN` clause.
pub(crate) fn placeholders(count: usize) -> String {
    let mut out = String::with_capacity(count * 3);
    for i in 0..count {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('?');
    }
    out
}
