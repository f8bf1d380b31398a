//! Cross-crate integration flows.

pub mod auth_flows;
pub mod server;
pub mod storage_flows;

use spok_01_init_data::{sign_init_data, BotToken};

/// Token shared by every flow
pub const TEST_TOKEN: &str = "1234567890:TEST-ONLY-TOKEN";

/// Signed init data for `user_id`, dated `auth_date`
pub fn signed_init_data(user_id: i64, auth_date: i64) -> String {
    let token = BotToken::new(TEST_TOKEN).unwrap_or_else(|e| panic!("test token rejected: {e}"));
    let auth_date = auth_date.to_string();
    let user = format!(
        r#"{{"id":{user_id},"first_name":"Test","username":"tester","language_code":"en"}}"#
    );
    sign_init_data(
        [
            ("auth_date", auth_date.as_str()),
            ("chat_type", "sender"),
            ("user", user.as_str()),
        ],
        &token,
    )
}
