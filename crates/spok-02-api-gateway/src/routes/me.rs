use axum::{Extension, Json};
use serde::Serialize;
use spok_01_init_data::VerifiedPrincipal;

/// Public profile of the verified user
#[derive(Debug, Serialize)]
pub struct MeUser {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub ok: bool,
    pub user: MeUser,
    pub auth_date: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
}

impl From<VerifiedPrincipal> for MeResponse {
    fn from(principal: VerifiedPrincipal) -> Self {
        let user = principal.user;
        Self {
            ok: true,
            user: MeUser {
                id: user.id,
                first_name: user.first_name,
                last_name: user.last_name,
                username: user.username,
                language_code: user.language_code,
            },
            auth_date: principal.auth_date,
            is_premium: user.is_premium,
        }
    }
}

/// Echo the identity carried by the verified init data
pub async fn get_me(Extension(principal): Extension<VerifiedPrincipal>) -> Json<MeResponse> {
    Json(MeResponse::from(principal))
}
