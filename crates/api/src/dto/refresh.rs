use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    #[serde(rename = "Status")]
    pub status: String,

    #[serde(rename = "Message")]
    pub message: String,
}

impl RefreshResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: "refreshed".to_string(),
        }
    }
}
