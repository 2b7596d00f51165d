use serde::{Deserialize, Serialize};

use super::ProfileData;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidateProfileRequest {
    #[serde(default, alias = "valorantName")]
    pub valorant_name: String,
    #[serde(default, alias = "valorantTag")]
    pub valorant_tag: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidateProfileResponse {
    pub success: bool,
    pub data: ProfileData,
}
