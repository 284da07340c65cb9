use serde::Deserialize;

/// Envelope shared by every response; only the status is read.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<WireStatus>,
}

#[derive(Debug, Deserialize)]
pub struct WireStatus {
    pub code: i32,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub status: Option<WireStatus>,
    #[serde(default)]
    pub nb_results_found: i32,
    #[serde(default)]
    pub images: Option<Vec<WireImage>>,
}

#[derive(Debug, Deserialize)]
pub struct WireImage {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub result_info: Option<String>,
}
