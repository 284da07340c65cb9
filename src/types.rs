/// Status envelope carried by every service response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    /// `0` on success, negative service-specific failure codes otherwise.
    pub code: i32,
    pub message: String,
}

impl Status {
    /// Returns `true` when the service reports code `0`.
    pub fn is_success(&self) -> bool {
        self.code == crate::decode::STATUS_SUCCESS
    }
}

/// Outcome of a search-by-upload call.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// Verified service status (always code `0`).
    pub status: Status,
    /// `nb_results_found` as reported by the service.
    pub result_count: i32,
    /// Matching images, best matches first as ordered by the service.
    pub images: Vec<ImageMatch>,
}

/// One indexed image matched by a search.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageMatch {
    /// Caller-assigned id the image was uploaded under.
    pub id: String,
    /// Match score reported by the service.
    pub score: f32,
    /// Keywords attached at upload time.
    pub keywords: Vec<String>,
    /// Free-form match details, empty when the service sends none.
    pub result_info: String,
}
