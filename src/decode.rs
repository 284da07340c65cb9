use reqwest::StatusCode;

use crate::{
    wire::{self, SearchResponse, StatusResponse},
    ImageMatch, LtuError, SearchResult, Status,
};

pub(crate) const STATUS_SUCCESS: i32 = 0;
pub(crate) const STATUS_IMAGE_NOT_FOUND: i32 = -2802;
pub(crate) const STATUS_NOT_ENOUGH_INFORMATION: i32 = -1002;

/// Reads the status envelope out of a response body.
///
/// Any deserialization failure, or a body without a `status` object, yields `None`.
pub(crate) fn parse_status(body: &str) -> Option<Status> {
    serde_json::from_str::<StatusResponse>(body)
        .ok()
        .and_then(|response| response.status)
        .map(decode_status)
}

/// Parses a full search payload; unlike [`parse_status`] a mismatch is an error.
pub(crate) fn parse_search_response(
    http_status: StatusCode,
    body: &str,
) -> Result<SearchResponse, LtuError> {
    serde_json::from_str::<SearchResponse>(body).map_err(|_| LtuError::ResponseParse {
        http_status: http_status.as_u16(),
        body: body.to_owned(),
    })
}

/// Passes iff the HTTP status is a success code and the service status code is 0,
/// handing back the verified status.
pub(crate) fn verify_success(
    operation: &'static str,
    http_status: StatusCode,
    status: Option<Status>,
) -> Result<Status, LtuError> {
    match status {
        Some(status) if http_status.is_success() && status.is_success() => Ok(status),
        status => Err(LtuError::ServiceCallFailed {
            operation,
            status,
            http_status: http_status.as_u16(),
            reason: http_status.canonical_reason().map(str::to_owned),
        }),
    }
}

/// Validates a search payload and converts it into the public result type.
pub(crate) fn decode_search_result(
    http_status: StatusCode,
    response: SearchResponse,
) -> Result<SearchResult, LtuError> {
    let status = verify_success(
        "SearchByUpload",
        http_status,
        response.status.map(decode_status),
    )?;

    let images = response
        .images
        .unwrap_or_default()
        .into_iter()
        .map(decode_image)
        .collect();

    Ok(SearchResult {
        status,
        result_count: response.nb_results_found,
        images,
    })
}

fn decode_status(status: wire::WireStatus) -> Status {
    Status {
        code: status.code,
        message: status.message.unwrap_or_default(),
    }
}

fn decode_image(image: wire::WireImage) -> ImageMatch {
    ImageMatch {
        id: image.id,
        score: image.score,
        keywords: image.keywords.unwrap_or_default(),
        result_info: image.result_info.unwrap_or_default(),
    }
}
