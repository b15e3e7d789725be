use keyrotate_types::ClientError;
use reqwest::{Response, StatusCode};

/// Classifies reqwest failures. Only a 404 becomes [`ClientError::NotFound`];
/// the mirror confirmer retries that and nothing else.
pub fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Network("Request timed out".to_string())
    } else if err.is_connect() {
        ClientError::Network("Connection error".to_string())
    } else if let Some(status) = err.status() {
        status_error(status, err.to_string())
    } else if err.is_decode() {
        ClientError::Decode(err.to_string())
    } else {
        ClientError::Network(err.to_string())
    }
}

pub fn status_error(status: StatusCode, message: String) -> ClientError {
    match status.as_u16() {
        404 => ClientError::NotFound {
            status: 404,
            message,
        },
        code => ClientError::Status {
            status: code,
            message,
        },
    }
}

/// Passes successful responses through; anything else becomes an error
/// carrying the response body.
pub async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(status_error(status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_404_is_not_found() {
        assert!(status_error(StatusCode::NOT_FOUND, "x".into()).is_not_found());
        assert_eq!(
            status_error(StatusCode::SERVICE_UNAVAILABLE, "busy".into()),
            ClientError::Status {
                status: 503,
                message: "busy".into()
            }
        );
    }
}
