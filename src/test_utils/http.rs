use axum::{body::Body, http::StatusCode, response::Response};
use axum_test::TestResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    assert_eq!(get_header(response, "content-type"), content_type);
}

#[track_caller]
fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let header_error_message = format!("Headers missing {header_name}");

    response
        .headers()
        .get(header_name)
        .expect(&header_error_message)
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

pub(crate) async fn parse_json_body<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    serde_json::from_slice(&body).expect("Could not parse response body as JSON")
}

#[track_caller]
pub(crate) fn assert_json_error(response: &TestResponse, status: StatusCode, message: &str) {
    response.assert_status(status);
    assert_eq!(
        response.json::<Value>(),
        serde_json::json!({ "error": message }),
        "unexpected error body"
    );
}
