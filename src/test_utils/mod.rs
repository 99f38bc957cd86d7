#![allow(missing_docs)]

pub(crate) mod http;

pub(crate) use http::{assert_content_type, assert_json_error, parse_json_body};
