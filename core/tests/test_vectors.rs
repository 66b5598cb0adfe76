//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector names an operation, its inputs, the expected request, a
//! simulated response and either the expected result (compared as JSON) or
//! the expected error class.

use serde_json::Value;
use vimeo_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, VimeoClient};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> VimeoClient {
    VimeoClient::new(BASE_URL, Some("vector-token".to_string()))
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn u64_input(input: &Value, key: &str) -> u64 {
    input[key].as_u64().unwrap_or_else(|| panic!("missing input {key}"))
}

fn build(c: &VimeoClient, operation: &str, input: &Value) -> HttpRequest {
    let video_id = u64_input(input, "video_id");
    let active = input.get("active").and_then(Value::as_bool);
    match operation {
        "get_pictures" => c.build_get_pictures(video_id),
        "get_picture" => c.build_get_picture(video_id, u64_input(input, "picture_id")),
        "create_picture_ticket" => c.build_create_picture_ticket(
            video_id,
            input.get("time").and_then(Value::as_f64).map(|t| t as f32),
            active,
        ),
        "update_picture" => c.build_update_picture(video_id, u64_input(input, "picture_id"), active),
        "delete_picture" => c.build_delete_picture(video_id, u64_input(input, "picture_id")),
        "update_embed_preset" => {
            c.build_update_embed_preset(video_id, u64_input(input, "embed_preset_id"))
        }
        "get_privacy_domains" => c.build_get_privacy_domains(video_id),
        "add_privacy_domain" => c.build_add_privacy_domain(video_id, input["domain"].as_str().unwrap()),
        "delete_privacy_domain" => {
            c.build_delete_privacy_domain(video_id, input["domain"].as_str().unwrap())
        }
        other => panic!("unknown operation: {other}"),
    }
    .unwrap()
}

/// Run the matching `parse_*` and render the result as JSON. Absent
/// resources and unit results both come out as `null`.
fn parse(c: &VimeoClient, operation: &str, response: &HttpResponse) -> Result<Value, ApiError> {
    fn json<T: serde::Serialize>(value: T) -> Value {
        serde_json::to_value(value).unwrap()
    }
    match operation {
        "get_pictures" => c.parse_get_pictures(response).map(json),
        "get_picture" => c.parse_get_picture(response).map(json),
        "create_picture_ticket" => c.parse_create_picture_ticket(response).map(json),
        "update_picture" => c.parse_update_picture(response).map(json),
        "delete_picture" => c.parse_delete_picture(response).map(|_| Value::Null),
        "update_embed_preset" => c.parse_update_embed_preset(response).map(|_| Value::Null),
        "get_privacy_domains" => c.parse_get_privacy_domains(response).map(json),
        "add_privacy_domain" => c.parse_add_privacy_domain(response).map(|_| Value::Null),
        "delete_privacy_domain" => c.parse_delete_privacy_domain(response).map(|_| Value::Null),
        other => panic!("unknown operation: {other}"),
    }
}

fn run_vectors(raw: &str) {
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let operation = case["operation"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = build(&c, operation, &case["input"]);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.header("Authorization"), Some("bearer vector-token"), "{name}: auth");
        assert!(req.body.is_none(), "{name}: body should be None");

        let expected_query: Vec<(String, String)> = expected_req["query"]
            .as_array()
            .unwrap()
            .iter()
            .map(|q| {
                let pair = q.as_array().unwrap();
                (pair[0].as_str().unwrap().to_string(), pair[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.query, expected_query, "{name}: query");

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result = parse(&c, operation, &response);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "RemoteApi" => assert!(matches!(err, ApiError::RemoteApi { .. }), "{name}: expected RemoteApi, got {err:?}"),
                "MalformedResponse" => assert!(
                    matches!(err, ApiError::MalformedResponse { .. }),
                    "{name}: expected MalformedResponse, got {err:?}"
                ),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
            if let Some(status) = case.get("expected_status") {
                assert_eq!(err.status_code(), status.as_u64().map(|s| s as u16), "{name}: status");
            }
        } else {
            let value = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e:?}"));
            assert_eq!(value, case["expected_result"], "{name}: parsed result");
        }
    }
}

#[test]
fn picture_test_vectors() {
    run_vectors(include_str!("../../test-vectors/pictures.json"));
}

#[test]
fn privacy_domain_test_vectors() {
    run_vectors(include_str!("../../test-vectors/privacy_domains.json"));
}

#[test]
fn embed_preset_test_vectors() {
    run_vectors(include_str!("../../test-vectors/embed_presets.json"));
}
