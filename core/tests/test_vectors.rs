//! Verify request building and response validation against the JSON test
//! vectors stored in `test-vectors/`.
//!
//! Bodies are compared as parsed JSON, not raw strings, so field ordering
//! does not produce false negatives.

use pingdom_core::{validate_response, ApiError, Client, ClientConfig, ClientError, HttpResponse};

fn client(base_url: &str) -> Client {
    let config = ClientConfig::with_token("my_api_key").base_url(base_url);
    Client::with_env(config, pingdom_core::UreqTransport::new(), |_| None).unwrap()
}

fn headers(value: &serde_json::Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let c = client(case["base_url"].as_str().unwrap());
        let method = case["method"].as_str().unwrap();
        let path = case["path"].as_str().unwrap();

        let result = match case.get("body") {
            Some(body) => c.new_request_with_body(method, path, body),
            None => c.new_request(method, path),
        };

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "InvalidRequest" => assert!(matches!(err, ClientError::InvalidRequest(_)), "{name}: {err:?}"),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
            continue;
        }

        let req = result.unwrap();
        let expected = &case["expected_request"];
        assert_eq!(req.method.as_str(), expected["method"].as_str().unwrap(), "{name}: method");
        assert_eq!(req.method.as_str(), method, "{name}: method verbatim");
        assert_eq!(req.url.as_str(), expected["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(req.headers, headers(&expected["headers"]), "{name}: headers");

        match req.body.as_deref() {
            Some(body) => {
                let sent: serde_json::Value = serde_json::from_str(body).unwrap();
                assert_eq!(sent, expected["body"], "{name}: body");
            }
            None => assert!(expected["body"].is_null(), "{name}: body should be None"),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn validate_test_vectors() {
    let raw = include_str!("../../test-vectors/validate.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result = validate_response(&response);

        match case.get("expected_error") {
            Some(expected) => {
                let expected: ApiError = serde_json::from_value(expected.clone()).unwrap();
                let err = result.unwrap_err();
                assert_eq!(err.api_error(), Some(&expected), "{name}");
            }
            None => assert!(result.is_ok(), "{name}: expected success"),
        }
    }
}
