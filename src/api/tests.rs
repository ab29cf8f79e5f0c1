use super::*;
use crate::protocol::ApiResponse;
use std::cell::{Cell, RefCell};

// =========================================================
// Test harness: a client with recording callbacks
// =========================================================

struct TestContext {
    notices: RefCell<Vec<String>>,
    credential_reads: Cell<u32>,
    unauthorized_fires: Cell<u32>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            notices: RefCell::new(Vec::new()),
            credential_reads: Cell::new(0),
            unauthorized_fires: Cell::new(0),
        }
    }
}

fn client(ctx: &Rc<TestContext>) -> ApiClient {
    let creds = ctx.clone();
    let notes = ctx.clone();
    let fires = ctx.clone();
    ApiClient::new(
        "/api/",
        move || {
            creds.credential_reads.set(creds.credential_reads.get() + 1);
            Some("T1".to_string())
        },
        move |message| notes.notices.borrow_mut().push(message.to_string()),
        move || fires.unauthorized_fires.set(fires.unauthorized_fires.get() + 1),
    )
}

// =========================================================
// URL / header construction
// =========================================================

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let ctx = Rc::new(TestContext::new());
    let api = client(&ctx);
    assert_eq!(api.url("/auth/login"), "/api/auth/login");
    assert_eq!(api.url("users"), "/api/users");
}

#[test]
fn bearer_header_value() {
    assert_eq!(bearer("T1"), "Bearer T1");
}

// =========================================================
// Envelope semantics
// =========================================================

#[test]
fn envelope_success_flag_wins() {
    let body: ApiResponse<Value> =
        serde_json::from_str(r#"{"success":true,"message":"操作成功","data":{"x":1}}"#).unwrap();
    assert!(body.is_success());
}

#[test]
fn envelope_code_200_alone_is_success() {
    let body: ApiResponse<Value> = serde_json::from_str(r#"{"code":200,"data":null}"#).unwrap();
    assert!(body.is_success());
}

#[test]
fn envelope_failure_carries_message() {
    let body: ApiResponse<Value> =
        serde_json::from_str(r#"{"success":false,"code":400,"message":"bad input"}"#).unwrap();
    assert!(!body.is_success());
    assert_eq!(body.message.as_deref(), Some("bad input"));
}

#[test]
fn login_payload_parses_from_standard_envelope() {
    let body: ApiResponse<LoginResponse> = serde_json::from_str(
        r#"{"success":true,"code":200,"data":{"token":"T1","userInfo":{"role":"ROLE_ADMIN"}}}"#,
    )
    .unwrap();
    let login = body.data.unwrap();
    assert_eq!(login.token, "T1");
    assert_eq!(
        login.user_info.get("role").and_then(Value::as_str),
        Some("ROLE_ADMIN")
    );
}

// =========================================================
// Notice table
// =========================================================

#[test]
fn status_notices_follow_the_contract() {
    let cases: &[(u16, &str)] = &[
        (401, "登录已过期，请重新登录"),
        (403, "权限不足"),
        (404, "请求的资源不存在"),
        (500, "服务器内部错误"),
    ];
    for (status, expected) in cases {
        let error = ApiError::Status {
            status: *status,
            message: Some("server detail".to_string()),
        };
        assert_eq!(error.notice(), *expected, "status {status}");
    }
}

#[test]
fn unrecognized_status_uses_server_message_or_fallback() {
    let error = ApiError::Status {
        status: 418,
        message: Some("I'm a teapot".to_string()),
    };
    assert_eq!(error.notice(), "I'm a teapot");

    let error = ApiError::Status {
        status: 418,
        message: None,
    };
    assert_eq!(error.notice(), GENERIC_FAILURE);
}

#[test]
fn domain_network_and_request_notices() {
    let error = ApiError::Domain {
        message: "bad input".to_string(),
    };
    assert_eq!(error.notice(), "bad input");

    assert_eq!(
        ApiError::Network("fetch failed".to_string()).notice(),
        "网络连接失败，请检查网络"
    );
    assert_eq!(
        ApiError::Request("no body".to_string()).notice(),
        "请求配置错误"
    );
}

#[test]
fn server_message_only_for_domain_and_status() {
    assert_eq!(
        ApiError::Domain {
            message: "x".to_string()
        }
        .server_message(),
        Some("x")
    );
    assert_eq!(
        ApiError::Status {
            status: 400,
            message: Some("y".to_string())
        }
        .server_message(),
        Some("y")
    );
    assert_eq!(ApiError::Network("z".to_string()).server_message(), None);
    assert_eq!(ApiError::Request("z".to_string()).server_message(), None);
}

// =========================================================
// Failure reporting
// =========================================================

#[test]
fn report_notifies_once_with_the_notice() {
    let ctx = Rc::new(TestContext::new());
    let api = client(&ctx);

    let error = api.report(ApiError::Domain {
        message: "bad input".to_string(),
    });
    assert_eq!(
        error,
        ApiError::Domain {
            message: "bad input".to_string()
        }
    );
    assert_eq!(ctx.notices.borrow().as_slice(), ["bad input"]);
    assert_eq!(ctx.unauthorized_fires.get(), 0);
}

#[test]
fn report_401_fires_unauthorized_exactly_once_per_call() {
    let ctx = Rc::new(TestContext::new());
    let api = client(&ctx);

    api.report(ApiError::Status {
        status: 401,
        message: None,
    });
    assert_eq!(ctx.unauthorized_fires.get(), 1);
    assert_eq!(ctx.notices.borrow().as_slice(), ["登录已过期，请重新登录"]);

    // 每个失败的调用各触发一次；并发调用依赖会话失效本身的幂等性
    api.report(ApiError::Status {
        status: 401,
        message: None,
    });
    assert_eq!(ctx.unauthorized_fires.get(), 2);
}

#[test]
fn report_non_401_statuses_never_fire_unauthorized() {
    let ctx = Rc::new(TestContext::new());
    let api = client(&ctx);

    for status in [400u16, 403, 404, 500, 502] {
        api.report(ApiError::Status {
            status,
            message: None,
        });
    }
    api.report(ApiError::Network("down".to_string()));
    api.report(ApiError::Request("bad".to_string()));

    assert_eq!(ctx.unauthorized_fires.get(), 0);
    assert_eq!(ctx.notices.borrow().len(), 7);
}

#[test]
fn missing_required_data_is_a_reported_domain_failure() {
    let ctx = Rc::new(TestContext::new());
    let api = client(&ctx);

    let success: ApiSuccess<Value> = ApiSuccess {
        data: None,
        message: None,
    };
    let error = api.required(success).unwrap_err();
    assert_eq!(
        error,
        ApiError::Domain {
            message: GENERIC_FAILURE.to_string()
        }
    );
    assert_eq!(ctx.notices.borrow().as_slice(), [GENERIC_FAILURE]);
}
