use std::sync::Arc;

use pat_config::{Credentials, RestConfig};
use pat_core::{
    AuthMode, RequestBody, ScriptedTransport, WorkflowError, transport::scripted::ScriptedReply,
};
use pat_workflows::RestContext;
use serde_json::json;
use tests_workflows::{
    API, APP_URL, APPS_URL, BITS_URL, INSTANCES_URL, LOGIN_SERVER, SPACE_GUID, TOKEN, TOKEN_URL,
    pushable_platform, space_url, targetable_platform, test_config, test_package,
};

type Context = RestContext<Arc<ScriptedTransport>>;

fn context(transport: &Arc<ScriptedTransport>, config: RestConfig) -> Context {
    RestContext::new(Arc::clone(transport), config, test_package())
}

fn password_config() -> RestConfig {
    test_config()
        .with_space("thespace")
        .with_credentials(Credentials::new("foo", "bar"))
}

async fn logged_in(transport: &Arc<ScriptedTransport>) -> Context {
    let mut ctx = context(transport, test_config());
    ctx.target(API).await.expect("target succeeds");
    ctx.login().await.expect("login succeeds");
    ctx
}

#[tokio::test]
async fn target_stores_the_authorization_endpoint() {
    let transport = targetable_platform();
    let mut ctx = context(&transport, test_config());

    ctx.target(API).await.expect("target succeeds");

    assert_eq!(ctx.login_server_url(), LOGIN_SERVER);
    let call = transport
        .call("GET", "APISERVER/v2/info")
        .expect("info requested");
    assert_eq!(call.auth, AuthMode::None);
}

#[tokio::test]
async fn target_twice_yields_the_same_login_server() {
    let transport = targetable_platform();
    let mut ctx = context(&transport, test_config());

    ctx.target(API).await.expect("first target");
    let first = ctx.login_server_url().to_owned();
    ctx.target(API).await.expect("second target");

    assert_eq!(ctx.login_server_url(), first);
    assert_eq!(transport.count("GET", "APISERVER/v2/info"), 2);
}

#[tokio::test]
async fn target_fails_when_the_platform_rejects_it() {
    let transport = Arc::new(ScriptedTransport::new());
    let mut ctx = context(&transport, test_config());

    let err = ctx.target(API).await.expect_err("info is unscripted");

    assert!(matches!(err, WorkflowError::Rejected { status: 400, .. }));
    assert!(ctx.login_server_url().is_empty());
}

#[tokio::test]
async fn target_fails_without_a_response() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.reply(
        "APISERVER/v2/info",
        ScriptedReply::unreachable("connection refused"),
    );
    let mut ctx = context(&transport, test_config());

    let err = ctx.target(API).await.expect_err("no response");

    assert!(matches!(err, WorkflowError::Transport { .. }));
    assert!(!err.is_app_failure());
}

#[tokio::test]
async fn login_before_target_fails() {
    let transport = pushable_platform("dev");
    let mut ctx = context(&transport, test_config());

    let err = ctx.login().await.expect_err("not targeted");

    assert_eq!(err, WorkflowError::NotTargeted);
    assert!(err.is_not_ready());
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn implicit_login_calls_the_authorization_endpoint_without_a_grant() {
    let transport = pushable_platform("dev");
    let ctx = logged_in(&transport).await;

    let call = transport.call("POST", TOKEN_URL).expect("token requested");
    assert_eq!(call.auth, AuthMode::Bearer(String::new()));
    assert_eq!(call.body.form_value("grant_type"), None);
    assert_eq!(transport.count("POST(uaa)", TOKEN_URL), 0);
    assert_eq!(ctx.access_token(), TOKEN);
    assert_eq!(ctx.space_guid(), SPACE_GUID);
}

#[tokio::test]
async fn implicit_relogin_does_not_resend_the_previous_token() {
    let transport = pushable_platform("dev");
    let mut ctx = logged_in(&transport).await;
    assert_eq!(ctx.access_token(), TOKEN);

    ctx.login().await.expect("second login succeeds");

    assert_eq!(transport.count("POST", TOKEN_URL), 2);
    let call = transport.call("POST", TOKEN_URL).expect("token requested");
    assert_eq!(call.auth, AuthMode::Bearer(String::new()));
    assert_eq!(call.body, RequestBody::Empty);
}

#[tokio::test]
async fn password_login_posts_the_grant_form() {
    let transport = pushable_platform("thespace");
    let mut ctx = context(&transport, password_config());
    ctx.target(API).await.expect("target succeeds");

    ctx.login().await.expect("login succeeds");

    let call = transport
        .call("POST(uaa)", TOKEN_URL)
        .expect("token requested from the login server");
    assert_eq!(call.auth, AuthMode::LoginServer);
    assert_eq!(call.body.form_value("grant_type"), Some("password"));
    assert_eq!(call.body.form_value("username"), Some("foo"));
    assert_eq!(call.body.form_value("password"), Some("bar"));
    assert_eq!(call.body.form_value("scope"), Some(""));

    let space = transport
        .call("GET", &space_url("thespace"))
        .expect("space looked up");
    assert_eq!(space.auth, AuthMode::Bearer(TOKEN.into()));
}

#[tokio::test]
async fn login_fails_when_the_space_does_not_exist() {
    let transport = pushable_platform("thespace");
    transport.clear(&space_url("thespace"));
    let mut ctx = context(&transport, password_config());
    ctx.target(API).await.expect("target succeeds");

    let err = ctx.login().await.expect_err("space lookup rejected");

    assert!(matches!(err, WorkflowError::Rejected { status: 400, .. }));
    assert!(ctx.access_token().is_empty());
}

#[tokio::test]
async fn login_fails_when_the_space_lookup_is_empty() {
    let transport = pushable_platform("thespace");
    transport.reply_json(space_url("thespace"), &json!({"resources": []}));
    let mut ctx = context(&transport, password_config());
    ctx.target(API).await.expect("target succeeds");

    let err = ctx.login().await.expect_err("no such space");

    assert_eq!(
        err,
        WorkflowError::SpaceNotFound {
            space: "thespace".into()
        }
    );
    assert!(ctx.access_token().is_empty());
    assert!(ctx.space_guid().is_empty());
}

#[tokio::test]
async fn login_fails_when_the_token_request_is_rejected() {
    let transport = pushable_platform("thespace");
    transport.clear(TOKEN_URL);
    let mut ctx = context(&transport, password_config());
    ctx.target(API).await.expect("target succeeds");

    let err = ctx.login().await.expect_err("token rejected");

    assert!(matches!(
        err,
        WorkflowError::Rejected { ref url, status: 400, .. } if url == TOKEN_URL
    ));
    assert_eq!(transport.count("GET", &space_url("thespace")), 0);
}

#[tokio::test]
async fn push_before_login_fails() {
    let transport = pushable_platform("dev");
    let mut ctx = context(&transport, test_config());
    ctx.target(API).await.expect("target succeeds");
    transport.reset_calls();

    let err = ctx.push().await.expect_err("not logged in");

    assert_eq!(err, WorkflowError::NotLoggedIn);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn push_creates_uploads_and_starts_in_order() {
    let transport = pushable_platform("dev");
    let ctx = logged_in(&transport).await;
    transport.reset_calls();

    let app = ctx.push().await.expect("push succeeds");

    assert_eq!(app.url, APP_URL);
    assert_eq!(app.polls, 1);
    assert_eq!(
        transport.call_log(),
        [
            ("POST", APPS_URL.to_owned()),
            ("PUT(multipart)", BITS_URL.to_owned()),
            ("PUT", APP_URL.to_owned()),
            ("GET", INSTANCES_URL.to_owned()),
        ]
    );
    assert!(
        transport
            .calls()
            .iter()
            .all(|call| call.auth == AuthMode::Bearer(TOKEN.into()))
    );
}

#[tokio::test]
async fn push_posts_a_random_name_in_the_resolved_space() {
    let transport = pushable_platform("dev");
    let ctx = logged_in(&transport).await;

    let app = ctx.push().await.expect("push succeeds");

    let body = transport
        .call("POST", APPS_URL)
        .expect("app created")
        .body;
    let body = body.as_json().expect("json body");
    assert_eq!(body["space_guid"], SPACE_GUID);
    assert_eq!(body["name"], app.name.as_str());

    let again = ctx.push().await.expect("second push succeeds");
    assert_ne!(again.name, app.name);
}

#[tokio::test]
async fn push_uploads_bits_and_requests_start() {
    let transport = pushable_platform("dev");
    let ctx = logged_in(&transport).await;

    ctx.push().await.expect("push succeeds");

    let upload = transport
        .call("PUT(multipart)", BITS_URL)
        .expect("bits uploaded");
    let RequestBody::Multipart(multipart) = upload.body else {
        panic!("bits must be uploaded as multipart");
    };
    assert_eq!(&*multipart.file.bytes, test_package().bytes());

    let start = transport.call("PUT", APP_URL).expect("start requested");
    assert_eq!(start.body.as_json(), Some(&json!({"state": "STARTED"})));
}

#[tokio::test]
async fn push_accepts_any_success_payload_from_instances() {
    let transport = pushable_platform("dev");
    transport.reply_json(INSTANCES_URL, &"foo");
    let ctx = logged_in(&transport).await;

    ctx.push().await.expect("a 200 means the app started");
}

#[tokio::test]
async fn push_fails_when_creation_has_no_location() {
    let transport = pushable_platform("dev");
    transport.reply_json(APPS_URL, &json!({}));
    let ctx = logged_in(&transport).await;

    let err = ctx.push().await.expect_err("no location");

    assert_eq!(
        err,
        WorkflowError::MissingLocation {
            url: APPS_URL.into(),
            status: 200
        }
    );
    assert_eq!(transport.count("PUT(multipart)", BITS_URL), 0);
}

#[tokio::test]
async fn push_stops_when_the_upload_is_rejected() {
    let transport = pushable_platform("dev");
    transport.clear(BITS_URL);
    let ctx = logged_in(&transport).await;

    let err = ctx.push().await.expect_err("upload rejected");

    assert!(matches!(
        err,
        WorkflowError::Rejected { ref url, .. } if url == BITS_URL
    ));
    assert_eq!(transport.count("PUT", APP_URL), 0);
    assert_eq!(transport.count("GET", INSTANCES_URL), 0);
}

#[tokio::test(start_paused = true)]
async fn push_reports_apps_that_never_stage() {
    let transport = pushable_platform("dev");
    transport.reply(
        INSTANCES_URL,
        ScriptedReply::status(
            400,
            "400 Bad Request",
            Some(json!({
                "code": 170002,
                "description": "App has not finished staging",
                "error_code": "CF-NotStaged"
            })),
        ),
    );
    let ctx = logged_in(&transport).await;

    let err = ctx.push().await.expect_err("never staged");

    assert_eq!(
        err,
        WorkflowError::NotStaged {
            app_url: APP_URL.into(),
            attempts: 5
        }
    );
    assert!(err.is_app_failure());
}
