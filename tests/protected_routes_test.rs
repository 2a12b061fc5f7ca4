mod common;

use actix_web::{http::StatusCode, test};
use serde_json::Value;
use trip_planner_api::middleware::auth::decode_claims;

use common::{bearer, expired_token_for, token_for, TestApp, JWT_SECRET, OWNER_ID};

#[::core::prelude::v1::test]
fn test_claims_round_trip() {
    let claims = decode_claims(&token_for(OWNER_ID), JWT_SECRET).unwrap();
    assert_eq!(claims.user_id, OWNER_ID);
    assert!(decode_claims(&token_for(OWNER_ID), "another-secret").is_err());
    assert!(decode_claims(&expired_token_for(OWNER_ID), JWT_SECRET).is_err());
}

#[actix_rt::test]
async fn test_my_trip_requires_token() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/v1/trip/my").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["message"], "No token provided");

    for header in [
        bearer(&expired_token_for(OWNER_ID)),
        bearer("not.a.jwt"),
        ("Authorization", "Basic dXNlcjpwYXNz".to_string()),
    ] {
        let req = test::TestRequest::delete()
            .uri("/api/v1/trip/my")
            .insert_header(header)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_rt::test]
async fn test_invite_routes_require_token() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    for uri in ["/api/v1/trip/invites", "/api/v1/trip/invited"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_rt::test]
async fn test_public_routes_need_no_token() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    for uri in ["/health", "/api/v1/feedback"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}
