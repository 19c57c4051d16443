use actix_web::{
  dev::{Service, ServiceResponse},
  http::{header, StatusCode},
  test::{self, TestRequest},
};
use serde_json::{json, Value};

use crate::{http, App};

type Request = actix_http::Request;

async fn send(
  app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
  req: TestRequest,
) -> (StatusCode, Value) {
  let res = test::call_service(app, req.to_request()).await;
  let status = res.status();
  let body = test::read_body(res).await;
  let value = if body.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&body).unwrap()
  };
  (status, value)
}

fn bearer(token: &str) -> (header::HeaderName, String) {
  (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Signs up `test` and returns its access and refresh tokens.
async fn sign_in(
  app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
) -> (String, String) {
  let (status, _) = send(
    app,
    TestRequest::post().uri("/user/signup").set_json(json!({
      "username": "test",
      "email": "test@test.com",
      "password": "test12345",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, body) = send(
    app,
    TestRequest::post().uri("/user/login").set_json(json!({
      "username": "test",
      "password": "test12345",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  (
    body["access"].as_str().unwrap().to_string(),
    body["refresh"].as_str().unwrap().to_string(),
  )
}

async fn create_customer(
  app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
  token: &str,
  name: &str,
) -> Value {
  let (status, body) = send(
    app,
    TestRequest::post()
      .uri("/dashboard/customer")
      .insert_header(bearer(token))
      .set_json(json!({
        "name": name,
        "email": "test@test.com",
        "address": "123 test address",
      })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  body
}

#[actix_web::test]
async fn signup_returns_public_user_fields() {
  let app = test::init_service(http::build(App::for_tests())).await;
  let (status, body) = send(
    &app,
    TestRequest::post().uri("/user/signup").set_json(json!({
      "username": "test",
      "email": "test@test.com",
      "password": "test12345",
    })),
  )
  .await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["username"], "test");
  assert_eq!(body["email"], "test@test.com");
  assert!(body["id"].is_i64());
  assert!(body.get("password").is_none());
}

#[actix_web::test]
async fn signup_reports_every_invalid_field() {
  let app = test::init_service(http::build(App::for_tests())).await;
  let (status, body) = send(
    &app,
    TestRequest::post().uri("/user/signup").set_json(json!({
      "email": "not an email",
      "password": "short",
    })),
  )
  .await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["code"], 6);
  assert_eq!(body["data"]["username"]["_errors"][0], "This field is required.");
  assert_eq!(body["data"]["email"]["_errors"][0], "Enter a valid email address.");
  assert_eq!(
    body["data"]["password"]["_errors"][0],
    "Ensure this field has at least 8 characters."
  );
}

#[actix_web::test]
async fn signup_rejects_taken_username() {
  let app = test::init_service(http::build(App::for_tests())).await;
  sign_in(&app).await;

  let (status, body) = send(
    &app,
    TestRequest::post().uri("/user/signup").set_json(json!({
      "username": "test",
      "email": "other@test.com",
      "password": "test12345",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(
    body["data"]["username"]["_errors"][0],
    "A user with that username already exists."
  );
  assert!(body["data"].get("email").is_none());
}

#[actix_web::test]
async fn login_rejects_wrong_password() {
  let app = test::init_service(http::build(App::for_tests())).await;
  sign_in(&app).await;

  let (status, body) = send(
    &app,
    TestRequest::post().uri("/user/login").set_json(json!({
      "username": "test",
      "password": "wrong-password",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["code"], 4);
  assert!(body.get("access").is_none());
  assert!(body.get("refresh").is_none());

  let (status, body) = send(
    &app,
    TestRequest::post().uri("/user/login").set_json(json!({
      "username": "nobody",
      "password": "test12345",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["code"], 4);
  assert!(body.get("access").is_none());
}

#[actix_web::test]
async fn refresh_hands_out_a_working_access_token() {
  let app = test::init_service(http::build(App::for_tests())).await;
  let (access, refresh) = sign_in(&app).await;

  let (status, body) = send(
    &app,
    TestRequest::post()
      .uri("/user/token/refresh")
      .set_json(json!({ "refresh": refresh })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let renewed = body["access"].as_str().unwrap();

  let (status, _) = send(
    &app,
    TestRequest::get()
      .uri("/user/profile")
      .insert_header(bearer(renewed)),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  // access tokens cannot be used to refresh
  let (status, body) = send(
    &app,
    TestRequest::post()
      .uri("/user/token/refresh")
      .set_json(json!({ "refresh": access })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["code"], 5);
}

#[actix_web::test]
async fn dashboard_requires_authentication() {
  let app = test::init_service(http::build(App::for_tests())).await;

  for req in [
    TestRequest::get().uri("/dashboard/customer"),
    TestRequest::get().uri("/dashboard/payment"),
    TestRequest::get().uri("/user/profile"),
    TestRequest::get()
      .uri("/dashboard/customer")
      .insert_header(bearer("garbage")),
  ] {
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 3);
  }

  // unsupported methods on protected resources ask for credentials first
  for req in [
    TestRequest::put().uri(&format!("/dashboard/payment/{}", uuid::Uuid::new_v4())),
    TestRequest::patch().uri(&format!("/dashboard/payment/{}", uuid::Uuid::new_v4())),
    TestRequest::delete().uri("/dashboard/payment"),
    TestRequest::post().uri("/user/profile"),
  ] {
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 3);
  }

  // the body is never looked at
  let (status, _) = send(
    &app,
    TestRequest::post()
      .uri("/dashboard/payment")
      .set_payload("{ not json"),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn customer_crud() {
  let app = test::init_service(http::build(App::for_tests())).await;
  let (token, _) = sign_in(&app).await;

  let customer = create_customer(&app, &token, "test").await;
  assert_eq!(customer["balance"], "0.00");
  let id = customer["customer_id"].as_str().unwrap();
  assert!(id.starts_with("CUS_"));

  let uri = format!("/dashboard/customer/{id}");
  let (status, body) = send(
    &app,
    TestRequest::patch()
      .uri(&uri)
      .insert_header(bearer(&token))
      .set_json(json!({ "name": "renamed", "balance": "1000.00" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "renamed");
  assert_eq!(body["balance"], "0.00");

  let (status, body) = send(
    &app,
    TestRequest::put()
      .uri(&uri)
      .insert_header(bearer(&token))
      .set_json(json!({ "name": "replaced" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["data"]["email"]["_errors"][0], "This field is required.");

  let (status, _) = send(
    &app,
    TestRequest::delete().uri(&uri).insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, body) = send(
    &app,
    TestRequest::get().uri(&uri).insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["code"], 7);
}

#[actix_web::test]
async fn payments_credit_the_customer_balance() {
  let app = test::init_service(http::build(App::for_tests())).await;
  let (token, _) = sign_in(&app).await;
  let customer = create_customer(&app, &token, "test").await;
  let id = customer["customer_id"].as_str().unwrap();

  for amount in [json!(1000), json!("10.50")] {
    let (status, body) = send(
      &app,
      TestRequest::post()
        .uri("/dashboard/payment")
        .insert_header(bearer(&token))
        .set_json(json!({ "customer": id, "amount": amount })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["customer"], id);
  }

  let (_, body) = send(
    &app,
    TestRequest::get()
      .uri(&format!("/dashboard/customer/{id}"))
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(body["balance"], "1010.50");

  let (status, body) = send(
    &app,
    TestRequest::get()
      .uri(&format!("/dashboard/customer/{id}/payment"))
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 2);
  assert_eq!(body["results"][0]["amount"], "10.50");
  assert_eq!(body["results"][0]["customer"]["customer_id"], id);

  let payment_ref = body["results"][1]["payment_ref"].as_str().unwrap();
  let (status, body) = send(
    &app,
    TestRequest::get()
      .uri(&format!("/dashboard/payment/{payment_ref}"))
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["amount"], "1000.00");
}

#[actix_web::test]
async fn payment_validation_errors() {
  let app = test::init_service(http::build(App::for_tests())).await;
  let (token, _) = sign_in(&app).await;

  let (status, body) = send(
    &app,
    TestRequest::post()
      .uri("/dashboard/payment")
      .insert_header(bearer(&token))
      .set_json(json!({ "customer": "test_id123", "amount": 1000 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(
    body["data"]["customer"]["_errors"][0],
    "Object with customer_id=test_id123 does not exist."
  );

  let customer = create_customer(&app, &token, "test").await;
  let (status, body) = send(
    &app,
    TestRequest::post()
      .uri("/dashboard/payment")
      .insert_header(bearer(&token))
      .set_json(json!({ "customer": customer["customer_id"], "amount": 0.5 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["data"]["amount"]["_errors"].is_array());

  // rejected payments leave neither a record nor a balance change
  let (_, body) = send(
    &app,
    TestRequest::get()
      .uri(&format!("/dashboard/customer/{}", customer["customer_id"].as_str().unwrap()))
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(body["balance"], "0.00");

  let (status, body) = send(
    &app,
    TestRequest::get()
      .uri("/dashboard/payment")
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 0);
  assert_eq!(body["results"], json!([]));
}

#[actix_web::test]
async fn deleting_a_customer_keeps_its_payments() {
  let app = test::init_service(http::build(App::for_tests())).await;
  let (token, _) = sign_in(&app).await;
  let customer = create_customer(&app, &token, "test").await;
  let id = customer["customer_id"].as_str().unwrap();

  let (status, body) = send(
    &app,
    TestRequest::post()
      .uri("/dashboard/payment")
      .insert_header(bearer(&token))
      .set_json(json!({ "customer": id, "amount": "25.00" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let payment_ref = body["payment_ref"].as_str().unwrap().to_string();

  let (status, _) = send(
    &app,
    TestRequest::delete()
      .uri(&format!("/dashboard/customer/{id}"))
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, body) = send(
    &app,
    TestRequest::get()
      .uri(&format!("/dashboard/payment/{payment_ref}"))
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert!(body["customer"].is_null());
  assert_eq!(body["amount"], "25.00");

  let (status, body) = send(
    &app,
    TestRequest::get()
      .uri(&format!("/dashboard/customer/{id}/payment"))
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 0);
  assert_eq!(body["results"], json!([]));

  let (_, body) = send(
    &app,
    TestRequest::get()
      .uri("/dashboard/payment")
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(body["count"], 1);
}

#[actix_web::test]
async fn payments_cannot_be_changed() {
  let app = test::init_service(http::build(App::for_tests())).await;
  let (token, _) = sign_in(&app).await;
  let customer = create_customer(&app, &token, "test").await;

  let (_, body) = send(
    &app,
    TestRequest::post()
      .uri("/dashboard/payment")
      .insert_header(bearer(&token))
      .set_json(json!({ "customer": customer["customer_id"], "amount": 1000 })),
  )
  .await;
  let uri = format!("/dashboard/payment/{}", body["payment_ref"].as_str().unwrap());

  for req in [TestRequest::put().uri(&uri), TestRequest::patch().uri(&uri)] {
    let (status, body) = send(
      &app,
      req
        .insert_header(bearer(&token))
        .set_json(json!({ "amount": "1.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["code"], 8);
  }

  let (_, body) = send(
    &app,
    TestRequest::get().uri(&uri).insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(body["amount"], "1000.00");
}

#[actix_web::test]
async fn unsupported_methods_and_unknown_routes() {
  let app = test::init_service(http::build(App::for_tests())).await;
  let (token, _) = sign_in(&app).await;

  for req in [
    TestRequest::put().uri("/dashboard/payment"),
    TestRequest::delete().uri("/dashboard/payment"),
    TestRequest::post().uri("/user/profile"),
    TestRequest::put().uri("/user/profile"),
  ] {
    let (status, body) = send(&app, req.insert_header(bearer(&token))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["code"], 8);
  }

  let (status, _) = send(
    &app,
    TestRequest::get()
      .uri("/dashboard/payment/not-a-uuid")
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, body) = send(&app, TestRequest::get().uri("/nowhere")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["code"], 7);
}

#[actix_web::test]
async fn openapi_document_is_served() {
  let app = test::init_service(http::build(App::for_tests())).await;
  let (status, body) = send(&app, TestRequest::get().uri("/api-docs/openapi.json")).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body["paths"]["/dashboard/payment"]["post"].is_object());
  assert_eq!(body["components"]["securitySchemes"]["bearer"]["scheme"], "bearer");
}

#[actix_web::test]
async fn customer_listing_is_paginated() {
  let app = test::init_service(http::build(App::for_tests())).await;
  let (token, _) = sign_in(&app).await;
  for n in 0..12 {
    create_customer(&app, &token, &format!("customer {n}")).await;
  }

  let (status, body) = send(
    &app,
    TestRequest::get()
      .uri("/dashboard/customer/")
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 12);
  assert_eq!(body["results"].as_array().unwrap().len(), 10);
  assert!(body["previous"].is_null());
  assert!(body["next"].as_str().unwrap().ends_with("/dashboard/customer?page=2"));

  let (status, body) = send(
    &app,
    TestRequest::get()
      .uri("/dashboard/customer?page=2")
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["results"].as_array().unwrap().len(), 2);
  assert!(body["next"].is_null());
  assert!(body["previous"].as_str().unwrap().ends_with("/dashboard/customer"));

  let (status, _) = send(
    &app,
    TestRequest::get()
      .uri("/dashboard/customer?page=3")
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, body) = send(
    &app,
    TestRequest::get()
      .uri("/dashboard/customer?page=1&page=2")
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["code"], 6);
  assert!(body["message"].is_string());
}

#[actix_web::test]
async fn customer_fields_may_not_be_null() {
  let app = test::init_service(http::build(App::for_tests())).await;
  let (token, _) = sign_in(&app).await;
  let customer = create_customer(&app, &token, "test").await;
  let uri = format!("/dashboard/customer/{}", customer["customer_id"].as_str().unwrap());

  let (status, body) = send(
    &app,
    TestRequest::patch()
      .uri(&uri)
      .insert_header(bearer(&token))
      .set_json(json!({ "name": null })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["code"], 6);
  assert_eq!(body["data"]["name"]["_errors"][0], "This field may not be null.");

  let (_, body) = send(
    &app,
    TestRequest::get().uri(&uri).insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(body["name"], "test");
}

#[actix_web::test]
async fn changed_password_replaces_the_old_one() {
  let app = test::init_service(http::build(App::for_tests())).await;
  let (token, _) = sign_in(&app).await;

  let (status, _) = send(
    &app,
    TestRequest::patch()
      .uri("/user/profile")
      .insert_header(bearer(&token))
      .set_json(json!({ "password": "new-password123" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let login = |password: &str| {
    TestRequest::post().uri("/user/login").set_json(json!({
      "username": "test",
      "password": password,
    }))
  };

  let (status, _) = send(&app, login("test12345")).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let (status, body) = send(&app, login("new-password123")).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body["access"].is_string());
}

#[actix_web::test]
async fn profile_update_and_delete() {
  let app = test::init_service(http::build(App::for_tests())).await;
  let (token, _) = sign_in(&app).await;

  let (status, body) = send(
    &app,
    TestRequest::patch()
      .uri("/user/profile")
      .insert_header(bearer(&token))
      .set_json(json!({ "email": "new@test.com" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["email"], "new@test.com");
  assert_eq!(body["username"], "test");

  let (status, body) = send(
    &app,
    TestRequest::patch()
      .uri("/user/profile")
      .insert_header(bearer(&token))
      .set_json(json!({ "email": null })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["data"]["email"]["_errors"][0], "This field may not be null.");

  let (status, _) = send(
    &app,
    TestRequest::delete()
      .uri("/user/profile")
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  // tokens of deleted users stop working
  let (status, _) = send(
    &app,
    TestRequest::get()
      .uri("/user/profile")
      .insert_header(bearer(&token)),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}
