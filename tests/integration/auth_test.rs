//! Integration tests for authentication flow.

use ntc_core::error::ErrorKind;
use ntc_core::traits::SessionStore;
use ntc_core::types::UserRole;
use ntc_entity::Registration;
use ntc_view::auth::AuthView;

use crate::helpers::{OPERATOR_TOKEN, TestApp};

fn auth(app: &TestApp) -> AuthView {
    AuthView::new(app.backend.clone(), app.ctx.clone())
}

fn registration(email: &str, password: &str) -> Registration {
    Registration {
        name: "Sunil Fernando".into(),
        email: email.into(),
        password: password.into(),
        phone_number: "0719876543".into(),
        role: UserRole::Commuter,
    }
}

#[tokio::test]
async fn test_login_success_stores_session_and_lands_by_role() {
    let app = TestApp::anonymous();

    let session = auth(&app).login("u-o@ntc.lk", "secret123").await.unwrap();

    assert_eq!(session.token, OPERATOR_TOKEN);
    assert_eq!(app.session.token().as_deref(), Some(OPERATOR_TOKEN));
    assert_eq!(app.session.role(), Some(UserRole::Operator));
    assert_eq!(app.recorder.paths(), vec!["/dashboard"]);
}

#[tokio::test]
async fn test_commuter_lands_on_home() {
    let app = TestApp::anonymous();
    auth(&app).login(" u-c@ntc.lk ", "secret123").await.unwrap();
    assert_eq!(app.recorder.paths(), vec!["/"]);
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::anonymous();

    let err = auth(&app).login("u-c@ntc.lk", "wrong").await.unwrap_err();

    assert!(err.is(ErrorKind::Unauthorized));
    assert!(app.session.current().is_none());
    assert_eq!(app.recorder.errors(), vec!["Invalid email or password"]);
    assert!(app.recorder.paths().is_empty());
}

#[tokio::test]
async fn test_login_rejects_blank_fields_locally() {
    let app = TestApp::anonymous();

    let err = auth(&app).login("", "secret123").await.unwrap_err();
    assert!(err.is(ErrorKind::Validation));
    let err = auth(&app).login("not-an-email", "secret123").await.unwrap_err();
    assert!(err.is(ErrorKind::Validation));
    assert_eq!(app.backend.calls("login"), 0);
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::anonymous();
    let view = auth(&app);

    view.register(&registration("sunil@ntc.lk", "hunter22"))
        .await
        .unwrap();
    assert_eq!(app.recorder.infos(), vec!["User registered successfully"]);
    assert_eq!(app.recorder.paths(), vec!["/login"]);

    view.login("sunil@ntc.lk", "hunter22").await.unwrap();
    assert_eq!(app.session.role(), Some(UserRole::Commuter));
}

#[tokio::test]
async fn test_register_validation_and_duplicates() {
    let app = TestApp::anonymous();
    let view = auth(&app);

    let err = view
        .register(&registration("sunil@ntc.lk", "123"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));
    assert_eq!(app.backend.calls("register"), 0);

    let err = view
        .register(&registration("u-c@ntc.lk", "hunter22"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
    assert_eq!(app.recorder.errors().last().unwrap(), "User already exists");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = TestApp::signed_in(UserRole::Admin);

    auth(&app).logout().unwrap();

    assert!(app.session.current().is_none());
    assert_eq!(app.recorder.paths(), vec!["/login"]);
}

#[tokio::test]
async fn test_current_user() {
    let app = TestApp::signed_in(UserRole::Operator);
    let user = auth(&app).current_user().await.unwrap();
    assert_eq!(user.name, "Kamal Silva");
    assert_eq!(user.role, UserRole::Operator);
}
