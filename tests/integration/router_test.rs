//! Integration tests for route guarding after sign-in.

use ntc_core::types::{TripId, UserRole};
use ntc_view::auth::AuthView;
use ntc_view::{Resolution, Router, Screen};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_guard_follows_session_changes() {
    let app = TestApp::anonymous();
    let router = Router::new(app.session.clone());
    let auth = AuthView::new(app.backend.clone(), app.ctx.clone());

    assert_eq!(router.resolve("/dashboard"), Resolution::Redirect("/login"));

    auth.login("u-o@ntc.lk", "secret123").await.unwrap();
    assert_eq!(router.landing_path(), "/dashboard");
    assert_eq!(router.resolve("/buses"), Resolution::Render(Screen::Buses));
    assert_eq!(router.resolve("/users"), Resolution::Redirect("/dashboard"));
    assert_eq!(
        router.resolve("/buslayout/t1"),
        Resolution::Render(Screen::BusLayout(TripId::new("t1")))
    );

    auth.logout().unwrap();
    assert_eq!(router.resolve("/buses"), Resolution::Redirect("/login"));
}

#[tokio::test]
async fn test_admin_reaches_every_screen() {
    let app = TestApp::signed_in(UserRole::Admin);
    let router = Router::new(app.session.clone());

    for path in [
        "/",
        "/dashboard",
        "/buses",
        "/routes",
        "/tripmanagement",
        "/users",
        "/reservations",
    ] {
        assert!(
            matches!(router.resolve(path), Resolution::Render(_)),
            "{path} should render"
        );
    }
    assert_eq!(router.resolve("/dashboardpage"), Resolution::Redirect("/"));
}
