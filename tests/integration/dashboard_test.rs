//! Integration tests for the role-dependent dashboard.

use ntc_core::error::ErrorKind;
use ntc_core::traits::{Session, SessionStore};
use ntc_core::types::{BusId, TicketId, UserRole};
use ntc_entity::{BusDraft, ReservationStatus};
use ntc_view::dashboard::Dashboard;

use crate::helpers::TestApp;

fn dashboard(app: &TestApp) -> Dashboard {
    Dashboard::new(app.backend.clone(), app.ctx.clone())
}

fn draft(number: &str, capacity: u32) -> BusDraft {
    BusDraft {
        bus_number: number.to_string(),
        capacity,
        route_id: None,
        bus_owner: None,
        bus_permission_number: None,
    }
}

#[tokio::test]
async fn test_commuter_sees_tickets_grouped() {
    let app = TestApp::signed_in(UserRole::Commuter);
    let data = dashboard(&app).load().await.unwrap();

    assert_eq!(data.role(), Some(UserRole::Commuter));
    let tickets: Vec<(&str, Vec<u32>)> = data
        .reservations
        .iter()
        .map(|r| (r.ticket_id.as_str(), r.seat_numbers.clone()))
        .collect();
    assert_eq!(tickets, vec![("TCK-A", vec![1, 2]), ("TCK-X", vec![3])]);
    assert!(data.buses.is_empty());
    assert_eq!(app.backend.calls("list_buses"), 0);
}

#[tokio::test]
async fn test_admin_loads_reservations_and_buses() {
    let app = TestApp::signed_in(UserRole::Admin);
    let data = dashboard(&app).load().await.unwrap();

    assert_eq!(data.buses.len(), 2);
    assert_eq!(data.reservations.len(), 2);
    assert_eq!(app.backend.calls("list_reservations"), 1);
    assert_eq!(app.backend.calls("my_reservations"), 0);
}

#[tokio::test]
async fn test_operator_loads_own_fleet_and_routes() {
    let app = TestApp::signed_in(UserRole::Operator);
    let data = dashboard(&app).load().await.unwrap();

    let numbers: Vec<&str> = data.buses.iter().map(|b| b.bus_number.as_str()).collect();
    assert_eq!(numbers, vec!["NB-1234"]);
    assert_eq!(data.routes.len(), 3);
}

#[tokio::test]
async fn test_profile_failure_redirects_to_login() {
    let app = TestApp::signed_in(UserRole::Commuter);
    app.session.save(Session::new("stale", "commuter")).unwrap();

    let err = dashboard(&app).load().await.unwrap_err();
    assert!(err.is(ErrorKind::Unauthorized));
    assert_eq!(app.recorder.paths(), vec!["/login"]);
    assert_eq!(app.backend.calls("my_reservations"), 0);
}

#[tokio::test]
async fn test_cancel_ticket_refreshes_list() {
    let app = TestApp::signed_in(UserRole::Commuter);
    let view = dashboard(&app);
    view.load().await.unwrap();

    view.cancel_ticket(&TicketId::new("TCK-A")).await.unwrap();

    assert!(
        app.backend
            .ticket_rows("TCK-A")
            .iter()
            .all(|r| r.status == ReservationStatus::Cancelled)
    );
    let ticket = view
        .data()
        .reservations
        .into_iter()
        .find(|r| r.ticket_id.as_str() == "TCK-A")
        .unwrap();
    assert_eq!(ticket.status, ReservationStatus::Cancelled);
    assert_eq!(app.recorder.infos(), vec!["Reservation cancelled"]);
    assert_eq!(app.backend.calls("my_reservations"), 2);
}

#[tokio::test]
async fn test_cancelled_ticket_cannot_be_cancelled_again() {
    let app = TestApp::signed_in(UserRole::Commuter);
    let view = dashboard(&app);
    view.load().await.unwrap();

    let err = view.cancel_ticket(&TicketId::new("TCK-X")).await.unwrap_err();
    assert!(err.is(ErrorKind::Validation));
    assert_eq!(app.backend.calls("cancel_ticket"), 0);

    let err = view.cancel_ticket(&TicketId::new("TCK-?")).await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_operator_bus_actions_notify_and_refresh() {
    let app = TestApp::signed_in(UserRole::Operator);
    let view = dashboard(&app);
    view.load().await.unwrap();

    view.add_bus(&draft("NB-5555", 30)).await.unwrap();
    assert_eq!(app.recorder.infos(), vec!["Bus added successfully!"]);
    assert_eq!(view.data().buses.len(), 2);

    let err = view.add_bus(&draft("NB-5555", 30)).await.unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
    assert_eq!(app.recorder.errors(), vec!["Bus number already registered"]);

    view.delete_bus(&BusId::new("b1")).await.unwrap();
    assert_eq!(view.data().buses.len(), 1);
}

#[tokio::test]
async fn test_invalid_bus_draft_is_not_sent() {
    let app = TestApp::signed_in(UserRole::Operator);
    let view = dashboard(&app);

    let err = view.add_bus(&draft("NB-0", 0)).await.unwrap_err();
    assert!(err.is(ErrorKind::Validation));
    assert_eq!(app.backend.calls("create_bus"), 0);
    assert_eq!(app.recorder.errors().len(), 1);
}
