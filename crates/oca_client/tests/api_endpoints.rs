use std::cell::RefCell;
use std::collections::HashMap;

use oca_client::api::{AlertsFetchOpts, ListFetchOpts, OpsgenieApi};
use oca_client::transport::Transport;
use oca_core::analytics::alert_window_query;
use oca_core::domain::{AlertRecord, Priority};
use oca_core::error::AppError;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use time::macros::datetime;

#[derive(Default)]
struct FakeTransport {
    responses: HashMap<String, Value>,
    gets: RefCell<Vec<String>>,
    posts: RefCell<Vec<(String, Value)>>,
}

impl FakeTransport {
    fn with(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), body);
        self
    }
}

impl Transport for FakeTransport {
    fn get_json(&self, path: &str) -> Result<Value, AppError> {
        self.gets.borrow_mut().push(path.to_string());
        self.responses
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::request_failed(404, "Not Found"))
    }

    fn post_json(&self, path: &str, body: &Value) -> Result<(), AppError> {
        self.posts.borrow_mut().push((path.to_string(), body.clone()));
        Ok(())
    }
}

fn alert_json(id: &str, created: &str, priority: &str) -> Value {
    json!({
        "id": id,
        "tinyId": "1",
        "message": "disk full",
        "status": "open",
        "acknowledged": false,
        "createdAt": created,
        "updatedAt": created,
        "priority": priority,
        "responders": [{"type": "team", "id": "t1"}],
        "ownerTeamId": "t1",
        "tags": ["db"]
    })
}

fn api(transport: FakeTransport) -> OpsgenieApi<FakeTransport> {
    OpsgenieApi::new(transport, "https://acme.app.opsgenie.com/", false)
}

#[test]
fn paginated_alerts_follow_next_links_in_order() {
    let first = "/v2/alerts?limit=100&sort=createdAt&order=desc";
    let transport = FakeTransport::default()
        .with(
            first,
            json!({
                "data": [alert_json("a1", "2024-03-04T10:00:00Z", "P1")],
                "paging": {
                    "first": "https://api.opsgenie.com/v2/alerts?offset=0",
                    "next": "https://api.opsgenie.com/v2/alerts?limit=100&offset=100",
                    "last": "https://api.opsgenie.com/v2/alerts?offset=200"
                }
            }),
        )
        .with(
            "/v2/alerts?limit=100&offset=100",
            json!({
                "data": [
                    alert_json("a2", "2024-03-05T10:00:00.123Z", "P2"),
                    alert_json("a3", "2024-03-06T10:00:00+01:00", "P9")
                ],
                "paging": {
                    "first": "https://api.opsgenie.com/v2/alerts?offset=0",
                    "last": "https://api.opsgenie.com/v2/alerts?offset=200"
                }
            }),
        );
    let api = api(transport);

    let alerts = api
        .get_alert_analytics(&ListFetchOpts {
            limit: Some(100),
            ..ListFetchOpts::default()
        })
        .expect("alerts");

    let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2", "a3"]);
    assert_eq!(alerts[2].priority, Priority::Other("P9".to_string()));
    assert_eq!(alerts[1].created_at, datetime!(2024-03-05 10:00:00.123 UTC));
    assert_eq!(
        *api.transport().gets.borrow(),
        vec![first.to_string(), "/v2/alerts?limit=100&offset=100".to_string()]
    );
}

#[test]
fn list_query_is_encoded_and_defaults_apply() {
    let query = alert_window_query(
        datetime!(1970-01-01 0:00:01 UTC),
        datetime!(1970-01-01 0:00:02 UTC),
    );
    let expected =
        "/v1/incidents?limit=50&sort=createdAt&order=desc&query=createdAt+%3C+2000+AND+createdAt+%3E+1000";
    let transport = FakeTransport::default().with(expected, json!({ "data": [] }));
    let api = api(transport);

    let incidents = api
        .get_incidents(&ListFetchOpts {
            limit: Some(0),
            query: Some(query),
            ..ListFetchOpts::default()
        })
        .expect("incidents");
    assert!(incidents.is_empty());
    assert_eq!(*api.transport().gets.borrow(), vec![expected.to_string()]);
}

#[test]
fn failed_page_aborts_the_whole_fetch() {
    let first = "/v2/alerts?limit=50&sort=createdAt&order=desc";
    let transport = FakeTransport::default().with(
        first,
        json!({
            "data": [alert_json("a1", "2024-03-04T10:00:00Z", "P1")],
            "paging": { "next": "https://api.opsgenie.com/v2/alerts?offset=50" }
        }),
    );
    let err = api(transport)
        .get_alert_analytics(&ListFetchOpts::default())
        .expect_err("second page missing");
    assert_eq!(err.code, "API_REQUEST_FAILED");
    assert_eq!(err.message, "Request failed with 404 Not Found");
}

#[test]
fn malformed_payload_is_a_decode_error() {
    let transport = FakeTransport::default().with("/v2/teams", json!({ "teams": [] }));
    let err = api(transport).get_teams().expect_err("decode");
    assert_eq!(err.code, "API_DECODE_FAILED");
}

#[test]
fn single_page_alerts_teams_and_on_call() {
    let transport = FakeTransport::default()
        .with(
            "/v2/alerts?limit=50",
            json!({ "data": [alert_json("a1", "2024-03-04T10:00:00Z", "P3")] }),
        )
        .with(
            "/v2/teams",
            json!({ "data": [{"id": "t1", "name": "SRE", "description": "site reliability"}] }),
        )
        .with(
            "/v2/schedules",
            json!({ "data": [
                {"id": "s1", "name": "SRE rota", "enabled": true, "ownerTeam": {"id": "t1", "name": "SRE"}},
                {"id": "s2", "name": "Orphan", "enabled": false}
            ]}),
        )
        .with(
            "/v2/schedules/s1/on-calls",
            json!({ "data": { "onCallParticipants": [{"id": "u1", "name": "ada@example.com", "type": "user"}] } }),
        );
    let api = api(transport);

    let alerts = api.get_alerts(&AlertsFetchOpts::default()).expect("alerts");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].tags, vec!["db".to_string()]);

    let teams = api.get_teams().expect("teams");
    assert_eq!(teams[0].name, "SRE");

    let schedules = api.get_schedules_for_team("SRE").expect("schedules");
    let names: Vec<&str> = schedules.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["SRE rota"]);

    let on_call = api.get_on_call("s1").expect("on call");
    assert_eq!(on_call[0].kind, "user");
    assert_eq!(on_call[0].name, "ada@example.com");
}

#[test]
fn alert_actions_post_source_body() {
    let api = api(FakeTransport::default());
    let alert = AlertRecord::new(
        "abc-123",
        datetime!(2024-03-04 10:00 UTC),
        datetime!(2024-03-04 10:05 UTC),
        "P1",
    );

    api.acknowledge_alert(&alert).expect("ack");
    api.close_alert(&alert).expect("close");

    assert_eq!(
        *api.transport().posts.borrow(),
        vec![
            (
                "/v2/alerts/abc-123/acknowledge".to_string(),
                json!({ "source": "Opsgenie analytics" })
            ),
            (
                "/v2/alerts/abc-123/close".to_string(),
                json!({ "source": "Opsgenie analytics" })
            ),
        ]
    );
}

#[test]
fn read_only_mode_rejects_actions_without_requests() {
    let api = OpsgenieApi::new(FakeTransport::default(), "https://acme", true);
    let alert = AlertRecord::new(
        "abc-123",
        datetime!(2024-03-04 10:00 UTC),
        datetime!(2024-03-04 10:05 UTC),
        "P1",
    );

    assert!(api.is_read_only());
    let err = api.acknowledge_alert(&alert).expect_err("read only");
    assert_eq!(err.code, "API_READ_ONLY");
    let err = api.close_alert(&alert).expect_err("read only");
    assert_eq!(err.message, "You can't close an alert in read-only mode.");
    assert!(api.transport().posts.borrow().is_empty());
}

#[test]
fn deep_links_use_the_web_domain() {
    let api = api(FakeTransport::default());
    let alert = AlertRecord::new(
        "abc-123",
        datetime!(2024-03-04 10:00 UTC),
        datetime!(2024-03-04 10:05 UTC),
        "P1",
    );
    assert_eq!(
        api.alert_details_url(&alert),
        "https://acme.app.opsgenie.com/alert/detail/abc-123/details"
    );
    assert_eq!(
        api.user_details_url("u1"),
        "https://acme.app.opsgenie.com/settings/users/u1/detail"
    );
}
