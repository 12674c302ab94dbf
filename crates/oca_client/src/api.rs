use oca_core::domain::{AlertRecord, Incident, OnCallParticipantRef, Schedule, Team};
use oca_core::error::{AppError, API_DECODE_FAILED, API_INVALID_URL, API_READ_ONLY};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use url::form_urlencoded;
use url::Url;

use crate::config::ClientConfig;
use crate::transport::ureq_transport::UreqTransport;
use crate::transport::Transport;

pub const DEFAULT_LIMIT: u32 = 50;
pub const DEFAULT_SORT: &str = "createdAt";
pub const DEFAULT_ORDER: &str = "desc";
pub const ACTION_SOURCE: &str = "Opsgenie analytics";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertsFetchOpts {
    pub limit: Option<u32>,
    pub query: Option<String>,
}

/// Options for the paginated list endpoints (alerts for analytics, incidents).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFetchOpts {
    pub limit: Option<u32>,
    pub query: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DataResponse<R> {
    data: R,
}

#[derive(Debug, Deserialize)]
struct PagedResponse<R> {
    data: Vec<R>,
    #[serde(default)]
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OnCallData {
    on_call_participants: Vec<OnCallParticipantRef>,
}

fn effective_limit(limit: Option<u32>) -> u32 {
    limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn list_path(endpoint: &str, opts: &ListFetchOpts) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("limit", &effective_limit(opts.limit).to_string());
    query.append_pair("sort", non_empty(&opts.sort).unwrap_or(DEFAULT_SORT));
    query.append_pair("order", non_empty(&opts.order).unwrap_or(DEFAULT_ORDER));
    if let Some(q) = non_empty(&opts.query) {
        query.append_pair("query", q);
    }
    format!("{endpoint}?{}", query.finish())
}

/// Path and query of an absolute `paging.next` link, to be replayed against the configured API URL.
pub fn next_page_path(next: &str) -> Result<String, AppError> {
    let url = Url::parse(next).map_err(|e| {
        AppError::new(API_INVALID_URL, "Invalid pagination link")
            .with_details(format!("next={next}; err={e}"))
    })?;
    Ok(match url.query() {
        Some(q) => format!("{}?{q}", url.path()),
        None => url.path().to_string(),
    })
}

/// Client for the alerting service REST API.
///
/// Stateless apart from configuration: every call is a fresh request (or chain of page requests)
/// and the first failure is returned as-is.
#[derive(Debug, Clone)]
pub struct OpsgenieApi<T> {
    transport: T,
    domain: String,
    read_only: bool,
}

impl OpsgenieApi<UreqTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, AppError> {
        let transport = UreqTransport::new(config)?;
        Ok(Self::new(transport, &config.domain, config.read_only))
    }
}

impl<T: Transport> OpsgenieApi<T> {
    pub fn new(transport: T, domain: &str, read_only: bool) -> Self {
        Self {
            transport,
            domain: domain.trim_end_matches('/').to_string(),
            read_only,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, AppError> {
        let value = self.transport.get_json(path)?;
        serde_json::from_value(value).map_err(|e| {
            AppError::new(API_DECODE_FAILED, "Unexpected alerting service payload")
                .with_details(format!("path={path}; err={e}"))
        })
    }

    /// Follow `paging.next` until it is absent, concatenating page data in arrival order.
    fn get_all_pages<R: DeserializeOwned>(&self, first_path: String) -> Result<Vec<R>, AppError> {
        let mut path = first_path;
        let mut items = Vec::new();
        let mut pages = 0usize;
        loop {
            let page: PagedResponse<R> = self.get(&path)?;
            pages += 1;
            debug!(path = %path, page = pages, count = page.data.len(), "fetched page");
            items.extend(page.data);
            match page.paging.and_then(|p| p.next) {
                Some(next) => path = next_page_path(&next)?,
                None => break,
            }
        }
        info!(pages, count = items.len(), "paginated fetch complete");
        Ok(items)
    }

    /// A single page of alerts.
    pub fn get_alerts(&self, opts: &AlertsFetchOpts) -> Result<Vec<AlertRecord>, AppError> {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("limit", &effective_limit(opts.limit).to_string());
        if let Some(q) = non_empty(&opts.query) {
            query.append_pair("query", q);
        }
        let response: DataResponse<Vec<AlertRecord>> =
            self.get(&format!("/v2/alerts?{}", query.finish()))?;
        Ok(response.data)
    }

    /// Every alert matching `opts`, across all pages. This is the input of the analytics views.
    pub fn get_alert_analytics(&self, opts: &ListFetchOpts) -> Result<Vec<AlertRecord>, AppError> {
        self.get_all_pages(list_path("/v2/alerts", opts))
    }

    pub fn get_incidents(&self, opts: &ListFetchOpts) -> Result<Vec<Incident>, AppError> {
        self.get_all_pages(list_path("/v1/incidents", opts))
    }

    pub fn get_teams(&self) -> Result<Vec<Team>, AppError> {
        let response: DataResponse<Vec<Team>> = self.get("/v2/teams")?;
        Ok(response.data)
    }

    pub fn get_schedules(&self) -> Result<Vec<Schedule>, AppError> {
        let response: DataResponse<Vec<Schedule>> = self.get("/v2/schedules")?;
        Ok(response.data)
    }

    pub fn get_schedules_for_team(&self, team_name: &str) -> Result<Vec<Schedule>, AppError> {
        Ok(self
            .get_schedules()?
            .into_iter()
            .filter(|s| s.owner_team.as_ref().is_some_and(|t| t.name == team_name))
            .collect())
    }

    pub fn get_on_call(&self, schedule_id: &str) -> Result<Vec<OnCallParticipantRef>, AppError> {
        let response: DataResponse<OnCallData> =
            self.get(&format!("/v2/schedules/{schedule_id}/on-calls"))?;
        Ok(response.data.on_call_participants)
    }

    pub fn acknowledge_alert(&self, alert: &AlertRecord) -> Result<(), AppError> {
        self.alert_action(alert, "acknowledge")
    }

    pub fn close_alert(&self, alert: &AlertRecord) -> Result<(), AppError> {
        self.alert_action(alert, "close")
    }

    fn alert_action(&self, alert: &AlertRecord, action: &str) -> Result<(), AppError> {
        if self.read_only {
            return Err(AppError::new(
                API_READ_ONLY,
                format!("You can't {action} an alert in read-only mode."),
            )
            .with_details(format!("alert_id={}", alert.id)));
        }
        self.transport.post_json(
            &format!("/v2/alerts/{}/{action}", alert.id),
            &json!({ "source": ACTION_SOURCE }),
        )
    }

    pub fn alert_details_url(&self, alert: &AlertRecord) -> String {
        format!("{}/alert/detail/{}/details", self.domain, alert.id)
    }

    pub fn incident_details_url(&self, incident: &Incident) -> String {
        format!("{}/incident/detail/{}", self.domain, incident.id)
    }

    pub fn user_details_url(&self, user_id: &str) -> String {
        format!("{}/settings/users/{user_id}/detail", self.domain)
    }
}
