//! `reqwest`-backed implementation of [`TimetableApi`].
//!
//! Every response goes through [`HttpTimetableApi::send`], which owns the
//! status-code policy:
//!
//! | Response | Result |
//! |----------|--------|
//! | transport failure | `Remote` without status, fallback message |
//! | 401 | `AuthExpired`, and the shared [`AuthContext`] is signed out |
//! | 403 | `Forbidden` |
//! | other non-2xx | `Remote` with the body's message or the fallback |
//! | 2xx with `success: false` | `Remote` with the envelope's message |

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, instrument, warn};

use educonnect_auth::AuthContext;
use educonnect_config::{ApiConfig, QueryDateFormat};
use educonnect_core::serde::{format_iso_date, format_us_date};
use educonnect_core::{ClientError, ClientResult, Operation};
use educonnect_models::{
    ApiResponse, ClassOption, CreateSessionDto, DaySchedule, Period, Session, SessionId,
    SessionQuery, SubjectOption, TeacherOption, UpdateSessionDto, extract_error_message,
};

use super::{Created, TimetableApi};

#[derive(Debug, Clone)]
pub struct HttpTimetableApi {
    client: Client,
    config: ApiConfig,
    auth: AuthContext,
}

impl HttpTimetableApi {
    /// Build a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Fails only if the TLS backend cannot be initialised.
    pub fn new(config: ApiConfig, auth: AuthContext) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            config,
            auth,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, self.config.endpoint(path));
        match self.auth.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn query_date(&self, date: chrono::NaiveDate) -> String {
        match self.config.query_date_format {
            QueryDateFormat::Iso => format_iso_date(date),
            QueryDateFormat::Us => format_us_date(date),
        }
    }

    /// Send `request` and unwrap the `{success, message, data}` envelope.
    async fn send<T>(&self, operation: Operation, request: RequestBuilder) -> ClientResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            error!(operation = %operation, error = %e, "request failed");
            ClientError::remote(operation, None, None)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(operation = %operation, status = status.as_u16(), error = %e, "failed to read response body");
            ClientError::remote(operation, Some(status.as_u16()), None)
        })?;

        if status == StatusCode::UNAUTHORIZED {
            warn!(operation = %operation, "access token rejected, signing out");
            self.auth.sign_out();
            return Err(ClientError::AuthExpired);
        }

        if status == StatusCode::FORBIDDEN {
            warn!(operation = %operation, "request forbidden");
            return Err(ClientError::forbidden(
                extract_error_message(&body)
                    .unwrap_or_else(|| "You do not have permission to do that".to_string()),
            ));
        }

        if !status.is_success() {
            warn!(operation = %operation, status = status.as_u16(), "request rejected");
            return Err(ClientError::remote(
                operation,
                Some(status.as_u16()),
                extract_error_message(&body),
            ));
        }

        if body.trim().is_empty() {
            return Ok(ApiResponse {
                success: true,
                message: None,
                data: None,
            });
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            error!(operation = %operation, error = %e, "malformed response body");
            ClientError::remote(operation, Some(status.as_u16()), None)
        })?;

        if !envelope.success {
            warn!(operation = %operation, server_message = ?envelope.message, "request unsuccessful");
            return Err(ClientError::remote(
                operation,
                Some(status.as_u16()),
                envelope.message,
            ));
        }

        Ok(envelope)
    }

    async fn fetch_list<T>(&self, operation: Operation, path: &str) -> ClientResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let envelope = self.send::<Vec<T>>(operation, self.request(Method::GET, path)).await?;
        Ok(envelope.data.unwrap_or_default())
    }
}

/// Interpret the `data` of a create response.
fn created_from(data: Option<Value>) -> Created {
    let Some(data) = data else {
        return Created::Acknowledged;
    };

    if let Ok(session) = serde_json::from_value::<Session>(data.clone()) {
        return Created::Session(session);
    }

    let id = match &data {
        Value::String(raw) => raw.parse().ok(),
        Value::Object(map) => map
            .get("sessionId")
            .or_else(|| map.get("id"))
            .and_then(Value::as_str)
            .and_then(|raw| raw.parse().ok()),
        _ => None,
    };

    id.map(Created::Id).unwrap_or(Created::Acknowledged)
}

#[async_trait]
impl TimetableApi for HttpTimetableApi {
    #[instrument(skip(self), fields(mode = query.target.mode(), target = %query.target.id()))]
    async fn fetch_sessions(&self, query: &SessionQuery) -> ClientResult<Vec<DaySchedule>> {
        let operation = Operation::FetchSessions;
        let request = self.request(Method::GET, "sessions").query(&[
            ("target", query.target.id().to_string()),
            ("mode", query.target.mode().to_string()),
            ("from", self.query_date(query.from)),
            ("to", self.query_date(query.to)),
        ]);

        let envelope = self.send::<Vec<DaySchedule>>(operation, request).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn fetch_periods(&self) -> ClientResult<Vec<Period>> {
        self.fetch_list(Operation::FetchLookups, "periods/lookup").await
    }

    #[instrument(skip(self))]
    async fn fetch_classes(&self) -> ClientResult<Vec<ClassOption>> {
        self.fetch_list(Operation::FetchLookups, "classes/lookup").await
    }

    #[instrument(skip(self))]
    async fn fetch_teachers(&self) -> ClientResult<Vec<TeacherOption>> {
        self.fetch_list(Operation::FetchLookups, "teachers/lookup").await
    }

    #[instrument(skip(self))]
    async fn fetch_subjects(&self) -> ClientResult<Vec<SubjectOption>> {
        self.fetch_list(Operation::FetchLookups, "subjects/lookup").await
    }

    #[instrument(skip(self, dto), fields(date = ?dto.date, period = ?dto.period_id))]
    async fn create_session(&self, dto: &CreateSessionDto) -> ClientResult<Created> {
        let request = self.request(Method::POST, "session").json(dto);
        let envelope = self.send::<Value>(Operation::CreateSession, request).await?;
        Ok(created_from(envelope.data))
    }

    #[instrument(skip(self, dto), fields(session.id = %id))]
    async fn update_session(
        &self,
        id: SessionId,
        dto: &UpdateSessionDto,
    ) -> ClientResult<Option<Session>> {
        let request = self
            .request(Method::PUT, &format!("session/{}", id))
            .json(dto);
        let envelope = self.send::<Value>(Operation::UpdateSession, request).await?;

        // Anything that is not a full record counts as a bare acknowledgement.
        Ok(envelope
            .data
            .and_then(|data| serde_json::from_value::<Session>(data).ok()))
    }

    #[instrument(skip(self), fields(session.id = %id))]
    async fn delete_session(&self, id: SessionId) -> ClientResult<()> {
        let request = self.request(Method::DELETE, &format!("session/{}", id));
        self.send::<Value>(Operation::DeleteSession, request).await?;
        Ok(())
    }
}
