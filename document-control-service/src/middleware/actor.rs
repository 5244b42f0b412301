use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use service_core::error::AppError;
use service_core::middleware::tracing::RequestId;
use uuid::Uuid;

use crate::models::audit_log::LOCAL_IP;
use crate::models::Actor;
use crate::startup::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Identity recorded in the audit trail for a mutating request.
///
/// `X-User-ID` must name a known, active user; without it the request acts as
/// the system actor. The client address is the first `X-Forwarded-For` hop and
/// the session is `X-Session-ID`, falling back to the request id.
#[derive(Debug, Clone)]
pub struct ActorContext(pub Actor);

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn client_ip(headers: &HeaderMap) -> String {
    header(headers, FORWARDED_FOR_HEADER)
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(LOCAL_IP)
        .to_string()
}

fn session_id(parts: &Parts) -> String {
    header(&parts.headers, SESSION_ID_HEADER)
        .map(str::to_string)
        .or_else(|| parts.extensions.get::<RequestId>().map(|r| r.0.clone()))
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for ActorContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ip_address = client_ip(&parts.headers);
        let session_id = session_id(parts);

        let actor = match header(&parts.headers, USER_ID_HEADER) {
            None => Actor {
                ip_address,
                session_id,
                ..Actor::system()
            },
            Some(user_id) => {
                let user = state.store.user_by_id(user_id).ok_or_else(|| {
                    AppError::BadRequest(anyhow::anyhow!(
                        "X-User-ID '{}' does not name a known user",
                        user_id
                    ))
                })?;
                if !user.is_active {
                    return Err(AppError::BadRequest(anyhow::anyhow!(
                        "User '{}' is inactive",
                        user.username
                    )));
                }
                Actor::for_user(&user, ip_address, session_id)
            }
        };

        tracing::Span::current().record("user_id", actor.user_id.as_str());

        Ok(ActorContext(actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn first_forwarded_hop_is_the_client() {
        let mut headers = HeaderMap::new();
        headers.insert(
            FORWARDED_FOR_HEADER,
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers), "203.0.113.7");
    }

    #[test]
    fn missing_forwarded_for_defaults_to_localhost() {
        assert_eq!(client_ip(&HeaderMap::new()), "127.0.0.1");
    }
}
