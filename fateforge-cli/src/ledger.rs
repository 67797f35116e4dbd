//! HTTP client for the remote score ledger.
use async_trait::async_trait;
use serde::Deserialize;

use fateforge_game::{ActorIdentity, FieldError, LedgerError, RemoteRecord, ScoreLedger, ScorePayload};

/// Score ledger over plain HTTP. The blocking request runs on the tokio
/// blocking pool so the caller's async context is never held up.
pub struct HttpScoreLedger {
    base_url: String,
}

impl HttpScoreLedger {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    fn scores_url(&self) -> String {
        format!("{}/api/scores", self.base_url)
    }
}

#[async_trait]
impl ScoreLedger for HttpScoreLedger {
    async fn submit_score(
        &self,
        actor: &ActorIdentity,
        payload: &ScorePayload,
    ) -> Result<RemoteRecord, LedgerError> {
        let url = self.scores_url();
        let token = actor.token.clone();
        let payload = payload.clone();
        tokio::task::spawn_blocking(move || submit_blocking(&url, &token, &payload))
            .await
            .map_err(|e| LedgerError::transport(format!("task join error: {e}")))?
    }
}

fn submit_blocking(url: &str, token: &str, payload: &ScorePayload) -> Result<RemoteRecord, LedgerError> {
    // Non-2xx responses carry the ledger's structured error body, so they
    // must come back as responses, not transport errors.
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(std::time::Duration::from_secs(10)))
        .build()
        .into();

    let response = agent
        .post(url)
        .header("Authorization", &format!("Bearer {token}"))
        .send_json(payload)
        .map_err(|e| LedgerError::transport(e.to_string()))?;

    let status = response.status().as_u16();
    if (200..300).contains(&status) {
        response
            .into_body()
            .read_json::<RemoteRecord>()
            .map_err(|e| LedgerError::transport(format!("could not parse ledger response: {e}")))
    } else {
        Err(decode_error_body(status, response))
    }
}

/// Shape of the ledger's error responses. Every field is optional; whatever
/// is missing gets a generic stand-in.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<FieldError>,
}

fn decode_error_body(status: u16, response: ureq::http::Response<ureq::Body>) -> LedgerError {
    let body: ErrorBody = response.into_body().read_json().unwrap_or_default();
    LedgerError {
        status,
        title: body.title.unwrap_or_else(|| "Submission failed".to_string()),
        message: body
            .message
            .unwrap_or_else(|| format!("the ledger responded with status {status}")),
        field_errors: body.errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let ledger = HttpScoreLedger::new("https://ledger.example/");
        assert_eq!(ledger.scores_url(), "https://ledger.example/api/scores");
    }

    #[tokio::test]
    async fn unreachable_ledger_surfaces_a_transport_error() {
        // Port 1 on loopback refuses the connection immediately.
        let ledger = HttpScoreLedger::new("http://127.0.0.1:1");
        let actor = ActorIdentity {
            name: "mira".to_string(),
            token: "tok".to_string(),
        };
        let payload = ScorePayload {
            rating_grade: fateforge_game::Grade::D,
            hero_archetype: fateforge_game::HeroArchetype::Rogue,
            decisions: vec![3],
        };
        let err = ledger.submit_score(&actor, &payload).await.unwrap_err();
        assert_eq!(err.status, 0);
        assert!(err.field_errors.is_empty());
    }
}
