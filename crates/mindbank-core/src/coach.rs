//! Coach suggestions from the weekly digest.
//!
//! Posts the digest plus the user's weekly goal to a chat-completions style
//! endpoint and parses the reply. When no API key is configured the client
//! degrades to deterministic offline suggestions, so the command always
//! produces something usable.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::digest::CoachDigest;
use crate::error::CoachError;
use crate::storage::config::CoachConfig;

/// Environment variable holding the coach API key.
pub const COACH_API_KEY_ENV: &str = "MINDBANK_COACH_API_KEY";

/// A coach reply: feedback, concrete actions, and an affirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachSuggestions {
    pub summary: String,
    pub actions: Vec<String>,
    pub affirmation: String,
    /// True when the suggestions were produced offline.
    pub fallback: bool,
}

/// Deterministic offline suggestions used when no API key is configured.
pub fn fallback_suggestions(digest: &CoachDigest, weekly_goal: Option<&str>) -> CoachSuggestions {
    let focus = weekly_goal
        .filter(|goal| !goal.trim().is_empty())
        .unwrap_or("Build consistent deposits");
    CoachSuggestions {
        summary: format!("Focus: {focus}. {}", digest.summary),
        actions: vec![
            "Log 1 success, 1 progress, 1 effort daily".to_string(),
            "Reframe 1 setback per day".to_string(),
            "Do a 2-minute visualization of the ideal outcome each morning".to_string(),
        ],
        affirmation: "I refuel confidence through daily deposits and constructive choices."
            .to_string(),
        fallback: true,
    }
}

const SYSTEM_PROMPT: &str = "You are a concise, practical confidence coach. \
Use the user's weekly goal and their last-7-day digest to produce a two-sentence \
feedback summary, three specific action items for the coming week, and one short \
present-tense affirmation. Keep output tight and actionable.";

/// Client for the coach endpoint.
pub struct CoachClient {
    config: CoachConfig,
    api_key: Option<String>,
}

impl CoachClient {
    /// Build a client from config; the API key comes from
    /// [`COACH_API_KEY_ENV`].
    pub fn new(config: CoachConfig) -> Self {
        let api_key = std::env::var(COACH_API_KEY_ENV).ok().filter(|k| !k.is_empty());
        Self { config, api_key }
    }

    /// Build a client with an explicit key (tests).
    pub fn with_api_key(config: CoachConfig, api_key: Option<String>) -> Self {
        Self { config, api_key }
    }

    /// Whether a real endpoint call would be made.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask the coach for suggestions; offline fallback when unconfigured.
    pub async fn suggest(
        &self,
        digest: &CoachDigest,
        weekly_goal: Option<&str>,
    ) -> Result<CoachSuggestions, CoachError> {
        let Some(api_key) = &self.api_key else {
            return Ok(fallback_suggestions(digest, weekly_goal));
        };

        let mut user_lines = vec![
            format!("Weekly goal: {}", weekly_goal.unwrap_or("(not provided)")),
            format!("Digest: {}", digest.summary),
        ];
        let recent: Vec<String> = digest
            .recent
            .deposits
            .iter()
            .map(|d| format!("- deposit: [{}] {}", d.kind.as_str(), d.text))
            .chain(
                digest
                    .recent
                    .reframes
                    .iter()
                    .map(|r| format!("- reframe: \"{}\" to \"{}\"", r.original, r.reframed)),
            )
            .take(5)
            .collect();
        if !recent.is_empty() {
            user_lines.push("Recent items:".to_string());
            user_lines.extend(recent);
        }

        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_lines.join("\n") },
            ],
        });

        let client = Client::new();
        let resp = client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CoachError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let reply: serde_json::Value = resp.json().await?;
        let text = reply
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                CoachError::MalformedResponse("no choices[0].message.content".to_string())
            })?;

        Ok(parse_suggestions(text, digest, weekly_goal))
    }
}

/// Shape the completion text into suggestions. The model is asked for a
/// summary, three actions, and an affirmation; lines that look like list
/// items become actions, the last line the affirmation, everything before
/// the list the summary. A reply too short to carve up is passed through as
/// the summary with fallback actions.
fn parse_suggestions(
    text: &str,
    digest: &CoachDigest,
    weekly_goal: Option<&str>,
) -> CoachSuggestions {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let actions: Vec<String> = lines
        .iter()
        .filter(|l| {
            l.starts_with('-')
                || l.starts_with('*')
                || l.chars().next().is_some_and(|c| c.is_ascii_digit())
        })
        .map(|l| {
            l.trim_start_matches(['-', '*', ' '])
                .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')')
                .trim()
                .to_string()
        })
        .filter(|l| !l.is_empty())
        .take(3)
        .collect();

    if lines.is_empty() || actions.is_empty() {
        let mut fallback = fallback_suggestions(digest, weekly_goal);
        if !text.trim().is_empty() {
            fallback.summary = text.trim().to_string();
            fallback.fallback = false;
        }
        return fallback;
    }

    let summary = lines
        .iter()
        .take_while(|l| !actions.iter().any(|a| l.contains(a.as_str())))
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    let affirmation = lines
        .last()
        .filter(|l| !actions.iter().any(|a| l.contains(a.as_str())))
        .map(|l| l.to_string())
        .unwrap_or_else(|| "I show up for myself daily.".to_string());

    CoachSuggestions {
        summary: if summary.is_empty() {
            digest.summary.clone()
        } else {
            summary
        },
        actions,
        affirmation,
        fallback: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::{CoachDigest, DigestTotals, RecentItems};

    fn empty_digest() -> CoachDigest {
        CoachDigest {
            totals: DigestTotals::default(),
            recent: RecentItems::default(),
            summary: "Last 7d: success=0, progress=0, effort=0, reframes=0".to_string(),
        }
    }

    #[test]
    fn fallback_uses_the_weekly_goal() {
        let suggestions = fallback_suggestions(&empty_digest(), Some("ship the demo"));
        assert!(suggestions.summary.starts_with("Focus: ship the demo."));
        assert_eq!(suggestions.actions.len(), 3);
        assert!(suggestions.fallback);
    }

    #[test]
    fn fallback_has_a_default_focus() {
        let suggestions = fallback_suggestions(&empty_digest(), None);
        assert!(suggestions.summary.contains("Build consistent deposits"));
        let blank = fallback_suggestions(&empty_digest(), Some("  "));
        assert!(blank.summary.contains("Build consistent deposits"));
    }

    #[test]
    fn unconfigured_client_returns_fallback() {
        let client = CoachClient::with_api_key(CoachConfig::default(), None);
        assert!(!client.is_configured());
        let rt = tokio::runtime::Runtime::new().unwrap();
        let suggestions = rt
            .block_on(client.suggest(&empty_digest(), Some("rest more")))
            .unwrap();
        assert!(suggestions.fallback);
        assert!(suggestions.summary.contains("rest more"));
    }

    #[test]
    fn parse_picks_out_actions_and_affirmation() {
        let text = "Good week of steady effort. Keep the streak alive.\n\
                    - Log one success before lunch\n\
                    - Reframe the Friday setback\n\
                    - Review the week on Sunday\n\
                    I build momentum one deposit at a time.";
        let parsed = parse_suggestions(text, &empty_digest(), None);
        assert_eq!(parsed.actions.len(), 3);
        assert_eq!(parsed.actions[0], "Log one success before lunch");
        assert!(parsed.summary.contains("steady effort"));
        assert_eq!(parsed.affirmation, "I build momentum one deposit at a time.");
        assert!(!parsed.fallback);
    }

    #[test]
    fn unstructured_reply_becomes_the_summary() {
        let parsed = parse_suggestions("Just keep going.", &empty_digest(), None);
        assert_eq!(parsed.summary, "Just keep going.");
        assert_eq!(parsed.actions.len(), 3);
        assert!(!parsed.fallback);
    }
}
