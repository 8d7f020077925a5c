use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{Result, SizeReportError};

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("sizereport/", env!("CARGO_PKG_VERSION"));

/// Marker naming the hidden JSON block embedded in the issue body.
const HIDDEN_DATA_MARKER: &str = "botsData";
const HIDDEN_DATA_WARNING: &str = "<!-- WARNING: Don't delete the content inside botsData -->";

/// Coordinates of the pull-request issue the report is posted on.
#[derive(Debug, Clone)]
pub struct IssueCoords {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

/// Machine-readable state stored inside the issue body. Unknown keys are
/// kept as-is so other bots' data survives our rewrites.
#[derive(Debug, Default, Serialize, Deserialize)]
struct HiddenData {
    #[serde(rename = "sizeReport", default)]
    size_report: SizeReportState,
    #[serde(flatten)]
    other: Map<String, Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SizeReportState {
    #[serde(
        rename = "lastCommentId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    last_comment_id: Option<u64>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct Issue {
    #[serde(default)]
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Comment {
    id: u64,
}

/// Extract the hidden data block from an issue body. A missing marker or an
/// unparsable block both fall back to empty state.
fn extract_hidden_data(issue_body: &str) -> HiddenData {
    let Some(marker_index) = issue_body.find(HIDDEN_DATA_MARKER) else {
        return HiddenData::default();
    };
    let remaining = &issue_body[marker_index + HIDDEN_DATA_MARKER.len()..];
    let Some(end) = remaining.find("-->") else {
        return HiddenData::default();
    };
    serde_json::from_str(&remaining[..end]).unwrap_or_else(|err| {
        warn!("hidden data block is unparsable, starting fresh: {err}");
        HiddenData::default()
    })
}

/// Rewrite the issue body so the hidden block records `comment_id`,
/// preserving all text before the existing marker.
fn embed_comment_id(issue_body: &str, mut hidden: HiddenData, comment_id: u64) -> String {
    let marker = format!("<!--{HIDDEN_DATA_MARKER}");
    let text_end = issue_body.find(&marker).unwrap_or(issue_body.len());
    let text = issue_body[..text_end].trim_end();

    hidden.size_report.last_comment_id = Some(comment_id);
    let payload = serde_json::to_string(&hidden).unwrap_or_default();

    format!("{text}\n\n<!--{HIDDEN_DATA_MARKER}\n{payload}\n-->\n{HIDDEN_DATA_WARNING}")
}

fn step_err(step: &'static str) -> impl FnOnce(reqwest::Error) -> SizeReportError {
    move |source| SizeReportError::Publish { step, source }
}

/// Issue-comment publishing collaborator against the GitHub REST API.
pub struct GithubClient {
    http: reqwest::Client,
    token: String,
    api_base: String,
}

impl GithubClient {
    pub fn new(token: String) -> Result<Self> {
        Self::with_api_base(token, API_BASE.to_string())
    }

    /// The base URL is injectable so tests can point at a local server.
    pub fn with_api_base(token: String, api_base: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(step_err("client init"))?;
        Ok(Self {
            http,
            token,
            api_base,
        })
    }

    fn auth(&self) -> String {
        format!("token {}", self.token)
    }

    fn issue_url(&self, issue: &IssueCoords) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}",
            self.api_base, issue.owner, issue.repo, issue.number
        )
    }

    async fn fetch_issue_body(&self, issue: &IssueCoords) -> Result<String> {
        let url = self.issue_url(issue);
        debug!(%url, "fetching issue");
        let issue: Issue = self
            .http
            .get(&url)
            .header(header::AUTHORIZATION, self.auth())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(step_err("fetch issue"))?
            .json()
            .await
            .map_err(step_err("fetch issue"))?;
        Ok(issue.body.unwrap_or_default())
    }

    async fn post_comment(&self, issue: &IssueCoords, body: &str) -> Result<u64> {
        let url = format!("{}/comments", self.issue_url(issue));
        debug!(%url, "posting comment");
        let comment: Comment = self
            .http
            .post(&url)
            .header(header::AUTHORIZATION, self.auth())
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(step_err("post comment"))?
            .json()
            .await
            .map_err(step_err("post comment"))?;
        Ok(comment.id)
    }

    async fn update_issue_body(&self, issue: &IssueCoords, body: &str) -> Result<()> {
        let url = self.issue_url(issue);
        debug!(%url, "updating issue body");
        self.http
            .patch(&url)
            .header(header::AUTHORIZATION, self.auth())
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(step_err("update issue"))?;
        Ok(())
    }

    async fn delete_comment(&self, issue: &IssueCoords, comment_id: u64) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/issues/comments/{}",
            self.api_base, issue.owner, issue.repo, comment_id
        );
        debug!(%url, "deleting previous comment");
        self.http
            .delete(&url)
            .header(header::AUTHORIZATION, self.auth())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(step_err("delete comment"))?;
        Ok(())
    }

    /// Publish a report on the issue: post it as a new comment, record the
    /// comment id in the hidden data block, and drop the previous report
    /// comment so only the latest one is visible. Failures here propagate.
    pub async fn publish_report(&self, issue: &IssueCoords, report_body: &str) -> Result<()> {
        let issue_body = self.fetch_issue_body(issue).await?;
        let hidden = extract_hidden_data(&issue_body);
        let previous_comment_id = hidden.size_report.last_comment_id;

        let comment_id = self.post_comment(issue, report_body).await?;
        info!(comment_id, "posted size report comment");

        let updated_body = embed_comment_id(&issue_body, hidden, comment_id);
        self.update_issue_body(issue, &updated_body).await?;

        if let Some(previous) = previous_comment_id {
            self.delete_comment(issue, previous).await?;
            info!(comment_id = previous, "deleted previous size report comment");
        }
        Ok(())
    }
}
