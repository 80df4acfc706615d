//! Claim records and the write/read shapes the stores deal in.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::attribute::AttributeMap;
use crate::error::ClaimsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Open,
    InReview,
    Closed,
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InReview => "IN_REVIEW",
            Self::Closed => "CLOSED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Claims under review are locked against update and delete.
    pub fn is_locked(self) -> bool {
        self == Self::InReview
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "IN_REVIEW" => Ok(Self::InReview),
            "CLOSED" => Ok(Self::Closed),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(ClaimsError::InvalidInput(format!(
                "unknown claim status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClaimRecord {
    pub claim_id: i64,
    pub user_id: String,
    pub policy_id: String,
    pub description: String,
    pub incident_type: String,
    pub status: ClaimStatus,
    pub attributes: AttributeMap,
    pub date_of_incident: DateTime<Utc>,
    pub date_of_submission: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub rejection_reason: Option<String>,
}

/// Insert payload; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClaim {
    pub user_id: String,
    pub policy_id: String,
    pub description: String,
    pub incident_type: String,
    pub status: ClaimStatus,
    pub attributes: AttributeMap,
    pub date_of_incident: DateTime<Utc>,
    pub date_of_submission: DateTime<Utc>,
}

/// Mutable columns of an existing claim.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimPatch {
    pub description: String,
    pub attributes: AttributeMap,
    pub status: ClaimStatus,
    pub rejection_reason: Option<String>,
}

/// Listing filter: owner, optional status, optional case-insensitive search
/// over incident type and policy id.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimFilter {
    pub user_id: String,
    pub status: Option<ClaimStatus>,
    pub search: Option<String>,
}

impl ClaimFilter {
    pub fn matches(&self, claim: &ClaimRecord) -> bool {
        if claim.user_id != self.user_id {
            return false;
        }
        if self.status.is_some_and(|s| s != claim.status) {
            return false;
        }
        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                claim.incident_type.to_lowercase().contains(&term)
                    || claim.policy_id.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    pub const MAX_PAGE_SIZE: u32 = 100;

    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.unwrap_or(i64::from(Self::DEFAULT_PAGE)).max(1);
        let page_size = page_size
            .unwrap_or(i64::from(Self::DEFAULT_PAGE_SIZE))
            .clamp(1, i64::from(Self::MAX_PAGE_SIZE));
        Self {
            page: u32::try_from(page).unwrap_or(u32::MAX),
            page_size: page_size as u32,
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Outbound representation of a claim: timestamps as RFC 3339 strings,
/// rejection reason omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimView {
    pub claim_id: i64,
    pub user_id: String,
    pub policy_id: String,
    pub description: String,
    pub incident_type: String,
    pub status: ClaimStatus,
    pub attributes: AttributeMap,
    pub date_of_incident: String,
    pub date_of_submission: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl From<ClaimRecord> for ClaimView {
    fn from(record: ClaimRecord) -> Self {
        Self {
            claim_id: record.claim_id,
            user_id: record.user_id,
            policy_id: record.policy_id,
            description: record.description,
            incident_type: record.incident_type,
            status: record.status,
            attributes: record.attributes,
            date_of_incident: iso(record.date_of_incident),
            date_of_submission: iso(record.date_of_submission),
            created_at: iso(record.created_at),
            updated_at: iso(record.updated_at),
            rejection_reason: record.rejection_reason,
        }
    }
}

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_claim_date(field: &str, raw: &str) -> Result<DateTime<Utc>, ClaimsError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| ClaimsError::InvalidInput(format!("{field} '{raw}' is not a valid date")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ClaimRecord {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        ClaimRecord {
            claim_id: 1,
            user_id: "u1".into(),
            policy_id: "POL-778".into(),
            description: "rear-ended".into(),
            incident_type: "Collision".into(),
            status: ClaimStatus::Open,
            attributes: AttributeMap::new(),
            date_of_incident: ts,
            date_of_submission: ts,
            created_at: ts,
            updated_at: ts,
            rejection_reason: None,
        }
    }

    #[test]
    fn status_strings() {
        assert_eq!("IN_REVIEW".parse::<ClaimStatus>().unwrap(), ClaimStatus::InReview);
        assert!("open".parse::<ClaimStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&ClaimStatus::InReview).unwrap(),
            "\"IN_REVIEW\""
        );
        assert!(ClaimStatus::InReview.is_locked());
        assert!(!ClaimStatus::Rejected.is_locked());
    }

    #[test]
    fn view_renders_iso_dates_and_omits_missing_reason() {
        let json = serde_json::to_value(ClaimView::from(record())).unwrap();
        assert_eq!(json["createdAt"], "2025-03-01T12:00:00.000Z");
        assert_eq!(json["status"], "OPEN");
        assert!(json.get("rejectionReason").is_none());

        let mut rejected = record();
        rejected.rejection_reason = Some("duplicate".into());
        let json = serde_json::to_value(ClaimView::from(rejected)).unwrap();
        assert_eq!(json["rejectionReason"], "duplicate");
    }

    #[test]
    fn filter_matches_owner_status_and_search() {
        let claim = record();
        let mut filter = ClaimFilter {
            user_id: "u1".into(),
            status: None,
            search: Some("collis".into()),
        };
        assert!(filter.matches(&claim));
        filter.search = Some("pol-77".into());
        assert!(filter.matches(&claim));
        filter.search = Some("theft".into());
        assert!(!filter.matches(&claim));
        filter.search = None;
        filter.status = Some(ClaimStatus::Closed);
        assert!(!filter.matches(&claim));
        filter.status = Some(ClaimStatus::Open);
        filter.user_id = "u2".into();
        assert!(!filter.matches(&claim));
    }

    #[test]
    fn page_defaults_and_bounds() {
        let page = PageRequest::default();
        assert_eq!((page.page, page.page_size), (1, 10));
        assert_eq!(page.offset(), 0);
        let page = PageRequest::new(Some(3), Some(25));
        assert_eq!(page.offset(), 50);
        assert_eq!(page.limit(), 25);
        let page = PageRequest::new(Some(-4), Some(1000));
        assert_eq!((page.page, page.page_size), (1, 100));
        assert_eq!(PageRequest::new(None, Some(0)).page_size, 1);
    }

    #[test]
    fn parses_dates() {
        let d = parse_claim_date("dateOfIncident", "2025-02-10").unwrap();
        assert_eq!(d, Utc.with_ymd_and_hms(2025, 2, 10, 0, 0, 0).unwrap());
        let t = parse_claim_date("dateOfIncident", "2025-02-10T08:30:00+02:00").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2025, 2, 10, 6, 30, 0).unwrap());
        let err = parse_claim_date("dateOfIncident", "yesterday").unwrap_err();
        assert_eq!(err.http_status(), 400);
    }
}
