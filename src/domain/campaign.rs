use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};
use tracing::{debug, warn};

use super::sheets::table::SheetRecord;

/// Columns of the campaign sheet, in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr, Display)]
pub enum CampaignColumn {
    #[strum(serialize = "CampaignID")]
    CampaignId,
    CampaignName,
    SentDate,
    #[strum(serialize = "ListID")]
    ListId,
    UniqueClicks,
    Clickers,
    Complaints,
    Delivered,
    Sent,
    SoftBounces,
    HardBounces,
    UniqueViews,
    TrackableViews,
    Unsubscriptions,
    Viewed,
    Deferred,
    Year,
    Month,
}

impl CampaignColumn {
    pub fn header(self) -> &'static str {
        self.into()
    }

    /// Canonical header names, in sheet order.
    pub fn headers() -> Vec<&'static str> {
        Self::iter().map(Self::header).collect()
    }

    /// Key of the counter inside `statistics.globalStats`, for the statistics columns.
    pub fn stat_key(self) -> Option<&'static str> {
        use CampaignColumn::*;
        match self {
            UniqueClicks => Some("uniqueClicks"),
            Clickers => Some("clickers"),
            Complaints => Some("complaints"),
            Delivered => Some("delivered"),
            Sent => Some("sent"),
            SoftBounces => Some("softBounces"),
            HardBounces => Some("hardBounces"),
            UniqueViews => Some("uniqueViews"),
            TrackableViews => Some("trackableViews"),
            Unsubscriptions => Some("unsubscriptions"),
            Viewed => Some("viewed"),
            Deferred => Some("deferred"),
            CampaignId | CampaignName | SentDate | ListId | Year | Month => None,
        }
    }

    pub fn is_statistic(self) -> bool {
        self.stat_key().is_some()
    }

    pub fn from_header(header: &str) -> Option<Self> {
        Self::iter().find(|column| column.header() == header)
    }
}

/// One page of the campaign listing. A missing or null `campaigns` field marks the end of data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignPage {
    #[serde(default)]
    campaigns: Option<Vec<Value>>,
}

impl CampaignPage {
    pub fn new(campaigns: Vec<Value>) -> Self {
        Self {
            campaigns: Some(campaigns),
        }
    }

    pub fn campaigns(&self) -> &[Value] {
        self.campaigns.as_deref().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.campaigns().len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CampaignRecord {
    #[serde(rename = "CampaignID")]
    pub campaign_id: String,
    #[serde(rename = "CampaignName")]
    pub campaign_name: String,
    #[serde(rename = "SentDate")]
    pub sent_date: String,
    #[serde(rename = "ListID")]
    pub list_id: String,
    #[serde(rename = "UniqueClicks")]
    pub unique_clicks: u64,
    #[serde(rename = "Clickers")]
    pub clickers: u64,
    #[serde(rename = "Complaints")]
    pub complaints: u64,
    #[serde(rename = "Delivered")]
    pub delivered: u64,
    #[serde(rename = "Sent")]
    pub sent: u64,
    #[serde(rename = "SoftBounces")]
    pub soft_bounces: u64,
    #[serde(rename = "HardBounces")]
    pub hard_bounces: u64,
    #[serde(rename = "UniqueViews")]
    pub unique_views: u64,
    #[serde(rename = "TrackableViews")]
    pub trackable_views: u64,
    #[serde(rename = "Unsubscriptions")]
    pub unsubscriptions: u64,
    #[serde(rename = "Viewed")]
    pub viewed: u64,
    #[serde(rename = "Deferred")]
    pub deferred: u64,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Month")]
    pub month: String,
}

static NULL: Value = Value::Null;

/// Follows `path` through nested objects. Any missing or non-object step yields `null`.
fn lookup<'a>(value: &'a Value, path: &[&str]) -> &'a Value {
    path.iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))
        .unwrap_or(&NULL)
}

/// Text of a scalar JSON value, as it would be shown in a cell.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn campaign_id_text(id: &Value) -> String {
    match id {
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::Bool(false) => String::new(),
        other => scalar_text(other),
    }
}

/// Joins list identifiers the way they are shown in the sheet.
///
/// ```
/// use campaign_sheets_sync::domain::campaign::format_list_ids;
/// use serde_json::json;
///
/// assert_eq!(format_list_ids(&json!([2, 7, "vip"])), "2, 7, vip");
/// assert_eq!(format_list_ids(&json!(null)), "");
/// ```
pub fn format_list_ids(lists: &Value) -> String {
    lists
        .as_array()
        .map(|ids| ids.iter().map(scalar_text).collect::<Vec<_>>().join(", "))
        .unwrap_or_default()
}

/// Parses an ISO-8601 timestamp or date. The calendar date is the one in the
/// timestamp's own offset.
pub fn parse_sent_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }

    let with_offset = match raw.strip_suffix(['Z', 'z']) {
        Some(utc) => format!("{utc}+00:00"),
        None => raw.to_owned(),
    };
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%d %H:%M%:z",
    ] {
        if let Ok(datetime) = DateTime::parse_from_str(&with_offset, format) {
            return Some(datetime.date_naive());
        }
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

impl CampaignRecord {
    /// Flattens one campaign object of the listing. Never fails: anything missing or
    /// malformed falls back to an empty string or `0`.
    pub fn from_campaign(campaign: &Value) -> Self {
        let campaign_id = campaign_id_text(lookup(campaign, &["id"]));
        let campaign_name = scalar_text(lookup(campaign, &["name"]));

        let mut record = CampaignRecord {
            campaign_id,
            campaign_name,
            list_id: format_list_ids(lookup(campaign, &["recipients", "lists"])),
            ..Default::default()
        };

        match lookup(campaign, &["sentDate"]) {
            Value::Null => {}
            Value::String(raw) if raw.is_empty() => {}
            Value::String(raw) => match parse_sent_date(raw) {
                Some(date) => record.set_sent_date(date),
                None => warn!(
                    "ID: {} - Error parsing sentDate '{}'. Date will be left empty.",
                    record.campaign_id, raw
                ),
            },
            other => warn!(
                "ID: {} - Unexpected sentDate value {}. Date will be left empty.",
                record.campaign_id, other
            ),
        }

        let stats = lookup(campaign, &["statistics", "globalStats"]);
        for column in CampaignColumn::iter() {
            if let Some(key) = column.stat_key() {
                let value = lookup(stats, &[key]).as_u64().unwrap_or(0);
                record.set_statistic(column, value);
            }
        }

        debug!(
            "Data processed for ID {}: {}, ListIDs: '{}', globalStats present: {}",
            record.campaign_id,
            record.campaign_name,
            record.list_id,
            stats.as_object().is_some_and(|stats| !stats.is_empty())
        );

        record
    }

    fn set_sent_date(&mut self, date: NaiveDate) {
        self.sent_date = date.format("%d-%m-%Y").to_string();
        self.year = date.year().to_string();
        self.month = format!("{:02}", date.month());
    }

    fn statistic_mut(&mut self, column: CampaignColumn) -> Option<&mut u64> {
        use CampaignColumn::*;
        match column {
            UniqueClicks => Some(&mut self.unique_clicks),
            Clickers => Some(&mut self.clickers),
            Complaints => Some(&mut self.complaints),
            Delivered => Some(&mut self.delivered),
            Sent => Some(&mut self.sent),
            SoftBounces => Some(&mut self.soft_bounces),
            HardBounces => Some(&mut self.hard_bounces),
            UniqueViews => Some(&mut self.unique_views),
            TrackableViews => Some(&mut self.trackable_views),
            Unsubscriptions => Some(&mut self.unsubscriptions),
            Viewed => Some(&mut self.viewed),
            Deferred => Some(&mut self.deferred),
            CampaignId | CampaignName | SentDate | ListId | Year | Month => None,
        }
    }

    fn set_statistic(&mut self, column: CampaignColumn, value: u64) {
        if let Some(slot) = self.statistic_mut(column) {
            *slot = value;
        }
    }

    pub fn statistic(&self, column: CampaignColumn) -> Option<u64> {
        use CampaignColumn::*;
        match column {
            UniqueClicks => Some(self.unique_clicks),
            Clickers => Some(self.clickers),
            Complaints => Some(self.complaints),
            Delivered => Some(self.delivered),
            Sent => Some(self.sent),
            SoftBounces => Some(self.soft_bounces),
            HardBounces => Some(self.hard_bounces),
            UniqueViews => Some(self.unique_views),
            TrackableViews => Some(self.trackable_views),
            Unsubscriptions => Some(self.unsubscriptions),
            Viewed => Some(self.viewed),
            Deferred => Some(self.deferred),
            CampaignId | CampaignName | SentDate | ListId | Year | Month => None,
        }
    }

    pub fn cell(&self, column: CampaignColumn) -> String {
        use CampaignColumn::*;
        match column {
            CampaignId => self.campaign_id.clone(),
            CampaignName => self.campaign_name.clone(),
            SentDate => self.sent_date.clone(),
            ListId => self.list_id.clone(),
            Year => self.year.clone(),
            Month => self.month.clone(),
            statistic => self.statistic(statistic).unwrap_or_default().to_string(),
        }
    }
}

impl SheetRecord for CampaignRecord {
    fn cells(&self) -> Vec<(String, String)> {
        CampaignColumn::iter()
            .map(|column| (column.header().to_owned(), self.cell(column)))
            .collect()
    }
}
