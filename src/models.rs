//! Domain models for the conference schedule document.
//!
//! These structs match the `timetable.json` schema and use serde for JSON
//! deserialization. Times of day are `HH:MM` strings on the wire and map to
//! `NaiveTime`; the event date maps to `NaiveDate`.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Grid resolution: one row per five minutes.
pub const SLOT_MINUTES: u32 = 5;

/// Titles of structural slots (breaks, reception, room changes) that are
/// rendered on the grid but cannot be opened or checked.
const STRUCTURAL_TITLES: &[&str] = &[
    "休憩",
    "受付",
    "会場レイアウト変更",
    "オープニング",
    "キーノート",
];

/// Serde helper for `HH:MM` wall-clock times.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Deserialize optional strings, mapping empty/whitespace values to `None`.
/// The schedule generator emits `""` rather than omitting fields.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Identifier of a session within one schedule document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct SessionId(pub u32);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Event-level metadata from the schedule document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    pub name: String,
    pub date: NaiveDate,
    pub venue: String,
    pub hashtag: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub timetable_url: Option<String>,
}

/// A parallel room/channel of sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub name: String,
    pub hashtag: String,
}

/// One scheduled talk/break/event slot. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub track: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    #[serde(rename = "duration")]
    pub duration_min: u32,
    pub title: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub speaker: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub proposal_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Session {
    /// Start of the session in minutes from midnight.
    pub fn start_minutes(&self) -> u32 {
        self.start.hour() * 60 + self.start.minute()
    }

    /// End of the session in minutes from midnight.
    pub fn end_minutes(&self) -> u32 {
        self.end.hour() * 60 + self.end.minute()
    }

    /// Structural slots: no proposal and a title from the fixed list.
    /// These are drawn dimmed and skipped by selection and edit mode.
    pub fn is_structural(&self) -> bool {
        self.proposal_url.is_none() && STRUCTURAL_TITLES.iter().any(|t| self.title.contains(t))
    }

    /// Whether the session can be selected, opened and checked.
    pub fn is_selectable(&self) -> bool {
        !self.is_structural()
    }

    /// Compact `HH:MM-HH:MM` label for grid cells and the detail modal.
    pub fn time_label(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }

    /// Whether a clock minute falls inside the half-open `[start, end)`
    /// window. Callers gate on the event day first.
    pub fn is_running_at(&self, now_minutes: u32) -> bool {
        now_minutes >= self.start_minutes() && now_minutes < self.end_minutes()
    }
}

/// The full schedule document: one event, its tracks, and all sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    pub event: EventInfo,
    pub tracks: Vec<Track>,
    pub sessions: Vec<Session>,
}

impl Timetable {
    /// Look up a session by id.
    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Look up a track by its id string.
    pub fn track(&self, track_id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    /// Column index of a track, or `None` for sessions on unknown tracks
    /// (those are skipped at render time).
    pub fn track_index(&self, track_id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == track_id)
    }

    /// Ids of a grouped-session family: sessions sharing title and start
    /// time across different tracks (a keynote broadcast on every track).
    /// Always contains `id` itself when the id exists.
    pub fn group_siblings(&self, id: SessionId) -> Vec<SessionId> {
        let Some(target) = self.session(id) else {
            return Vec::new();
        };
        self.sessions
            .iter()
            .filter(|s| s.title == target.title && s.start == target.start)
            .map(|s| s.id)
            .collect()
    }

    /// All session ids present in the document.
    pub fn session_ids(&self) -> impl Iterator<Item = SessionId> + '_ {
        self.sessions.iter().map(|s| s.id)
    }

    /// Earliest start and latest end over all sessions, in minutes from
    /// midnight. Falls back to 09:00-19:40 for an empty session list.
    pub fn time_range(&self) -> (u32, u32) {
        let start = self
            .sessions
            .iter()
            .map(Session::start_minutes)
            .min()
            .unwrap_or(9 * 60);
        let end = self
            .sessions
            .iter()
            .map(Session::end_minutes)
            .max()
            .unwrap_or(19 * 60 + 40);
        (start, end.max(start + SLOT_MINUTES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r##"{
            "event": {
                "name": "JAWS DAYS 2026",
                "date": "2026-03-07",
                "venue": "池袋サンシャインシティ",
                "hashtag": "#jawsdays2026",
                "timetableUrl": ""
            },
            "tracks": [
                {"id": "A", "name": "Track A", "hashtag": "#jawsdays2026_a"},
                {"id": "B", "name": "Track B", "hashtag": "#jawsdays2026_b"}
            ],
            "sessions": [
                {"id": 1, "track": "A", "date": "2026-03-07", "start": "09:00",
                 "end": "09:50", "duration": 50, "title": "受付", "speaker": "",
                 "proposalUrl": "", "tags": []},
                {"id": 2, "track": "A", "date": "2026-03-07", "start": "10:00",
                 "end": "10:50", "duration": 50, "title": "キーノート", "speaker": "",
                 "proposalUrl": "", "tags": []},
                {"id": 3, "track": "B", "date": "2026-03-07", "start": "10:00",
                 "end": "10:50", "duration": 50, "title": "キーノート", "speaker": "",
                 "proposalUrl": "", "tags": []},
                {"id": 4, "track": "B", "date": "2026-03-07", "start": "11:00",
                 "end": "11:50", "duration": 50, "title": "IAMの話",
                 "speaker": "辻 水月",
                 "proposalUrl": "https://fortee.jp/x/proposal/abc",
                 "tags": ["Level 300"]}
            ]
        }"##
    }

    #[test]
    fn parses_schedule_document() {
        let timetable: Timetable = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(timetable.tracks.len(), 2);
        assert_eq!(timetable.sessions.len(), 4);
        assert_eq!(
            timetable.event.date,
            NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
        );
        // Empty strings become None
        assert!(timetable.event.timetable_url.is_none());
        assert!(timetable.sessions[0].speaker.is_none());
        assert!(timetable.sessions[0].proposal_url.is_none());
        assert_eq!(timetable.sessions[3].speaker.as_deref(), Some("辻 水月"));
    }

    #[test]
    fn minute_accessors() {
        let timetable: Timetable = serde_json::from_str(sample_json()).unwrap();
        let session = timetable.session(SessionId(4)).unwrap();
        assert_eq!(session.start_minutes(), 11 * 60);
        assert_eq!(session.end_minutes(), 11 * 60 + 50);
        assert_eq!(session.time_label(), "11:00-11:50");
    }

    #[test]
    fn structural_sessions_are_not_selectable() {
        let timetable: Timetable = serde_json::from_str(sample_json()).unwrap();
        assert!(timetable.session(SessionId(1)).unwrap().is_structural());
        assert!(timetable.session(SessionId(2)).unwrap().is_structural());
        assert!(timetable.session(SessionId(4)).unwrap().is_selectable());
    }

    #[test]
    fn group_siblings_share_title_and_start() {
        let timetable: Timetable = serde_json::from_str(sample_json()).unwrap();
        let mut siblings = timetable.group_siblings(SessionId(2));
        siblings.sort();
        assert_eq!(siblings, vec![SessionId(2), SessionId(3)]);
        // A unique session is its own family
        assert_eq!(timetable.group_siblings(SessionId(4)), vec![SessionId(4)]);
        // Unknown ids have no family
        assert!(timetable.group_siblings(SessionId(99)).is_empty());
    }

    #[test]
    fn running_window_is_half_open() {
        let timetable: Timetable = serde_json::from_str(sample_json()).unwrap();
        let session = timetable.session(SessionId(4)).unwrap();
        assert!(session.is_running_at(11 * 60));
        assert!(session.is_running_at(11 * 60 + 49));
        assert!(!session.is_running_at(11 * 60 + 50));
        assert!(!session.is_running_at(10 * 60 + 59));
    }

    #[test]
    fn time_range_spans_all_sessions() {
        let timetable: Timetable = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(timetable.time_range(), (9 * 60, 11 * 60 + 50));
    }

    #[test]
    fn hhmm_round_trip() {
        let timetable: Timetable = serde_json::from_str(sample_json()).unwrap();
        let json = serde_json::to_string(&timetable.sessions[3]).unwrap();
        assert!(json.contains("\"start\":\"11:00\""));
        assert!(json.contains("\"end\":\"11:50\""));
    }
}
