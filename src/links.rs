//! Calendar and share link builders for the session-detail modal.

use url::form_urlencoded;

use crate::models::{EventInfo, Session, Timetable};

const GCAL_RENDER: &str = "https://www.google.com/calendar/render";
const X_INTENT: &str = "https://x.com/intent/post";

/// Google Calendar "add event" template URL for one session.
/// Times are interpreted in the event timezone (JST).
pub fn google_calendar_url(event: &EventInfo, session: &Session) -> String {
    let mut title = format!("【{}】{}", session.track, session.title);
    if let Some(speaker) = &session.speaker {
        title.push_str(" by ");
        title.push_str(speaker);
    }

    let date = event.date.format("%Y%m%d");
    let dates = format!(
        "{date}T{}00/{date}T{}00",
        session.start.format("%H%M"),
        session.end.format("%H%M"),
    );

    let details = match &session.proposal_url {
        Some(url) => format!("Proposal: {url}"),
        None => event.name.clone(),
    };

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("action", "TEMPLATE")
        .append_pair("text", &title)
        .append_pair("dates", &dates)
        .append_pair("ctz", "Asia/Tokyo")
        .append_pair("location", &event.venue)
        .append_pair("details", &details)
        .finish();

    format!("{GCAL_RENDER}?{query}")
}

/// X (Twitter) post-intent URL: title, speaker, event and track hashtags,
/// and the proposal link when there is one.
pub fn x_post_url(timetable: &Timetable, session: &Session) -> String {
    let track_hashtag = timetable
        .track(&session.track)
        .map(|t| t.hashtag.as_str())
        .unwrap_or("");
    let hashtags = format!("{} {track_hashtag}", timetable.event.hashtag)
        .trim()
        .to_string();

    let mut text = session.title.clone();
    if let Some(speaker) = &session.speaker {
        text.push_str(" by ");
        text.push_str(speaker);
    }
    text.push('\n');
    text.push_str(&hashtags);
    if let Some(url) = &session.proposal_url {
        text.push('\n');
        text.push_str(url);
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("text", &text)
        .finish();

    format!("{X_INTENT}?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    use crate::models::{SessionId, Track};

    fn fixture() -> Timetable {
        let parse = |raw| NaiveTime::parse_from_str(raw, "%H:%M").unwrap();
        Timetable {
            event: EventInfo {
                name: "JAWS DAYS 2026".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
                venue: "池袋サンシャインシティ".to_string(),
                hashtag: "#jawsdays2026".to_string(),
                timetable_url: None,
            },
            tracks: vec![Track {
                id: "A".to_string(),
                name: "Track A".to_string(),
                hashtag: "#jawsdays2026_a".to_string(),
            }],
            sessions: vec![Session {
                id: SessionId(1),
                track: "A".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
                start: parse("11:00"),
                end: parse("11:50"),
                duration_min: 50,
                title: "Serverless Deep Dive".to_string(),
                speaker: Some("Yamada Taro".to_string()),
                proposal_url: Some("https://fortee.jp/x/proposal/abc".to_string()),
                tags: vec!["Level 300".to_string()],
            }],
        }
    }

    #[test]
    fn calendar_url_encodes_template_fields() {
        let tt = fixture();
        let url = google_calendar_url(&tt.event, &tt.sessions[0]);

        assert!(url.starts_with("https://www.google.com/calendar/render?"));
        assert!(url.contains("action=TEMPLATE"));
        assert!(url.contains("dates=20260307T110000%2F20260307T115000"));
        assert!(url.contains("ctz=Asia%2FTokyo"));
        // Title carries track marker and speaker
        assert!(url.contains("by+Yamada+Taro"));
        // Proposal link lands in details
        assert!(url.contains("details=Proposal%3A+https%3A%2F%2Ffortee.jp%2Fx%2Fproposal%2Fabc"));
    }

    #[test]
    fn calendar_details_fall_back_to_event_name() {
        let mut tt = fixture();
        tt.sessions[0].proposal_url = None;
        let url = google_calendar_url(&tt.event, &tt.sessions[0]);
        assert!(url.contains("details=JAWS+DAYS+2026"));
    }

    #[test]
    fn x_post_includes_hashtags_and_proposal() {
        let tt = fixture();
        let url = x_post_url(&tt, &tt.sessions[0]);

        assert!(url.starts_with("https://x.com/intent/post?text="));
        assert!(url.contains("%23jawsdays2026"));
        assert!(url.contains("%23jawsdays2026_a"));
        assert!(url.contains("https%3A%2F%2Ffortee.jp%2Fx%2Fproposal%2Fabc"));
    }

    #[test]
    fn x_post_for_unknown_track_omits_track_hashtag() {
        let mut tt = fixture();
        tt.sessions[0].track = "Z".to_string();
        let url = x_post_url(&tt, &tt.sessions[0]);
        assert!(url.contains("%23jawsdays2026"));
        assert!(!url.contains("%23jawsdays2026_a"));
    }
}
