// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Snapshot to metric point aggregation.
//!
//! Each function takes one raw PlexPy document and returns the points to
//! write. Malformed records are skipped and reported in
//! [`Aggregation::skipped`]; only a broken envelope fails the whole snapshot.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{RecordError, Result};
use crate::library::LibrarySection;
use crate::point::{measurement, MetricPoint};
use crate::session::Session;
use crate::snapshot::{records, response_data};
use crate::user::UserStat;

/// Which activity points to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityOptions {
	/// Split the `sessions` counters by video resolution.
	pub group_by_resolution: bool,
	/// Emit the `sessions` counter points.
	pub emit_aggregate: bool,
	/// Emit one `session` point per playback.
	pub emit_per_session: bool,
}

impl Default for ActivityOptions {
	fn default() -> Self {
		Self {
			group_by_resolution: false,
			emit_aggregate: true,
			emit_per_session: true,
		}
	}
}

/// Output of one aggregation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
	pub points: Vec<MetricPoint>,
	pub skipped: Vec<RecordError>,
}

/// Stream counters for one group of sessions.
///
/// `transcode_stream_count + direct_stream_count == total_stream_count`, and
/// each playing counter is bounded by its total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionAggregate {
	pub total_stream_count: u64,
	pub total_stream_playing_count: u64,
	pub transcode_stream_count: u64,
	pub transcode_stream_playing_count: u64,
	pub direct_stream_count: u64,
	pub direct_stream_playing_count: u64,
}

impl SessionAggregate {
	pub fn from_sessions<'a, I>(sessions: I) -> Self
	where
		I: IntoIterator<Item = &'a Session>,
	{
		let mut aggregate = Self::default();
		for session in sessions {
			aggregate.record(session);
		}
		aggregate
	}

	pub fn record(&mut self, session: &Session) {
		let playing = session.state.is_playing();

		self.total_stream_count += 1;
		if session.transcode_decision.is_direct_play() {
			self.direct_stream_count += 1;
			if playing {
				self.direct_stream_playing_count += 1;
			}
		} else {
			self.transcode_stream_count += 1;
			if playing {
				self.transcode_stream_playing_count += 1;
			}
		}
		if playing {
			self.total_stream_playing_count += 1;
		}
	}

	/// `sessions` point; `resolution` of `None` or `""` leaves the tag absent.
	pub fn to_point(&self, resolution: Option<&str>) -> MetricPoint {
		let point = MetricPoint::new(measurement::SESSIONS)
			.field("total_stream_count", self.total_stream_count)
			.field("total_stream_playing_count", self.total_stream_playing_count)
			.field("transcode_stream_count", self.transcode_stream_count)
			.field(
				"transcode_stream_playing_count",
				self.transcode_stream_playing_count,
			)
			.field("direct_stream_count", self.direct_stream_count)
			.field("direct_stream_playing_count", self.direct_stream_playing_count);

		match resolution {
			Some(r) => point.tag_opt("resolution", Some(r.to_string()).filter(|r| !r.is_empty())),
			None => point,
		}
	}
}

/// Sessions sharing one (lower-cased) resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionGroup<'a> {
	pub resolution: String,
	pub sessions: Vec<&'a Session>,
}

/// Groups sessions by resolution in first-seen order.
///
/// Sessions without a resolution share the `""` group.
pub fn group_by_resolution(sessions: &[Session]) -> Vec<ResolutionGroup<'_>> {
	let mut groups: Vec<ResolutionGroup<'_>> = Vec::new();
	let mut positions: HashMap<String, usize> = HashMap::new();

	for session in sessions {
		let key = session.resolution_key();
		match positions.get(&key) {
			Some(&idx) => groups[idx].sessions.push(session),
			None => {
				positions.insert(key.clone(), groups.len());
				groups.push(ResolutionGroup {
					resolution: key,
					sessions: vec![session],
				});
			}
		}
	}

	groups
}

/// Aggregates a `get_activity` document.
///
/// An empty session list yields no points at all.
pub fn aggregate_activity(snapshot: &Value, options: &ActivityOptions) -> Result<Aggregation> {
	let data = response_data(snapshot)?;
	let raw = records(data.get("sessions"), "response.data.sessions")?;

	let mut out = Aggregation::default();
	let mut sessions = Vec::with_capacity(raw.len());
	for (index, record) in raw.iter().enumerate() {
		match Session::deserialize(record) {
			Ok(session) => sessions.push(session),
			Err(e) => out.skipped.push(RecordError::new(index, e.to_string())),
		}
	}

	if sessions.is_empty() {
		return Ok(out);
	}

	if options.emit_per_session {
		out.points.extend(sessions.iter().map(Session::to_point));
	}

	if options.emit_aggregate {
		if options.group_by_resolution {
			for group in group_by_resolution(&sessions) {
				let aggregate = SessionAggregate::from_sessions(group.sessions.iter().copied());
				out.points.push(aggregate.to_point(Some(group.resolution.as_str())));
			}
		} else {
			out.points.push(SessionAggregate::from_sessions(&sessions).to_point(None));
		}
	}

	Ok(out)
}

/// Aggregates a `get_libraries` document into one `library` point per section.
pub fn aggregate_libraries(snapshot: &Value) -> Result<Aggregation> {
	let data = response_data(snapshot)?;
	let raw = records(Some(data), "response.data")?;

	Ok(collect(raw, |record| {
		LibrarySection::from_record(record).map(|s| s.to_point())
	}))
}

/// Aggregates a `get_users_table` document into one `users` point per user.
pub fn aggregate_users(snapshot: &Value) -> Result<Aggregation> {
	let data = response_data(snapshot)?;
	let raw = records(data.get("data"), "response.data.data")?;

	Ok(collect(raw, |record| {
		UserStat::from_record(record).map(|u| u.to_point())
	}))
}

fn collect<F>(raw: &[Value], decode: F) -> Aggregation
where
	F: Fn(&Value) -> std::result::Result<MetricPoint, String>,
{
	let mut out = Aggregation::default();
	for (index, record) in raw.iter().enumerate() {
		match decode(record) {
			Ok(point) => out.points.push(point),
			Err(reason) => out.skipped.push(RecordError::new(index, reason)),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::point::FieldValue;
	use crate::session::{PlaybackState, TranscodeDecision};
	use proptest::prelude::*;
	use serde_json::json;

	fn activity(sessions: Value) -> Value {
		json!({"response": {"result": "success", "message": null, "data": {"stream_count": "0", "sessions": sessions}}})
	}

	fn session(decision: &str, state: &str, resolution: &str) -> Session {
		Session {
			transcode_decision: TranscodeDecision::from(Some(decision.to_string())),
			state: PlaybackState::from(Some(state.to_string())),
			video_resolution: Some(resolution.to_string()),
			..Default::default()
		}
	}

	fn counters_only() -> ActivityOptions {
		ActivityOptions {
			emit_per_session: false,
			..Default::default()
		}
	}

	#[test]
	fn empty_session_list_produces_nothing() {
		let out = aggregate_activity(&activity(json!([])), &ActivityOptions::default()).unwrap();
		assert!(out.points.is_empty());
		assert!(out.skipped.is_empty());

		let out = aggregate_activity(&activity(Value::Null), &ActivityOptions::default()).unwrap();
		assert!(out.points.is_empty());
	}

	#[test]
	fn direct_play_while_playing_counts_once_in_each_direct_counter() {
		let aggregate = SessionAggregate::from_sessions(&[session("direct play", "playing", "1080")]);

		assert_eq!(
			aggregate,
			SessionAggregate {
				total_stream_count: 1,
				total_stream_playing_count: 1,
				transcode_stream_count: 0,
				transcode_stream_playing_count: 0,
				direct_stream_count: 1,
				direct_stream_playing_count: 1,
			}
		);
	}

	#[test]
	fn unrecognised_decision_while_paused_counts_as_transcode_only() {
		let aggregate = SessionAggregate::from_sessions(&[session("transcode", "paused", "720")]);

		assert_eq!(aggregate.total_stream_count, 1);
		assert_eq!(aggregate.transcode_stream_count, 1);
		assert_eq!(aggregate.transcode_stream_playing_count, 0);
		assert_eq!(aggregate.total_stream_playing_count, 0);
		assert_eq!(aggregate.direct_stream_count, 0);
		assert_eq!(aggregate.direct_stream_playing_count, 0);
	}

	#[test]
	fn missing_decision_counts_as_transcode() {
		let aggregate = SessionAggregate::from_sessions(&[Session::default()]);
		assert_eq!(aggregate.transcode_stream_count, 1);
	}

	#[test]
	fn ungrouped_activity_emits_one_untagged_sessions_point() {
		let snapshot = activity(json!([
			{"transcode_decision": "direct play", "state": "playing", "video_resolution": "1080"},
			{"transcode_decision": "transcode", "state": "playing", "video_resolution": "720"},
			{"transcode_decision": "copy", "state": "paused", "video_resolution": "1080"}
		]));

		let out = aggregate_activity(&snapshot, &counters_only()).unwrap();
		assert_eq!(out.points.len(), 1);

		let point = &out.points[0];
		assert_eq!(point.measurement, "sessions");
		assert!(point.tags.is_empty());
		assert_eq!(point.field_value("total_stream_count"), Some(FieldValue::Integer(3)));
		assert_eq!(point.field_value("total_stream_playing_count"), Some(FieldValue::Integer(2)));
		assert_eq!(point.field_value("transcode_stream_count"), Some(FieldValue::Integer(2)));
		assert_eq!(point.field_value("transcode_stream_playing_count"), Some(FieldValue::Integer(1)));
		assert_eq!(point.field_value("direct_stream_count"), Some(FieldValue::Integer(1)));
		assert_eq!(point.field_value("direct_stream_playing_count"), Some(FieldValue::Integer(1)));
	}

	#[test]
	fn grouping_preserves_first_seen_order_and_lowercases() {
		let sessions = vec![
			session("direct play", "playing", "SD"),
			session("transcode", "playing", "1080"),
			session("direct play", "paused", "sd"),
			Session::default(),
			session("transcode", "paused", "4k"),
		];

		let groups = group_by_resolution(&sessions);
		let keys: Vec<_> = groups.iter().map(|g| g.resolution.as_str()).collect();
		assert_eq!(keys, vec!["sd", "1080", "", "4k"]);
		assert_eq!(groups[0].sessions.len(), 2);
		assert_eq!(group_by_resolution(&sessions), groups);
	}

	#[test]
	fn grouped_activity_tags_each_point_with_resolution() {
		let snapshot = activity(json!([
			{"transcode_decision": "direct play", "state": "playing", "video_resolution": "1080"},
			{"transcode_decision": "transcode", "state": "playing", "video_resolution": "SD"},
			{"transcode_decision": "direct play", "state": "paused", "video_resolution": "1080"},
			{"transcode_decision": "direct play", "state": "paused"}
		]));
		let options = ActivityOptions {
			group_by_resolution: true,
			..counters_only()
		};

		let out = aggregate_activity(&snapshot, &options).unwrap();
		let resolutions: Vec<_> = out.points.iter().map(|p| p.tag_value("resolution")).collect();
		assert_eq!(resolutions, vec![Some("1080"), Some("sd"), None]);
		assert_eq!(
			out.points[0].field_value("direct_stream_count"),
			Some(FieldValue::Integer(2))
		);
		assert_eq!(
			out.points[1].field_value("transcode_stream_playing_count"),
			Some(FieldValue::Integer(1))
		);
	}

	#[test]
	fn per_session_points_precede_counters() {
		let snapshot = activity(json!([
			{"session_id": "a", "transcode_decision": "direct play", "state": "playing"},
			{"session_id": "b", "transcode_decision": "transcode", "state": "buffering"}
		]));

		let out = aggregate_activity(&snapshot, &ActivityOptions::default()).unwrap();
		let names: Vec<_> = out.points.iter().map(|p| p.measurement.as_str()).collect();
		assert_eq!(names, vec!["session", "session", "sessions"]);
		assert_eq!(out.points[1].tag_value("session_id"), Some("b"));
	}

	#[test]
	fn emissions_toggle_independently() {
		let snapshot = activity(json!([{"state": "playing"}]));
		let options = ActivityOptions {
			emit_aggregate: false,
			..Default::default()
		};

		let out = aggregate_activity(&snapshot, &options).unwrap();
		assert_eq!(out.points.len(), 1);
		assert_eq!(out.points[0].measurement, "session");
	}

	#[test]
	fn undecodable_session_is_skipped() {
		let snapshot = activity(json!([{"state": 5}, {"state": "playing"}]));
		let out = aggregate_activity(&snapshot, &counters_only()).unwrap();

		assert_eq!(out.skipped.len(), 1);
		assert_eq!(out.skipped[0].index, 0);
		assert_eq!(
			out.points[0].field_value("total_stream_count"),
			Some(FieldValue::Integer(1))
		);
	}

	#[test]
	fn broken_envelope_fails_the_snapshot() {
		let err = aggregate_activity(&json!({"oops": true}), &ActivityOptions::default()).unwrap_err();
		assert_eq!(err, crate::SnapshotError::MissingField("response"));
	}

	#[test]
	fn library_point_has_numeric_count_and_tags() {
		let snapshot = json!({"response": {"result": "success", "data": [
			{"section_type": "movie", "section_name": "Movies", "count": "42"}
		]}});

		let out = aggregate_libraries(&snapshot).unwrap();
		assert_eq!(out.points.len(), 1);

		let point = &out.points[0];
		assert_eq!(point.measurement, "library");
		assert_eq!(point.fields.len(), 1);
		assert_eq!(point.field_value("count"), Some(FieldValue::Integer(42)));
		assert_eq!(point.tag_value("type"), Some("movie"));
		assert_eq!(point.tag_value("section"), Some("Movies"));
	}

	#[test]
	fn bad_library_record_does_not_abort_batch() {
		let snapshot = json!({"response": {"data": [
			{"section_type": "show", "section_name": "TV", "count": "n/a"},
			{"section_type": "artist", "section_name": "Music", "count": 7}
		]}});

		let out = aggregate_libraries(&snapshot).unwrap();
		assert_eq!(out.points.len(), 1);
		assert_eq!(out.points[0].tag_value("section"), Some("Music"));
		assert_eq!(out.skipped.len(), 1);
		assert_eq!(out.skipped[0].index, 0);
	}

	#[test]
	fn user_point_has_duration_plays_and_username() {
		let snapshot = json!({"response": {"data": {
			"recordsTotal": 1,
			"data": [{"friendly_name": "alice", "duration": 120, "plays": 3}]
		}}});

		let out = aggregate_users(&snapshot).unwrap();
		assert_eq!(out.points.len(), 1);

		let point = &out.points[0];
		assert_eq!(point.measurement, "users");
		assert_eq!(point.field_value("duration"), Some(FieldValue::Integer(120)));
		assert_eq!(point.field_value("plays"), Some(FieldValue::Integer(3)));
		assert_eq!(point.present_tags().collect::<Vec<_>>(), vec![("username", "alice")]);
	}

	#[test]
	fn users_list_must_be_an_array() {
		let snapshot = json!({"response": {"data": {"data": "nope"}}});
		assert!(aggregate_users(&snapshot).is_err());
	}

	fn arb_session() -> impl Strategy<Value = Session> {
		let decision = prop_oneof![
			Just(Some("direct play".to_string())),
			Just(Some("transcode".to_string())),
			Just(Some("copy".to_string())),
			Just(None),
			"[a-z ]{0,12}".prop_map(Some),
		];
		let state = prop_oneof![
			Just(Some("playing".to_string())),
			Just(Some("paused".to_string())),
			Just(Some("buffering".to_string())),
			Just(None),
		];
		let resolution = prop_oneof![
			Just(None),
			Just(Some("1080".to_string())),
			Just(Some("SD".to_string())),
			Just(Some("sd".to_string())),
			Just(Some("4k".to_string())),
		];

		(decision, state, resolution).prop_map(|(decision, state, resolution)| Session {
			transcode_decision: TranscodeDecision::from(decision),
			state: PlaybackState::from(state),
			video_resolution: resolution,
			..Default::default()
		})
	}

	proptest! {
		#[test]
		fn counters_are_consistent(sessions in prop::collection::vec(arb_session(), 1..40)) {
			let a = SessionAggregate::from_sessions(&sessions);

			prop_assert_eq!(a.total_stream_count, sessions.len() as u64);
			prop_assert_eq!(a.transcode_stream_count + a.direct_stream_count, a.total_stream_count);
			prop_assert!(a.total_stream_playing_count <= a.total_stream_count);
			prop_assert!(a.transcode_stream_playing_count <= a.transcode_stream_count);
			prop_assert!(a.direct_stream_playing_count <= a.direct_stream_count);
			prop_assert!(a.transcode_stream_playing_count <= a.total_stream_playing_count);
			prop_assert!(a.direct_stream_playing_count <= a.total_stream_playing_count);
			prop_assert_eq!(
				a.transcode_stream_playing_count + a.direct_stream_playing_count,
				a.total_stream_playing_count
			);
		}

		#[test]
		fn groups_partition_the_sessions(sessions in prop::collection::vec(arb_session(), 0..40)) {
			let groups = group_by_resolution(&sessions);
			let grouped: usize = groups.iter().map(|g| g.sessions.len()).sum();
			prop_assert_eq!(grouped, sessions.len());

			let totals: u64 = groups
				.iter()
				.map(|g| SessionAggregate::from_sessions(g.sessions.iter().copied()).total_stream_count)
				.sum();
			prop_assert_eq!(totals, sessions.len() as u64);
		}
	}
}
