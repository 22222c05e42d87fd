// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Playback sessions as reported by `get_activity`.

use serde::Deserialize;

use crate::de;
use crate::point::{measurement, MetricPoint};

/// Playback state of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<String>")]
pub enum PlaybackState {
	Playing,
	Paused,
	Stopped,
	Buffering,
	Other(String),
	#[default]
	Unknown,
}

impl From<Option<String>> for PlaybackState {
	fn from(raw: Option<String>) -> Self {
		let Some(raw) = raw.filter(|r| !r.is_empty()) else {
			return Self::Unknown;
		};
		match raw.as_str() {
			"playing" => Self::Playing,
			"paused" => Self::Paused,
			"stopped" => Self::Stopped,
			"buffering" => Self::Buffering,
			_ => Self::Other(raw),
		}
	}
}

impl PlaybackState {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Playing => Some("playing"),
			Self::Paused => Some("paused"),
			Self::Stopped => Some("stopped"),
			Self::Buffering => Some("buffering"),
			Self::Other(raw) => Some(raw),
			Self::Unknown => None,
		}
	}

	pub fn is_playing(&self) -> bool {
		matches!(self, Self::Playing)
	}
}

/// Whether the server is transcoding a session.
///
/// Only the literal `"direct play"` counts as direct play. Every other value,
/// including a missing one, is counted as a transcode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<String>")]
pub enum TranscodeDecision {
	DirectPlay,
	Copy,
	Transcode,
	Other(String),
	#[default]
	Unknown,
}

impl From<Option<String>> for TranscodeDecision {
	fn from(raw: Option<String>) -> Self {
		let Some(raw) = raw.filter(|r| !r.is_empty()) else {
			return Self::Unknown;
		};
		match raw.as_str() {
			"direct play" => Self::DirectPlay,
			"copy" => Self::Copy,
			"transcode" => Self::Transcode,
			_ => Self::Other(raw),
		}
	}
}

impl TranscodeDecision {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::DirectPlay => Some("direct play"),
			Self::Copy => Some("copy"),
			Self::Transcode => Some("transcode"),
			Self::Other(raw) => Some(raw),
			Self::Unknown => None,
		}
	}

	pub fn is_direct_play(&self) -> bool {
		matches!(self, Self::DirectPlay)
	}
}

/// One playback instance from a single activity snapshot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Session {
	#[serde(default, deserialize_with = "de::opt_string")]
	pub session_id: Option<String>,
	#[serde(default, deserialize_with = "de::opt_string")]
	pub session_key: Option<String>,
	#[serde(default)]
	pub state: PlaybackState,
	#[serde(default)]
	pub transcode_decision: TranscodeDecision,
	#[serde(default, deserialize_with = "de::opt_string")]
	pub video_resolution: Option<String>,
	#[serde(default, deserialize_with = "de::opt_string")]
	pub media_type: Option<String>,
	#[serde(default, deserialize_with = "de::opt_string")]
	pub full_title: Option<String>,
	#[serde(default, deserialize_with = "de::opt_string")]
	pub user: Option<String>,
	#[serde(default, deserialize_with = "de::opt_string")]
	pub player: Option<String>,
	#[serde(default, deserialize_with = "de::opt_string")]
	pub platform: Option<String>,
	#[serde(default, deserialize_with = "de::opt_f64")]
	pub progress_percent: Option<f64>,
	#[serde(default, deserialize_with = "de::opt_f64")]
	pub transcode_progress: Option<f64>,
	#[serde(default, deserialize_with = "de::opt_i64")]
	pub duration: Option<i64>,
	#[serde(default, deserialize_with = "de::opt_string")]
	pub section_id: Option<String>,
	#[serde(default, deserialize_with = "de::opt_string")]
	pub thumb: Option<String>,
	#[serde(default, deserialize_with = "de::opt_string")]
	pub content_rating: Option<String>,
	#[serde(default, deserialize_with = "de::opt_i64")]
	pub year: Option<i64>,
}

impl Session {
	/// Grouping key: lower-cased resolution, or `""` when unknown.
	pub fn resolution_key(&self) -> String {
		self
			.video_resolution
			.as_deref()
			.map(|r| r.trim().to_lowercase())
			.unwrap_or_default()
	}

	/// Per-session `session` point.
	///
	/// Tag keys `type`, `resolution`, `mediaType`, `title`, `player` and `user`
	/// match the series written by earlier plexpy2influx deployments.
	pub fn to_point(&self) -> MetricPoint {
		let resolution = Some(self.resolution_key()).filter(|r| !r.is_empty());

		MetricPoint::new(measurement::SESSION)
			.field("play_count", 1i64)
			.field_opt("progress_percent", self.progress_percent)
			.field_opt("transcode_progress", self.transcode_progress)
			.field_opt("duration", self.duration)
			.tag_opt("session_id", self.session_id.clone())
			.tag_opt("state", self.state.as_str().map(str::to_string))
			.tag_opt("type", self.transcode_decision.as_str().map(str::to_string))
			.tag_opt("resolution", resolution)
			.tag_opt("mediaType", self.media_type.clone())
			.tag_opt("title", self.full_title.clone())
			.tag_opt("player", self.player.clone())
			.tag_opt("platform", self.platform.clone())
			.tag_opt("user", self.user.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::point::FieldValue;
	use serde_json::json;

	#[test]
	fn decodes_plexpy_session_with_string_numbers() {
		let session: Session = serde_json::from_value(json!({
			"session_id": "abc",
			"session_key": 12,
			"state": "playing",
			"transcode_decision": "direct play",
			"video_resolution": "1080",
			"media_type": "episode",
			"full_title": "Show - Pilot",
			"user": "alice",
			"player": "Living Room",
			"platform": "Roku",
			"progress_percent": "45",
			"transcode_progress": 0,
			"duration": "2400000",
			"section_id": "2",
			"year": "2019"
		}))
		.unwrap();

		assert_eq!(session.session_key.as_deref(), Some("12"));
		assert_eq!(session.state, PlaybackState::Playing);
		assert!(session.transcode_decision.is_direct_play());
		assert_eq!(session.progress_percent, Some(45.0));
		assert_eq!(session.duration, Some(2_400_000));
		assert_eq!(session.year, Some(2019));
	}

	#[test]
	fn unknown_values_are_kept_verbatim() {
		let session: Session = serde_json::from_value(json!({
			"state": "error",
			"transcode_decision": "Transcode"
		}))
		.unwrap();

		assert_eq!(session.state, PlaybackState::Other("error".to_string()));
		assert_eq!(session.transcode_decision.as_str(), Some("Transcode"));
		assert!(!session.transcode_decision.is_direct_play());
	}

	#[test]
	fn missing_fields_default() {
		let session: Session = serde_json::from_value(json!({})).unwrap();
		assert_eq!(session.state, PlaybackState::Unknown);
		assert_eq!(session.transcode_decision, TranscodeDecision::Unknown);
		assert_eq!(session.resolution_key(), "");
	}

	#[test]
	fn resolution_key_is_lower_cased() {
		let session = Session {
			video_resolution: Some("SD".to_string()),
			..Default::default()
		};
		assert_eq!(session.resolution_key(), "sd");
	}

	#[test]
	fn session_point_carries_fields_and_tags() {
		let session = Session {
			session_id: Some("s1".to_string()),
			state: PlaybackState::Paused,
			transcode_decision: TranscodeDecision::Copy,
			video_resolution: Some("4K".to_string()),
			user: Some("bob".to_string()),
			progress_percent: Some(10.0),
			..Default::default()
		};

		let point = session.to_point();
		assert_eq!(point.measurement, "session");
		assert_eq!(point.field_value("play_count"), Some(FieldValue::Integer(1)));
		assert_eq!(point.field_value("progress_percent"), Some(FieldValue::Float(10.0)));
		assert!(point.field_value("duration").is_none());
		assert_eq!(point.tag_value("state"), Some("paused"));
		assert_eq!(point.tag_value("type"), Some("copy"));
		assert_eq!(point.tag_value("resolution"), Some("4k"));
		assert_eq!(point.tag_value("user"), Some("bob"));
		assert_eq!(point.tag_value("title"), None);
	}
}
