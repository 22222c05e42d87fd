// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Serialize;

use crate::report::CycleReport;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
	Healthy,
	Degraded,
	Unhealthy,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PollerState {
	/// Waiting for the next cycle, or not started.
	Idle,
	Running,
	/// Terminal.
	Stopped,
}

#[derive(Debug, Clone, Serialize)]
pub struct PollerStatus {
	pub state: PollerState,
	pub health: HealthState,
	pub cycles_completed: u64,
	/// Cycles in a row in which at least one data kind could not be fetched.
	pub consecutive_failed_cycles: u32,
	pub last_report: Option<CycleReport>,
}

pub fn determine_health_state(consecutive_failed_cycles: u32) -> HealthState {
	if consecutive_failed_cycles >= 3 {
		HealthState::Unhealthy
	} else if consecutive_failed_cycles >= 1 {
		HealthState::Degraded
	} else {
		HealthState::Healthy
	}
}
