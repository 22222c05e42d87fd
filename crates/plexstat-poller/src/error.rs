// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollerError {
	#[error("poller already started")]
	AlreadyStarted,

	#[error("poller has been stopped")]
	Stopped,
}

pub type Result<T> = std::result::Result<T, PollerError>;
