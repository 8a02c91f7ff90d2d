/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! refresh of Two-Line Element sets for a catalog of tracked spacecraft.
//!
//! For each stale spacecraft record we download a TLE catalog (plain HTTP or space-track.org login query),
//! pick the two element lines of our spacecraft, resolve the element epoch and write lines and epoch back
//! into the [`store::SpacecraftStore`]. Failures are isolated per record - the next scheduled run picks
//! up whatever is still stale

use chrono::{DateTime,TimeDelta,Utc};
use serde::{Deserialize,Serialize};
use strum::{AsRefStr,Display,EnumString};

pub mod errors;
pub use errors::{OdinTleError,Result};

pub mod config;
pub use config::*;

pub mod catalog;
pub mod fetch;
pub mod epoch;
pub mod store;
pub mod refresh;

/// records that were refreshed more recently than this are not fetched again
pub const STALENESS_MINUTES: i64 = 15;

/// the stored epoch of spacecraft for which we never obtained a TLE (1970-01-01T00:00:00Z)
pub const EPOCH_SENTINEL: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

/// where we get the TLE catalog for a spacecraft from. The string values are what we store in the
/// `tle_source_type` column
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize,EnumString,Display,AsRefStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// open catalog retrieved with a plain GET request (e.g. celestrak.org)
    Http,
    /// catalog query that is executed by the space-track.org login endpoint
    SpaceTrack,
}

impl SourceKind {
    pub const ALL: [SourceKind;2] = [SourceKind::Http, SourceKind::SpaceTrack];

    pub fn requires_login (&self)->bool {
        matches!( self, SourceKind::SpaceTrack)
    }
}

/// the persisted spacecraft data we work on. Only the TLE lines, the epoch and the update time are ever
/// written by the refresh
#[derive(Debug,Clone,PartialEq)]
pub struct SpacecraftRecord {
    pub id: i64,
    pub name: String,
    pub source_kind: SourceKind,
    /// URL of the catalog (for SpaceTrack sources this is the query URL passed to the login endpoint)
    pub source_url: String,
    /// the token that identifies our spacecraft within the catalog (name or catalog number line)
    pub source_uri: String,
    pub tle_line_0: String,
    pub tle_line_1: String,
    pub epoch: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl SpacecraftRecord {
    pub fn has_tle (&self)->bool {
        self.epoch != EPOCH_SENTINEL
    }

    /// the in-memory version of the store staleness predicate
    pub fn is_refresh_candidate (&self, now: DateTime<Utc>)->bool {
        !self.has_tle() || self.updated < staleness_cutoff(now)
    }
}

/// the two element lines of a TLE as they were found in the catalog (no name line)
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct TleLines {
    pub line_0: String,
    pub line_1: String,
}

impl TleLines {
    pub fn new (line_0: impl Into<String>, line_1: impl Into<String>)->Self {
        TleLines { line_0: line_0.into(), line_1: line_1.into() }
    }
}

/// the new TLE state of a spacecraft record - this is always written as a unit
#[derive(Debug,Clone,PartialEq)]
pub struct TleUpdate {
    pub lines: TleLines,
    pub epoch: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// records updated before the returned time are stale
pub fn staleness_cutoff (now: DateTime<Utc>)->DateTime<Utc> {
    now - TimeDelta::minutes( STALENESS_MINUTES)
}
