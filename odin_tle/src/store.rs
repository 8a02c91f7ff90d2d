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

use std::str::FromStr;
use async_trait::async_trait;
use chrono::{DateTime,Utc};
use sqlx::{FromRow, SqlitePool};
use crate::{
    EPOCH_SENTINEL, SourceKind, SpacecraftRecord, TleLines, TleUpdate, staleness_cutoff,
    errors::{OdinTleError, Result, query_error}
};

/// the spacecraft table as seen by the TLE refresh
#[async_trait]
pub trait SpacecraftStore: Send + Sync {
    /// all records of `kind` that never got a TLE or have not been updated within the staleness window
    async fn stale_records (&self, kind: SourceKind, now: DateTime<Utc>)->Result<Vec<SpacecraftRecord>>;

    /// atomically set lines, epoch and update time of record `id`
    async fn update_tle (&self, id: i64, update: &TleUpdate)->Result<()>;
}

/// data for new spacecraft records (TLE fields start out empty)
#[derive(Debug,Clone)]
pub struct NewSpacecraft {
    pub name: String,
    pub source_kind: SourceKind,
    pub source_url: String,
    pub source_uri: String,
}

/* #region sqlite store *****************************************************************************/

// timestamps are stored as epoch millis, 0 being "never"
const CREATE_SCHEMA_SQL: &'static str = "CREATE TABLE IF NOT EXISTS spacecraft (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    tle_source_type TEXT NOT NULL,
    tle_source_url TEXT NOT NULL,
    tle_spacecraft_uri TEXT NOT NULL,
    tle_lines_0 TEXT NOT NULL DEFAULT '',
    tle_lines_1 TEXT NOT NULL DEFAULT '',
    tle_epoch INTEGER NOT NULL DEFAULT 0,
    tle_updated INTEGER NOT NULL DEFAULT 0
)";

const SELECT_COLUMNS: &'static str = "SELECT id,name,tle_source_type,tle_source_url,tle_spacecraft_uri,tle_lines_0,tle_lines_1,tle_epoch,tle_updated FROM spacecraft";

pub const UPDATE_TLE_SQL: &'static str = "UPDATE spacecraft SET tle_lines_0 = ?, tle_lines_1 = ?, tle_epoch = ?, tle_updated = ? WHERE id = ?";

#[derive(Debug,FromRow)]
struct SpacecraftRow {
    id: i64,
    name: String,
    tle_source_type: String,
    tle_source_url: String,
    tle_spacecraft_uri: String,
    tle_lines_0: String,
    tle_lines_1: String,
    tle_epoch: i64,
    tle_updated: i64,
}

impl TryFrom<SpacecraftRow> for SpacecraftRecord {
    type Error = OdinTleError;

    fn try_from (row: SpacecraftRow)->Result<Self> {
        let source_kind = SourceKind::from_str( &row.tle_source_type)
            .map_err(|_| query_error( format!("unknown tle_source_type {:?} of spacecraft {}", row.tle_source_type, row.id)))?;

        Ok( SpacecraftRecord {
            id: row.id,
            name: row.name,
            source_kind,
            source_url: row.tle_source_url,
            source_uri: row.tle_spacecraft_uri,
            tle_line_0: row.tle_lines_0,
            tle_line_1: row.tle_lines_1,
            epoch: from_epoch_millis( row.tle_epoch)?,
            updated: from_epoch_millis( row.tle_updated)?,
        })
    }
}

fn from_epoch_millis (millis: i64)->Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis( millis).ok_or_else(|| query_error( format!("timestamp out of range: {millis}")))
}

/// [`SpacecraftStore`] on top of a caller owned sqlite pool
#[derive(Debug,Clone)]
pub struct SqliteSpacecraftStore {
    pool: SqlitePool,
}

impl SqliteSpacecraftStore {
    pub fn new (pool: SqlitePool)->Self {
        SqliteSpacecraftStore { pool }
    }

    pub async fn create_schema (&self)->Result<()> {
        sqlx::query( CREATE_SCHEMA_SQL).execute( &self.pool).await.map_err( query_error)?;
        Ok(())
    }

    /// add a spacecraft without TLE data, returning the new record id
    pub async fn insert_spacecraft (&self, sc: &NewSpacecraft)->Result<i64> {
        let res = sqlx::query( "INSERT INTO spacecraft (name,tle_source_type,tle_source_url,tle_spacecraft_uri,tle_epoch,tle_updated) VALUES (?,?,?,?,?,?)")
            .bind( &sc.name)
            .bind( sc.source_kind.as_ref())
            .bind( &sc.source_url)
            .bind( &sc.source_uri)
            .bind( EPOCH_SENTINEL.timestamp_millis())
            .bind( EPOCH_SENTINEL.timestamp_millis())
            .execute( &self.pool).await
            .map_err( query_error)?;

        Ok( res.last_insert_rowid() )
    }

    pub async fn get_spacecraft (&self, id: i64)->Result<Option<SpacecraftRecord>> {
        let row: Option<SpacecraftRow> = sqlx::query_as( &format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind( id)
            .fetch_optional( &self.pool).await
            .map_err( query_error)?;

        row.map( SpacecraftRecord::try_from).transpose()
    }

    pub async fn all_spacecraft (&self)->Result<Vec<SpacecraftRecord>> {
        let rows: Vec<SpacecraftRow> = sqlx::query_as( &format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all( &self.pool).await
            .map_err( query_error)?;

        rows.into_iter().map( SpacecraftRecord::try_from).collect()
    }
}

#[async_trait]
impl SpacecraftStore for SqliteSpacecraftStore {
    async fn stale_records (&self, kind: SourceKind, now: DateTime<Utc>)->Result<Vec<SpacecraftRecord>> {
        let rows: Vec<SpacecraftRow> = sqlx::query_as( &format!("{SELECT_COLUMNS} WHERE tle_source_type = ? AND (tle_epoch = ? OR tle_updated < ?) ORDER BY id"))
            .bind( kind.as_ref())
            .bind( EPOCH_SENTINEL.timestamp_millis())
            .bind( staleness_cutoff( now).timestamp_millis())
            .fetch_all( &self.pool).await
            .map_err( query_error)?;

        rows.into_iter().map( SpacecraftRecord::try_from).collect()
    }

    async fn update_tle (&self, id: i64, update: &TleUpdate)->Result<()> {
        let TleUpdate { lines: TleLines { line_0, line_1 }, epoch, updated } = update;
        let epoch_millis = epoch.timestamp_millis();
        let updated_millis = updated.timestamp_millis();

        let persist_error = |reason: String| OdinTleError::PersistError {
            statement: UPDATE_TLE_SQL.to_string(),
            values: format!("[{line_0:?}, {line_1:?}, {epoch_millis}, {updated_millis}, {id}]"),
            reason
        };

        let res = sqlx::query( UPDATE_TLE_SQL)
            .bind( line_0)
            .bind( line_1)
            .bind( epoch_millis)
            .bind( updated_millis)
            .bind( id)
            .execute( &self.pool).await
            .map_err( |e| persist_error( e.to_string()))?;

        if res.rows_affected() == 1 {
            Ok(())
        } else {
            Err( persist_error( format!("{} rows affected", res.rows_affected())) )
        }
    }
}

/* #endregion sqlite store */
