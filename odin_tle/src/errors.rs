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

use thiserror::Error;
use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, OdinTleError>;

#[derive(Error,Debug)]
pub enum OdinTleError {

    /// the staleness query could not be executed - this aborts the refresh of a source kind
    #[error("spacecraft query failed {0}")]
    QueryError( String ),

    #[error("transport error {0}")]
    TransportError( String ),

    #[error("download of {url} failed with HTTP status {status}")]
    HttpStatusError { status: StatusCode, url: String },

    #[error("spacecraft URI {uri:?} not found in downloaded TLE{}", credentials_hint(.auth_hint))]
    NotFound { uri: String, auth_hint: bool },

    #[error("malformed catalog {0}")]
    MalformedCatalog( String ),

    #[error("TLE parse error {0}")]
    ParseError( String ),

    #[error("TLE update failed: {reason} (statement: {statement} values: {values})")]
    PersistError { statement: String, values: String, reason: String },

    #[error("config error {0}")]
    ConfigError( String ),

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),
}

impl From<reqwest::Error> for OdinTleError {
    fn from (e: reqwest::Error)->Self {
        if let Some(status) = e.status() {
            let url = e.url().map( |u| u.to_string()).unwrap_or_default();
            OdinTleError::HttpStatusError { status, url }
        } else {
            OdinTleError::TransportError( e.to_string())
        }
    }
}

impl From<ron::error::SpannedError> for OdinTleError {
    fn from (e: ron::error::SpannedError)->Self { OdinTleError::ConfigError( e.to_string()) }
}

fn credentials_hint (auth_hint: &bool)->&'static str {
    if *auth_hint { " (credentials may be invalid)" } else { "" }
}

impl OdinTleError {
    /// is this the error of a failed staleness query (which aborts the whole source kind)
    pub fn is_fatal (&self)->bool {
        matches!( self, OdinTleError::QueryError(_))
    }

    /// the refresh pipeline stage this error originates from (for diagnostics)
    pub fn stage (&self)->&'static str {
        use OdinTleError::*;
        match self {
            QueryError(_) => "query",
            TransportError(_) | HttpStatusError{..} => "fetch",
            NotFound{..} | MalformedCatalog(_) => "extract",
            ParseError(_) => "epoch",
            PersistError{..} => "persist",
            ConfigError(_) | IOError(_) => "config",
        }
    }
}

macro_rules! parse_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinTleError::ParseError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use parse_error;

macro_rules! transport_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinTleError::TransportError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use transport_error;

macro_rules! config_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinTleError::ConfigError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use config_error;

pub fn query_error (e: impl ToString)->OdinTleError {
    OdinTleError::QueryError( e.to_string())
}
