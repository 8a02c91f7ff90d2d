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

use std::{env, fs, path::{Path,PathBuf}, time::Duration};
use serde::{Deserialize,Serialize};
use crate::errors::{config_error, Result};

pub const CONFIGS: &'static str = "configs";

pub const SPACETRACK_LOGIN_URL: &'static str = "https://www.space-track.org/ajaxauth/login";

/// the form fields we send to the space-track.org login endpoint (together with the `query`)
#[derive(Serialize,Deserialize,Clone)]
pub struct SpaceTrackCredentials {
    pub identity: String,
    pub password: String,
}

// we don't want passwords in log output
impl std::fmt::Debug for SpaceTrackCredentials {
    fn fmt (&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpaceTrackCredentials").field("identity", &self.identity).field("password", &"***").finish()
    }
}

#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct SpaceTrackConfig {
    #[serde(default = "default_login_url")]
    pub login_url: String,
    pub credentials: SpaceTrackCredentials,
}

fn default_login_url ()->String { SPACETRACK_LOGIN_URL.to_string() }

/// configuration of TLE downloads
#[derive(Serialize,Deserialize,Debug,Clone)]
#[serde(default)]
pub struct TleRefreshConfig {
    pub user_agent: String,

    /// upper bound for a complete request (connect, send, receive body)
    pub request_timeout: Duration,
    pub connect_timeout: Duration,

    pub max_redirects: usize,

    /// max number of bytes we accept for a downloaded catalog
    pub max_catalog_size: usize,

    /// without this we skip all SpaceTrack sources
    pub spacetrack: Option<SpaceTrackConfig>,
}

impl Default for TleRefreshConfig {
    fn default ()->Self {
        TleRefreshConfig {
            user_agent: format!("odin_tle/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 5,
            max_catalog_size: 16 * 1024 * 1024,
            spacetrack: None,
        }
    }
}

/* #region config lookup ***************************************************************************/

/// load a RON config for this crate. We look for `configs/odin_tle/<filename>` in (in this order)
/// `$ODIN_HOME`, `~/.odin` and the crate source dir
pub fn load_config<C> (filename: &str) -> Result<C> where C: for <'a> Deserialize<'a> {
    match find_config_file( filename) {
        Some(path) => load_config_path( path),
        None => Err( config_error!("config file {filename} not found"))
    }
}

/// load a RON config from an explicit path
pub fn load_config_path<C,P> (path: P) -> Result<C> where C: for <'a> Deserialize<'a>, P: AsRef<Path> {
    let text = fs::read_to_string( path.as_ref())?;
    Ok( ron::de::from_str( &text)? )
}

pub fn find_config_file (filename: &str) -> Option<PathBuf> {
    let resource_crate = env!("CARGO_PKG_NAME");

    let mut roots: Vec<PathBuf> = Vec::with_capacity(3);
    if let Ok(odin_home) = env::var("ODIN_HOME") {
        roots.push( PathBuf::from( odin_home));
    }
    if let Ok(usr_home) = env::var("HOME") {
        roots.push( Path::new( &usr_home).join(".odin"));
    }
    roots.push( PathBuf::from( env!("CARGO_MANIFEST_DIR")));

    roots.into_iter()
        .map( |root| root.join( CONFIGS).join( resource_crate).join( filename))
        .find( |path| path.is_file())
}

/* #endregion config lookup */
