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

//! catalog downloads. Both source kinds share one long-lived [`Client`] that is configured once with
//! user agent, timeouts and redirect policy

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, redirect::Policy};
use tracing::debug;
use crate::{
    SourceKind, SpacecraftRecord, TleLines, TleRefreshConfig, SpaceTrackConfig, SpaceTrackCredentials,
    catalog::extract_tle_lines,
    errors::{OdinTleError, Result, transport_error}
};

const INITIAL_BUF_SIZE: usize = 64 * 1024;

/// something that can obtain the raw TLE catalog text for a spacecraft record
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// can we retrieve catalogs of this kind at all (e.g. do we have credentials)
    fn supports (&self, _kind: SourceKind)->bool { true }

    async fn fetch_catalog (&self, rec: &SpacecraftRecord)->Result<String>;

    /// fetch the catalog and pick the element lines of `rec`. The catalog text is dropped before we return
    async fn fetch_tle (&self, rec: &SpacecraftRecord)->Result<TleLines> {
        let blob = self.fetch_catalog( rec).await?;
        match extract_tle_lines( &blob, &rec.source_uri) {
            Err(OdinTleError::NotFound{uri,..}) if rec.source_kind.requires_login() => {
                // space-track.org answers bad logins with a 200 error page
                Err( OdinTleError::NotFound{ uri, auth_hint: true })
            }
            other => other
        }
    }
}

/// the reqwest based fetcher for open (GET) and space-track.org (login POST) catalogs
#[derive(Debug,Clone)]
pub struct TleFetcher {
    client: Client,
    max_catalog_size: usize,
    spacetrack: Option<SpaceTrackConfig>,
}

impl TleFetcher {
    pub fn new (config: &TleRefreshConfig)->Result<Self> {
        let client = Client::builder()
            .user_agent( config.user_agent.as_str())
            .timeout( config.request_timeout)
            .connect_timeout( config.connect_timeout)
            .redirect( Policy::limited( config.max_redirects))
            .build()?;

        Ok( TleFetcher { client, max_catalog_size: config.max_catalog_size, spacetrack: config.spacetrack.clone() } )
    }

    pub fn has_spacetrack_credentials (&self)->bool {
        self.spacetrack.is_some()
    }

    /// plain `GET <url>`
    pub async fn fetch_open (&self, url: &str)->Result<String> {
        debug!("GET {url}");
        let response = self.client.get( url).send().await?;
        self.read_catalog( response).await
    }

    /// `POST <login_url>` with form fields `identity`, `password` and `query`. The login endpoint runs the query
    /// and returns its result in the same response if the login succeeded
    pub async fn fetch_authenticated (&self, login_url: &str, credentials: &SpaceTrackCredentials, query_url: &str)->Result<String> {
        debug!("POST {login_url} query={query_url}");
        let form = [
            ("identity", credentials.identity.as_str()),
            ("password", credentials.password.as_str()),
            ("query", query_url),
        ];
        let response = self.client.post( login_url).form( &form).send().await?;
        self.read_catalog( response).await
    }

    /// accumulate the response body chunk-wise since we don't know the catalog size up-front
    async fn read_catalog (&self, mut response: Response)->Result<String> {
        let status = response.status();
        if status != StatusCode::OK {
            return Err( OdinTleError::HttpStatusError { status, url: response.url().to_string() })
        }

        let capacity = response.content_length()
            .map( |len| (len as usize).min( self.max_catalog_size))
            .unwrap_or( INITIAL_BUF_SIZE);
        let mut buf: Vec<u8> = Vec::with_capacity( capacity);

        while let Some(chunk) = response.chunk().await? {
            if buf.len() + chunk.len() > self.max_catalog_size {
                return Err( transport_error!("catalog {} exceeds {} bytes", response.url(), self.max_catalog_size))
            }
            buf.extend_from_slice( &chunk);
        }
        debug!("received {} bytes from {}", buf.len(), response.url());

        Ok( String::from_utf8( buf).unwrap_or_else( |e| String::from_utf8_lossy( e.as_bytes()).into_owned()) )
    }
}

#[async_trait]
impl CatalogFetcher for TleFetcher {
    fn supports (&self, kind: SourceKind)->bool {
        !kind.requires_login() || self.has_spacetrack_credentials()
    }

    async fn fetch_catalog (&self, rec: &SpacecraftRecord)->Result<String> {
        match rec.source_kind {
            SourceKind::Http => self.fetch_open( &rec.source_url).await,
            SourceKind::SpaceTrack => {
                let st = self.spacetrack.as_ref()
                    .ok_or_else( || transport_error!("no space-track.org credentials configured"))?;
                self.fetch_authenticated( &st.login_url, &st.credentials, &rec.source_url).await
            }
        }
    }
}
