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
#![allow(unused)]

use std::time::Duration;
use axum::{Form, Router, http::StatusCode, response::{IntoResponse, Redirect, Response}, routing::{get, post}};
use serde::Deserialize;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use odin_tle::{
    SourceKind, SpaceTrackConfig, SpaceTrackCredentials, TleLines, TleRefreshConfig,
    epoch::{ElementEpoch, EpochParser},
    errors::Result,
    store::{NewSpacecraft, SqliteSpacecraftStore}
};

/* #region test-data *************************************************************/

pub const ISS_L1: &'static str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
pub const ISS_L2: &'static str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

pub const NOAA21_L1: &'static str = "1 54234U 22150A   25076.92835707  .00000366  00000-0  19403-3 0  9994";
pub const NOAA21_L2: &'static str = "2 54234  98.7204  17.0432 0002710  72.7407 287.4066 14.19556514121811";

pub const CATALOG: &'static str = "\
ISS (ZARYA)             
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
NOAA 21                 
1 54234U 22150A   25076.92835707  .00000366  00000-0  19403-3 0  9994
2 54234  98.7204  17.0432 0002710  72.7407 287.4066 14.19556514121811
BROKEN                  
line-A
line-B
";

pub const SIMPLE_CATALOG: &'static str = "ID123\nline-A\nline-B\nOTHER\nline-C\nline-D\n";

pub const USER: &'static str = "user@example.com";
pub const PASSWORD: &'static str = "secret";

/* #endregion test-data */

/* #region mock catalog server ***************************************************/

#[derive(Deserialize)]
struct LoginForm {
    identity: String,
    password: String,
    query: String,
}

async fn login (Form(form): Form<LoginForm>)->Response {
    if form.identity != USER || form.password != PASSWORD {
        // that is what space-track.org does
        return (StatusCode::OK, "<html><body>Failed: login incorrect</body></html>").into_response()
    }

    if form.query.ends_with("/catalog.txt") {
        CATALOG.into_response()
    } else if form.query.ends_with("/simple.txt") {
        SIMPLE_CATALOG.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// start a catalog server on a free local port and return its base URL
pub async fn start_catalog_server ()->String {
    let app = Router::new()
        .route("/catalog.txt", get(|| async { CATALOG }))
        .route("/simple.txt", get(|| async { SIMPLE_CATALOG }))
        .route("/moved.txt", get(|| async { Redirect::temporary("/catalog.txt") }))
        .route("/missing.txt", get(|| async { StatusCode::NOT_FOUND }))
        .route("/error.txt", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "server error") }))
        .route("/slow.txt", get(|| async {
            tokio::time::sleep( Duration::from_secs(5)).await;
            CATALOG
        }))
        .route("/ajaxauth/login", post(login));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn( async move {
        axum::serve( listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

pub fn test_config (base_url: &str, password: &str)->TleRefreshConfig {
    TleRefreshConfig {
        request_timeout: Duration::from_secs(2),
        spacetrack: Some( SpaceTrackConfig {
            login_url: format!("{base_url}/ajaxauth/login"),
            credentials: SpaceTrackCredentials { identity: USER.to_string(), password: password.to_string() }
        }),
        ..TleRefreshConfig::default()
    }
}

/* #endregion mock catalog server */

/* #region store and parser helpers **********************************************/

/// in-memory sqlite databases only live as long as their connection, hence a single non-expiring one
pub async fn memory_store ()->(SqlitePool, SqliteSpacecraftStore) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout( None::<Duration>)
        .max_lifetime( None::<Duration>)
        .connect("sqlite::memory:").await.unwrap();

    let store = SqliteSpacecraftStore::new( pool.clone());
    store.create_schema().await.unwrap();
    (pool, store)
}

pub async fn add_spacecraft (store: &SqliteSpacecraftStore, name: &str, kind: SourceKind, url: &str, uri: &str)->i64 {
    let sc = NewSpacecraft {
        name: name.to_string(),
        source_kind: kind,
        source_url: url.to_string(),
        source_uri: uri.to_string(),
    };
    store.insert_spacecraft( &sc).await.unwrap()
}

/// accepts any lines and always reports the same epoch
pub struct FixedEpochParser(pub ElementEpoch);

impl EpochParser for FixedEpochParser {
    fn parse_epoch (&self, _lines: &TleLines)->Result<ElementEpoch> {
        Ok( self.0 )
    }
}

/* #endregion store and parser helpers */
