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

use std::{str::FromStr, time::Duration};
use tokio;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info,warn};
use tracing_subscriber::EnvFilter;
use odin_tle::{
    SourceKind, TleRefreshConfig, load_config, load_config_path,
    epoch::SatkitEpochParser, fetch::TleFetcher, refresh::TleRefresher, store::SqliteSpacecraftStore
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "update stale TLEs of spacecraft in a sqlite database")]
pub struct Args {
    /// sqlite database URL
    #[arg(long, default_value = "sqlite://spacecraft.db")]
    pub db: String,

    /// path of config file (default is to look up tle_refresh.ron in the ODIN config dirs)
    #[arg(short, long)]
    pub config: Option<String>,

    /// create database and spacecraft table if they don't exist
    #[arg(long)]
    pub init: bool,

    /// only update spacecraft with this source type: http, spacetrack or all (default)
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,

    /// repeat every N minutes (single run if not set)
    #[arg(short, long)]
    pub interval: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Http,
    Spacetrack,
    All,
}

impl KindArg {
    /// the single source kind to refresh, or None for all of them
    pub fn source_kind (&self)->Option<SourceKind> {
        match self {
            KindArg::Http => Some(SourceKind::Http),
            KindArg::Spacetrack => Some(SourceKind::SpaceTrack),
            KindArg::All => None
        }
    }
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config: TleRefreshConfig = match &args.config {
        Some(path) => load_config_path( path)?,
        None => load_config( "tle_refresh.ron").unwrap_or_else( |e| {
            warn!("using default config: {e}");
            TleRefreshConfig::default()
        })
    };

    let opts = SqliteConnectOptions::from_str( &args.db)?.create_if_missing( args.init);
    let pool = SqlitePoolOptions::new().max_connections(1).connect_with( opts).await?;
    let store = SqliteSpacecraftStore::new( pool.clone());
    if args.init {
        store.create_schema().await?;
    }

    let fetcher = TleFetcher::new( &config)?;
    let refresher = TleRefresher::new( &store, fetcher, SatkitEpochParser);

    loop {
        if let Some(kind) = args.kind.and_then( |k| k.source_kind()) {
            if let Ok(summary) = refresher.refresh( kind).await {
                info!("{summary:?}");
            }
        } else {
            for summary in refresher.refresh_all().await {
                info!("{summary:?}");
            }
        }

        match args.interval {
            Some(minutes) => tokio::time::sleep( Duration::from_secs( minutes * 60)).await,
            None => break
        }
    }

    pool.close().await;
    Ok(())
}
