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

use chrono::Utc;
use tracing::{info,warn,error};
use crate::{
    SourceKind, SpacecraftRecord, TleUpdate,
    epoch::{EpochParser, resolve_epoch},
    fetch::CatalogFetcher,
    store::SpacecraftStore,
    errors::Result
};

/// what happened during the refresh of one source kind
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct RefreshSummary {
    pub kind: SourceKind,
    pub candidates: usize,
    pub updated: usize,
    pub failed: usize,
}

impl RefreshSummary {
    fn new (kind: SourceKind)->Self {
        RefreshSummary { kind, candidates: 0, updated: 0, failed: 0 }
    }
}

/// the fetch - extract - resolve - persist pipeline. Records are processed one at a time, a failing record
/// is logged and skipped. The store is owned by the caller
pub struct TleRefresher<'a, S: ?Sized, F, P> {
    store: &'a S,
    fetcher: F,
    parser: P,
}

impl<'a,S,F,P> TleRefresher<'a,S,F,P> where S: SpacecraftStore + ?Sized, F: CatalogFetcher, P: EpochParser {

    pub fn new (store: &'a S, fetcher: F, parser: P)->Self {
        TleRefresher { store, fetcher, parser }
    }

    /// refresh all stale records of `kind`. Only a failing staleness query is returned as an error
    pub async fn refresh (&self, kind: SourceKind)->Result<RefreshSummary> {
        let mut summary = RefreshSummary::new( kind);

        let records = match self.store.stale_records( kind, Utc::now()).await {
            Ok(records) => records,
            Err(e) => {
                error!("{kind} TLE update query failed: {e}");
                return Err(e)
            }
        };

        if records.is_empty() {
            info!("{kind} TLEs up to date");
            return Ok(summary)
        }
        summary.candidates = records.len();

        for rec in &records {
            info!(sat = rec.name.as_str(), id = rec.id, "updating {kind} TLE");

            match self.refresh_record( rec).await {
                Ok(update) => {
                    info!(sat = rec.name.as_str(), id = rec.id, "new TLE epoch {}", update.epoch.to_rfc3339());
                    summary.updated += 1;
                }
                Err(e) => {
                    warn!(sat = rec.name.as_str(), id = rec.id, stage = e.stage(), "TLE update failed: {e}");
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// run [`Self::refresh`] for all source kinds our fetcher supports. Query failures only abort the respective kind
    pub async fn refresh_all (&self)->Vec<RefreshSummary> {
        let mut summaries = Vec::with_capacity( SourceKind::ALL.len());

        for kind in SourceKind::ALL {
            if !self.fetcher.supports( kind) {
                info!("skipping {kind} TLEs (not configured)");
                continue
            }
            if let Ok(summary) = self.refresh( kind).await {
                summaries.push( summary);
            }
        }

        summaries
    }

    async fn refresh_record (&self, rec: &SpacecraftRecord)->Result<TleUpdate> {
        let lines = self.fetcher.fetch_tle( rec).await?;
        let epoch = resolve_epoch( &self.parser, &lines)?;

        let update = TleUpdate { lines, epoch, updated: Utc::now() };
        self.store.update_tle( rec.id, &update).await?;

        Ok(update)
    }
}
