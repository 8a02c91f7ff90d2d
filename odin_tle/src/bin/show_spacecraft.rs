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

use tokio;
use anyhow::Result;
use clap::Parser;
use sqlx::SqlitePool;
use odin_tle::store::SqliteSpacecraftStore;

#[derive(Parser, Debug)]
#[command(version, about, long_about = "list spacecraft records and their TLE state")]
pub struct Args {
    /// sqlite database URL
    #[arg(long, default_value = "sqlite://spacecraft.db")]
    pub db: String,

    /// also print TLE lines
    #[arg(short, long)]
    pub lines: bool,
}

#[tokio::main]
async fn main()->Result<()> {
    let args = Args::parse();

    let pool = SqlitePool::connect( &args.db).await?;
    let store = SqliteSpacecraftStore::new( pool.clone());

    for rec in store.all_spacecraft().await? {
        let epoch = if rec.has_tle() { rec.epoch.format("%Y-%m-%d %H:%M:%S").to_string() } else { "-".to_string() };
        println!("{:5} {:24} {:10} epoch: {:19}  updated: {}", rec.id, rec.name, rec.source_kind, epoch, rec.updated.format("%Y-%m-%d %H:%M:%S"));
        if args.lines && rec.has_tle() {
            println!("      {}", rec.tle_line_0);
            println!("      {}", rec.tle_line_1);
        }
    }

    pool.close().await;
    Ok(())
}
