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

use chrono::{DateTime,Datelike,NaiveDate,TimeDelta,TimeZone,Utc};
use satkit::{TLE,Instant};
use crate::{TleLines, errors::{parse_error, Result}};

const TLE_LINE_LEN: usize = 69;
const MICROS_PER_DAY: f64 = 86_400_000_000.0;
const MAX_EPOCH_DEVIATION_SECS: f64 = 1.0;

/// the epoch as it is encoded in the first element line: a two digit year and a 1-based fractional
/// day of year (1.0 is Jan 1st 00:00 UTC)
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct ElementEpoch {
    pub year: u8,
    pub day: f64,
}

/// the orbital element parser we use to validate the TLE lines and obtain their epoch.
/// Implementations either return the epoch or reject the lines without partial results
pub trait EpochParser {
    fn parse_epoch (&self, lines: &TleLines)->Result<ElementEpoch>;
}

/// production parser that checks the line structure and checksums and then has satkit
/// parse the elements
#[derive(Debug,Clone,Copy,Default)]
pub struct SatkitEpochParser;

impl EpochParser for SatkitEpochParser {
    fn parse_epoch (&self, lines: &TleLines)->Result<ElementEpoch> {
        check_element_line( &lines.line_0, '1')?;
        check_element_line( &lines.line_1, '2')?;

        let tle = TLE::load_2line( &lines.line_0, &lines.line_1).map_err(|e| parse_error!("satkit TLE import failed {:?}", e))?;

        // columns 19-20 and 21-32 (1-based) of line 1. Both are ASCII so byte ranges are safe
        let l0 = &lines.line_0;
        let year: u8 = l0[18..20].trim().parse().map_err(|_| parse_error!("invalid epoch year {:?}", &l0[18..20]))?;
        let day: f64 = l0[20..32].trim().parse().map_err(|_| parse_error!("invalid epoch day {:?}", &l0[20..32]))?;
        let epoch = ElementEpoch { year, day };

        // the column epoch has to agree with what satkit parsed
        let dt = epoch_datetime( epoch)?;
        let t = Instant::from_unixtime( dt.timestamp_micros() as f64 / 1_000_000.0);
        let deviation = (t - tle.epoch).as_seconds().abs();
        if deviation > MAX_EPOCH_DEVIATION_SECS {
            return Err( parse_error!("epoch {} deviates {deviation}s from satkit epoch", dt.to_rfc3339()))
        }

        Ok( epoch )
    }
}

fn check_element_line (line: &str, line_no: char)->Result<()> {
    if !line.is_ascii() { return Err( parse_error!("non-ASCII element line {line_no}")) }
    if line.len() < TLE_LINE_LEN { return Err( parse_error!("element line {line_no} too short ({} chars)", line.len())) }

    let mut cs = line.chars();
    if cs.next() != Some(line_no) || cs.next() != Some(' ') {
        return Err( parse_error!("not a TLE line {line_no}: {line:?}"))
    }

    let expected = tle_checksum( line);
    let actual = line.as_bytes()[TLE_LINE_LEN-1];
    if actual != b'0' + expected {
        return Err( parse_error!("checksum mismatch in line {line_no}: expected {expected}, got {}", actual as char))
    }

    Ok(())
}

/// the modulo 10 checksum over the first 68 columns (digits count their value, '-' counts 1)
pub fn tle_checksum (line: &str)->u8 {
    let sum: u32 = line.bytes().take(TLE_LINE_LEN-1).map( |b| match b {
        b'0'..=b'9' => (b - b'0') as u32,
        b'-' => 1,
        _ => 0
    }).sum();
    (sum % 10) as u8
}

/// TLE years 57..99 are 1957..1999, 00..56 are 2000..2056
pub fn full_epoch_year (year: u8)->i32 {
    if year < 57 { 2000 + year as i32 } else { 1900 + year as i32 }
}

/// turn the element epoch into an absolute time. Fractional days are kept with microsecond resolution
pub fn epoch_datetime (epoch: ElementEpoch)->Result<DateTime<Utc>> {
    let ElementEpoch { year, day } = epoch;
    if year > 99 { return Err( parse_error!("epoch year {year} is not a two digit year")) }
    let full_year = full_epoch_year( year);
    let days_in_year = NaiveDate::from_ymd_opt( full_year, 12, 31)
        .ok_or_else(|| parse_error!("invalid epoch year {full_year}"))?
        .ordinal() as f64;

    // day N.x is within day N, i.e. the last valid day is days_in_year.999..
    if !day.is_finite() || day < 1.0 || day >= days_in_year + 1.0 {
        return Err( parse_error!("epoch day {day} out of range for {full_year}"))
    }

    let jan_1 = Utc.with_ymd_and_hms( full_year, 1, 1, 0, 0, 0).single()
        .ok_or_else(|| parse_error!("invalid epoch year {full_year}"))?;
    let offset = TimeDelta::microseconds( ((day - 1.0) * MICROS_PER_DAY).round() as i64);

    Ok( jan_1 + offset )
}

/// parse the lines and compute the absolute epoch
pub fn resolve_epoch (parser: &impl EpochParser, lines: &TleLines)->Result<DateTime<Utc>> {
    let epoch = parser.parse_epoch( lines)?;
    epoch_datetime( epoch)
}
