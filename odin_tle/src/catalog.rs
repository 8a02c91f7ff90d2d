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

//! locating the TLE of a single spacecraft within a downloaded catalog.
//!
//! Catalogs are sequences of 3 line groups (name or id line followed by the two element lines), e.g.
//! ```text
//! ISS (ZARYA)
//! 1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
//! 2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
//! ```
//! A catalog line matches a spacecraft identifier if it is the identifier as a whole token: either the
//! line (without trailing whitespace) equals the identifier, or it starts with the identifier and the
//! next character is whitespace. This means "STARLINK-1" does not match a "STARLINK-10" line.

use std::str::Lines;
use crate::{TleLines, errors::{OdinTleError, Result}};

/// non-destructive iterator over the non-blank lines of a catalog. Lines are returned without line
/// terminator (both `\n` and `\r\n`) and trailing whitespace. Restart by cloning or creating a new one
#[derive(Debug,Clone)]
pub struct CatalogLines<'a> {
    lines: Lines<'a>,
}

impl<'a> CatalogLines<'a> {
    pub fn new (blob: &'a str)->Self {
        CatalogLines { lines: blob.lines() }
    }
}

impl<'a> Iterator for CatalogLines<'a> {
    type Item = &'a str;

    fn next (&mut self)->Option<&'a str> {
        while let Some(line) = self.lines.next() {
            let line = line.trim_end();
            if !line.is_empty() { return Some(line) }
        }
        None
    }
}

/// does `line` start with the whole-token `identifier`
pub fn matches_identifier (line: &str, identifier: &str)->bool {
    let id = identifier.trim();
    if id.is_empty() { return false }

    let line = line.trim_end();
    match line.strip_prefix( id) {
        Some(rest) => rest.is_empty() || rest.starts_with( char::is_whitespace),
        None => false
    }
}

/// find the two element lines that follow the first line matching `identifier`.
/// The element lines are not validated here - that is up to the TLE parser
pub fn extract_tle_lines (blob: &str, identifier: &str)->Result<TleLines> {
    let mut lines = CatalogLines::new( blob);

    while let Some(line) = lines.next() {
        if matches_identifier( line, identifier) {
            return match (lines.next(), lines.next()) {
                (Some(line_0), Some(line_1)) => Ok( TleLines::new( line_0, line_1) ),
                _ => Err( OdinTleError::MalformedCatalog( format!("less than two lines following {identifier:?}")) )
            }
        }
    }

    Err( OdinTleError::NotFound { uri: identifier.to_string(), auth_hint: false } )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &'static str = "\
ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
STARLINK-10
1 10000U 00000A   24010.25000000  .00000000  00000-0  00000-0 0  0000
2 10000  53.0000 100.0000 0001000  90.0000 270.0000 15.00000000000000
STARLINK-1
1 10001U 00000A   24010.25000000  .00000000  00000-0  00000-0 0  0001
2 10001  53.0000 100.0000 0001000  90.0000 270.0000 15.00000000000001
";

    #[test]
    fn test_basic_extract () {
        let blob = "ID123\nline-A\nline-B\nOTHER\nline-C\nline-D\n";
        let tle = extract_tle_lines( blob, "ID123").unwrap();
        assert_eq!( tle, TleLines::new( "line-A", "line-B"));
    }

    #[test]
    fn test_padded_name_line () {
        let tle = extract_tle_lines( CATALOG, "ISS (ZARYA)").unwrap();
        assert!( tle.line_0.starts_with("1 25544U"));
        assert!( tle.line_1.starts_with("2 25544 "));
    }

    #[test]
    fn test_whole_token_match () {
        let tle = extract_tle_lines( CATALOG, "STARLINK-1").unwrap();
        assert!( tle.line_0.starts_with("1 10001U"));

        let tle = extract_tle_lines( CATALOG, "STARLINK-10").unwrap();
        assert!( tle.line_0.starts_with("1 10000U"));

        assert!( matches_identifier( "0 ISS (ZARYA)", "0 ISS"));
        assert!( !matches_identifier( "STARLINK-10", "STARLINK-1"));
        assert!( !matches_identifier( "ISS", ""));
    }

    #[test]
    fn test_crlf_and_blank_lines () {
        let blob = "OTHER\r\na\r\nb\r\n\r\nID123\r\n\r\nline-A\r\nline-B\r\n";
        let tle = extract_tle_lines( blob, "ID123").unwrap();
        assert_eq!( tle, TleLines::new( "line-A", "line-B"));
    }

    #[test]
    fn test_first_match_wins () {
        let blob = "ID123\nfirst-A\nfirst-B\nID123\nsecond-A\nsecond-B\n";
        let tle = extract_tle_lines( blob, "ID123").unwrap();
        assert_eq!( tle.line_0, "first-A");
    }

    #[test]
    fn test_idempotent () {
        let a = extract_tle_lines( CATALOG, "ISS (ZARYA)").unwrap();
        let b = extract_tle_lines( CATALOG, "ISS (ZARYA)").unwrap();
        assert_eq!( a, b);

        let lines = CatalogLines::new( CATALOG);
        assert_eq!( lines.clone().count(), lines.count());
    }

    #[test]
    fn test_not_found () {
        match extract_tle_lines( CATALOG, "NOAA 21") {
            Err(OdinTleError::NotFound{uri, auth_hint}) => {
                assert_eq!( uri, "NOAA 21");
                assert!( !auth_hint);
            }
            other => panic!("unexpected result {other:?}")
        }
        assert!( matches!( extract_tle_lines( "", "ID123"), Err(OdinTleError::NotFound{..})));
    }

    #[test]
    fn test_truncated_catalog () {
        let res = extract_tle_lines( "OTHER\nx\ny\nID123\nline-A\n", "ID123");
        assert!( matches!( res, Err(OdinTleError::MalformedCatalog(_))));
    }
}
