// Copyright 2023 rust-dns-sdk authors
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::fmt;

use crate::record::{DEFAULT_TTL, Record, RecordType};

/// Zone-file text assembled line by line, `name.<TAB>ttl<TAB>IN<TAB>type<TAB>rdata`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneFile {
    lines: Vec<String>,
}

impl ZoneFile {
    /// Starts a zone with its SOA line and one NS line per nameserver.
    ///
    /// Every preamble line uses the SOA's minimum TTL (see [`soa_ttl`]).
    pub fn with_preamble(domain: &str, soa: &str, nameservers: &[String]) -> Self {
        let domain = domain.trim_end_matches('.');
        let ttl = soa_ttl(soa);
        let mut zone = ZoneFile::default();
        zone.push(domain, ttl, "SOA", soa.trim());
        for ns in nameservers {
            zone.push(domain, ttl, "NS", &format!("{}.", ns.trim_end_matches('.')));
        }
        zone
    }

    pub fn push(&mut self, name: &str, ttl: u32, rr: &str, rdata: &str) {
        self.lines.push(format!(
            "{}.\t{}\tIN\t{}\t{}",
            name.trim_end_matches('.'),
            ttl,
            rr,
            rdata
        ));
    }

    pub fn push_record(&mut self, record: &Record, ttl: u32) {
        self.push(&record.fqdn(), ttl, record.rr().as_str(), &rdata(record));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for ZoneFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// TTL in the SOA's 7th field, or [`DEFAULT_TTL`] when it is missing or not a number.
pub fn soa_ttl(soa: &str) -> u32 {
    soa.split_whitespace()
        .nth(6)
        .and_then(|field| field.parse().ok())
        .unwrap_or(DEFAULT_TTL)
}

/// Record data as written in a zone file. TXT data is quoted, everything else is the
/// canonical parameter.
pub fn rdata(record: &Record) -> String {
    match record.rr() {
        RecordType::Txt => format!("\"{}\"", record.parameter()),
        _ => record.parameter().to_string(),
    }
}
