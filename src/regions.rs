use std::collections::BTreeMap;

use anyhow::Result;

use crate::error::AnalysisError;

/// Static description of one top-level study region.
#[derive(Debug, Clone)]
pub struct RegionInfo {
    pub key: &'static str,
    pub display_name: &'static str,
    /// ISO 3166-2 prefix of the sub-region identifiers, where one exists
    /// (NUTS codes for europe have none).
    pub iso_prefix: Option<&'static str>,
    /// Aggregated identifiers that stand for several sub-codes in the
    /// area tables. An anomaly computed for the aggregate applies to
    /// every listed sub-code.
    code_expansion: &'static [(&'static str, &'static [&'static str])],
}

impl RegionInfo {
    /// Sub-codes an identifier expands to, or the identifier itself.
    pub fn expand_code<'a>(&self, id: &'a str) -> Vec<&'a str>
    where
        'static: 'a,
    {
        for (code, subs) in self.code_expansion {
            if *code == id {
                return subs.to_vec();
            }
        }
        vec![id]
    }
}

/// Registry mapping region key to its static description. New regions
/// are added by registering an entry, not by editing a dispatch chain.
#[derive(Debug)]
pub struct RegionRegistry {
    entries: BTreeMap<&'static str, RegionInfo>,
}

impl RegionRegistry {
    pub fn builtin() -> Self {
        let mut registry = Self {
            entries: BTreeMap::new(),
        };
        for info in BUILTIN {
            registry.register(info.clone());
        }
        registry
    }

    pub fn register(&mut self, info: RegionInfo) {
        self.entries.insert(info.key, info);
    }

    pub fn get(&self, key: &str) -> Result<&RegionInfo> {
        self.entries
            .get(key)
            .ok_or_else(|| AnalysisError::UnsupportedRegion(key.to_string()).into())
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Expand a CLI region selection; the literal `all` selects every
    /// registered region.
    pub fn resolve_selection(&self, requested: &[String]) -> Result<Vec<String>> {
        if requested.iter().any(|r| r == "all") {
            return Ok(self.keys().map(str::to_string).collect());
        }
        let mut out = Vec::with_capacity(requested.len());
        for key in requested {
            self.get(key)?;
            out.push(key.clone());
        }
        Ok(out)
    }
}

// Aggregated NUTS identifiers used in the european yield tables; the
// right-hand sides are the codes the SWA zonal statistics carry.
static EUROPE_EXPANSION: &[(&str, &[&str])] = &[
    ("FR1", &["FR10"]),
    ("FR2", &["FRB0", "FRC1", "FRD1", "FRD2", "FRE2", "FRF2"]),
    ("FR3", &["FRE1"]),
    ("FR4", &["FRC2", "FRF1", "FRF3"]),
    ("FR5", &["FRG0", "FRH0", "FRI3"]),
    ("FR6", &["FRI1", "FRI2", "FRJ2"]),
    ("FR7", &["FRK1", "FRK2"]),
    ("FR8", &["FRJ1", "FRL0", "FRM0"]),
    ("ES3+4", &["ES3", "ES4"]),
    ("PTother", &["PT15", "PT16", "PT17", "PT18", "PT20", "PT30"]),
    ("UKI+J", &["UKI", "UKJ"]),
    ("DE3+4", &["DE3", "DE4"]),
    ("DE9+5", &["DE9", "DE5"]),
    ("DEF+6", &["DEF", "DE6"]),
    ("DEB+C", &["DEB", "DEC"]),
    ("FI1B+C", &["FI1B", "FI1C"]),
    ("EL3+EL6", &["EL3", "EL6"]),
    ("TR1+2", &["TR1", "TR2"]),
];

static CHINA_EXPANSION: &[(&str, &[&str])] = &[
    ("CN-NM", &["Inner Mongol"]),
    ("CN-TI", &["Xizang"]),
];

static BUILTIN: &[RegionInfo] = &[
    RegionInfo {
        key: "europe",
        display_name: "Europe",
        iso_prefix: None,
        code_expansion: EUROPE_EXPANSION,
    },
    RegionInfo {
        key: "usa",
        display_name: "United States",
        iso_prefix: Some("US"),
        code_expansion: &[],
    },
    RegionInfo {
        key: "china",
        display_name: "China",
        iso_prefix: Some("CN"),
        code_expansion: CHINA_EXPANSION,
    },
    RegionInfo {
        key: "india",
        display_name: "India",
        iso_prefix: Some("IN"),
        code_expansion: &[],
    },
    RegionInfo {
        key: "canada",
        display_name: "Canada",
        iso_prefix: Some("CA"),
        code_expansion: &[],
    },
    RegionInfo {
        key: "argentina",
        display_name: "Argentina",
        iso_prefix: Some("AR"),
        code_expansion: &[],
    },
    RegionInfo {
        key: "brazil",
        display_name: "Brazil",
        iso_prefix: Some("BR"),
        code_expansion: &[],
    },
];
