//! Static tables describing which subcommands `tmacs` offers, which flags each
//! subcommand accepts, and which files are candidates for a flag's value.

use serde::Serialize;

use crate::error::Result;

pub const DEFAULT_BINARY: &str = "gmx";

pub const SUBCOMMANDS: &[&str] = &[
    "grompp", "mdrun", "solvate", "genion", "pdb2gmx", "editconf", "make_ndx",
];

const FLAGS: &[(&str, &[&str])] = &[
    ("mdrun", &["-deffnm", "-o", "-c", "-s"]),
    ("grompp", &["-f", "-c", "-r", "-p", "-n", "-maxwarn"]),
];

const FILE_PATTERNS: &[(&str, &str)] = &[
    ("-f", "*.mdp"),
    ("-c", "*.pdb"),
    ("-r", "*.pdb"),
    ("-p", "*.top"),
    ("-deffnm", "*.tpr"),
    ("-s", "*.tpr"),
];

/// Flags accepted by `subcommand`. Unknown subcommands have no flags.
pub fn options_for(subcommand: &str) -> &'static [&'static str] {
    FLAGS
        .iter()
        .find(|(name, _)| *name == subcommand)
        .map(|(_, flags)| *flags)
        .unwrap_or(&[])
}

/// Glob used to discover candidate values for `flag`, if the flag takes a file.
pub fn file_pattern_for(flag: &str) -> Option<&'static str> {
    FILE_PATTERNS
        .iter()
        .find(|(name, _)| *name == flag)
        .map(|(_, pattern)| *pattern)
}

#[derive(Debug, Serialize)]
pub struct SubcommandEntry {
    pub name: &'static str,
    pub flags: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct PatternEntry {
    pub flag: &'static str,
    pub pattern: &'static str,
}

/// Snapshot of the tables, used by `--debug`.
#[derive(Debug, Serialize)]
pub struct Catalog {
    pub binary: String,
    pub subcommands: Vec<SubcommandEntry>,
    pub file_patterns: Vec<PatternEntry>,
}

impl Catalog {
    pub fn new(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
            subcommands: SUBCOMMANDS
                .iter()
                .map(|&name| SubcommandEntry {
                    name,
                    flags: options_for(name),
                })
                .collect(),
            file_patterns: FILE_PATTERNS
                .iter()
                .map(|&(flag, pattern)| PatternEntry { flag, pattern })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
