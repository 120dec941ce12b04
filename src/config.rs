//! Subnet list configuration for the command line tool.
//!
//! Subnets come from, in order of preference: the command line, a JSON
//! subnets file, or the `SUBNET_CHECK_SUBNETS` environment variable
//! (comma separated, also read from `.env`).

use crate::models::SubnetList;
use std::error::Error;
use std::path::Path;

pub const ENV_SUBNETS: &str = "SUBNET_CHECK_SUBNETS";
pub const ENV_SUBNETS_FILE: &str = "SUBNET_CHECK_SUBNETS_FILE";

/// Read a `{ "subnets": [...] }` document.
///
/// # Arguments
/// * `path` - Path to the JSON file
///
/// # Returns
/// * `Ok(SubnetList)` - The validated subnets
/// * `Err` - If the file is missing, unreadable, or holds an invalid subnet
pub fn read_subnet_file(path: &str) -> Result<SubnetList, Box<dyn Error>> {
    if !Path::new(path).exists() {
        return Err(format!("Subnets file does not exist: {path}").into());
    }
    log::info!("Reading subnets from file: {path}");
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading subnets file {path}: {e}"))?;
    let list: SubnetList =
        serde_json::from_str(&json).map_err(|e| format!("Error parsing subnets JSON: {e}"))?;
    log::debug!("Read {} subnets from {path}", list.subnets.len());
    Ok(list)
}

/// Split a comma separated subnet list, dropping blanks.
pub fn split_subnet_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pick the subnet list to check against.
pub fn resolve_subnets(
    cli_subnets: Vec<String>,
    subnets_file: Option<&str>,
) -> Result<Vec<String>, Box<dyn Error>> {
    if !cli_subnets.is_empty() {
        return Ok(cli_subnets);
    }
    if let Some(path) = subnets_file {
        let list = read_subnet_file(path)?;
        return Ok(list.subnets.iter().map(|s| s.to_string()).collect());
    }
    match std::env::var(ENV_SUBNETS) {
        Ok(value) => {
            log::debug!("Using subnets from {ENV_SUBNETS}");
            Ok(split_subnet_list(&value))
        }
        Err(_) => {
            log::warn!("No subnets given, nothing can match");
            Ok(Vec::new())
        }
    }
}
