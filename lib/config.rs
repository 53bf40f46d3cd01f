//! TOML parameter files for the driver binaries.
//!
//! ```toml
//! [lattice]
//! hop = [1.0, 0.5]
//! ncells = 4
//! nmax = 2
//! g = 0.15
//! omega = 1.0
//!
//! [time]
//! t_max = 150.0
//! steps = 3000
//!
//! [spectral]       # optional
//! peak_height = 450.0
//! ```

use std::path::Path;
use crate::{
    dynamics::SshCavityParams,
    error::{ Error, Result },
};

/// Simulation parameters read from a TOML file.
///
/// Pure data; structural validation happens here, while physical validation
/// stays with [`SshCavityParams`].
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub params: SshCavityParams,
    pub t_max: f64,
    pub steps: usize,
    pub peak_height: Option<f64>,
}

impl SimConfig {
    /// Read and parse a parameter file.
    pub fn load<P>(path: P) -> Result<Self>
    where P: AsRef<Path>
    {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Parse parameters from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let table: toml::Table
            = text.parse()
            .map_err(|err: toml::de::Error| Error::Config(err.to_string()))?;
        let lattice = get_table(&table, "lattice")?;
        let hop = get_hop(lattice)?;
        let ncells = get_usize(lattice, "ncells")?;
        let nmax = get_usize(lattice, "nmax")?;
        let g = get_f64(lattice, "g")?;
        let omega = get_f64(lattice, "omega")?;
        let time = get_table(&table, "time")?;
        let t_max = get_f64(time, "t_max")?;
        let steps = get_usize(time, "steps")?;
        let peak_height
            = match table.get("spectral") {
                None => None,
                Some(v) => {
                    let spectral
                        = v.as_table()
                        .ok_or_else(|| Error::Config(
                            "[spectral] must be a table".into()))?;
                    Some(get_f64(spectral, "peak_height")?)
                },
            };
        let params = SshCavityParams { hop, ncells, nmax, g, omega };
        params.validate()?;
        Ok(Self { params, t_max, steps, peak_height })
    }
}

fn get_table<'a>(table: &'a toml::Table, key: &str)
    -> Result<&'a toml::Table>
{
    table.get(key)
        .and_then(toml::Value::as_table)
        .ok_or_else(|| Error::Config(format!("missing table [{}]", key)))
}

fn get_f64(table: &toml::Table, key: &str) -> Result<f64> {
    match table.get(key) {
        Some(toml::Value::Float(x)) => Ok(*x),
        Some(toml::Value::Integer(x)) => Ok(*x as f64),
        Some(_) => Err(Error::Config(format!("{} must be a number", key))),
        None => Err(Error::Config(format!("missing key {}", key))),
    }
}

fn get_usize(table: &toml::Table, key: &str) -> Result<usize> {
    match table.get(key) {
        Some(toml::Value::Integer(x)) if *x >= 0 => Ok(*x as usize),
        Some(_) => Err(Error::Config(
            format!("{} must be a non-negative integer", key))),
        None => Err(Error::Config(format!("missing key {}", key))),
    }
}

fn get_hop(table: &toml::Table) -> Result<[f64; 2]> {
    let arr = table.get("hop")
        .and_then(toml::Value::as_array)
        .ok_or_else(|| Error::Config("missing key hop".into()))?;
    if arr.len() != 2 {
        return Err(Error::Config(
            "hop must hold exactly two amplitudes".into()));
    }
    let mut hop = [0.0; 2];
    for (h, v) in hop.iter_mut().zip(arr) {
        *h = match v {
            toml::Value::Float(x) => *x,
            toml::Value::Integer(x) => *x as f64,
            _ => return Err(Error::Config(
                "hop entries must be numbers".into())),
        };
    }
    Ok(hop)
}

#[cfg(test)]
mod test {
    use super::*;

    const GOOD: &str = "
        [lattice]
        hop = [1.0, 0.5]
        ncells = 4
        nmax = 2
        g = 0.15
        omega = 1

        [time]
        t_max = 150.0
        steps = 3000

        [spectral]
        peak_height = 300.0
    ";

    #[test]
    fn parses_complete_file() {
        let cfg = SimConfig::from_toml(GOOD).unwrap();
        assert_eq!(cfg.params.hop, [1.0, 0.5]);
        assert_eq!(cfg.params.ncells, 4);
        assert_eq!(cfg.params.nmax, 2);
        assert_eq!(cfg.params.omega, 1.0);
        assert_eq!(cfg.steps, 3000);
        assert_eq!(cfg.peak_height, Some(300.0));
    }

    #[test]
    fn spectral_section_is_optional() {
        let text = "
            [lattice]
            hop = [1.0, 0.5]
            ncells = 2
            nmax = 1
            g = 0.0
            omega = 1.0

            [time]
            t_max = 10.0
            steps = 100
        ";
        let cfg = SimConfig::from_toml(text).unwrap();
        assert_eq!(cfg.peak_height, None);
    }

    #[test]
    fn missing_key_is_an_error() {
        let text = "
            [lattice]
            hop = [1.0, 0.5]
            ncells = 2

            [time]
            t_max = 10.0
            steps = 100
        ";
        assert!(matches!(
            SimConfig::from_toml(text),
            Err(Error::Config(_)),
        ));
    }

    #[test]
    fn invalid_physics_rejected_at_parse() {
        let text = "
            [lattice]
            hop = [1.0, 0.5]
            ncells = 0
            nmax = 1
            g = 0.0
            omega = 1.0

            [time]
            t_max = 10.0
            steps = 100
        ";
        assert!(SimConfig::from_toml(text).is_err());
    }
}
