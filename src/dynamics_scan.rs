#![allow(dead_code, non_snake_case, non_upper_case_globals)]

use std::path::PathBuf;
use ndarray::{ self as nd, s };
use ssh_cavity_sim::{
    mkdir,
    write_npz,
    config::SimConfig,
    dynamics::SshCavityParams,
    evolve::{ self, Propagation },
    hilbert,
    spectral,
};

/// Call `print!` and immediately flush.
#[macro_export]
macro_rules! print_flush {
    ( $fmt:literal $(, $val:expr )* $(,)?) => {
        print!($fmt $(, $val )*);
        std::io::Write::flush(&mut std::io::stdout()).unwrap();
    }
}

const T_MAX: f64 = 150.0;
const NT: usize = 3000;

fn default_config() -> SimConfig {
    SimConfig {
        params: SshCavityParams {
            hop: [1.0, 0.5],
            ncells: 4,
            nmax: 2,
            g: 0.15,
            omega: 1.0,
        },
        t_max: T_MAX,
        steps: NT,
        peak_height: None,
    }
}

#[derive(Clone, Debug)]
struct Data {
    time: nd::Array1<f64>,
    prob_photon: nd::Array2<f64>,
    prob_lattice: nd::Array2<f64>,
    freq: nd::Array1<f64>,
    magnitude: nd::Array1<f64>,
    period: nd::Array1<f64>,
    peaks: nd::Array1<u32>,
}

fn doit(cfg: &SimConfig) -> anyhow::Result<Data> {
    let space = cfg.params.space();
    // cavity in vacuum, excitation localized on the first site
    let psi0_phot = hilbert::fock_state(space.cavity, 0).unwrap();
    let psi0_elec = hilbert::fock_state(space.lattice, 0).unwrap();
    let time: nd::Array1<f64> = nd::Array1::linspace(0.0, cfg.t_max, cfg.steps);

    let Propagation { prob_photon, prob_lattice, drift }
        = evolve::propagate_with(
            &psi0_phot, &psi0_elec, &time, cfg.params,
            |k, total| { print_flush!("\r  {} / {} ", k, total); },
        )?;
    println!();
    for d in drift.iter() {
        println!(
            "warning: norm drift {:+.3e} at step {}", d.deviation, d.step);
    }

    let site0: nd::Array1<f64> = prob_lattice.slice(s![.., 0]).to_owned();
    let spectrum
        = spectral::fourier_spectrum(&site0, &time, cfg.peak_height)?;
    for (period, magnitude) in spectrum.peak_periods() {
        println!("peak: period = {:.4}, |F| = {:.2}", period, magnitude);
    }

    let peaks: nd::Array1<u32>
        = spectrum.peaks.iter().map(|&i| i as u32).collect();
    Ok(Data {
        time,
        prob_photon,
        prob_lattice,
        freq: spectrum.freq,
        magnitude: spectrum.magnitude,
        period: spectrum.period,
        peaks,
    })
}

fn main() -> anyhow::Result<()> {
    let cfg: SimConfig
        = match std::env::args().nth(1) {
            Some(path) => SimConfig::load(path)?,
            None => default_config(),
        };
    let data = doit(&cfg)?;

    let outdir = PathBuf::from("output/dynamics_scan");
    mkdir!(outdir);
    // the period axis is infinite at the DC bin; store frequencies and let
    // downstream plotting derive finite periods where needed
    write_npz!(
        outdir.join("dynamics.npz"),
        arrays: {
            "time" => &data.time,
            "prob_photon" => &data.prob_photon,
            "prob_lattice" => &data.prob_lattice,
            "freq" => &data.freq,
            "magnitude" => &data.magnitude,
            "period" => &data.period,
            "peaks" => &data.peaks,
        }
    );

    println!("done");
    Ok(())
}
