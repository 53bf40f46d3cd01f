#![allow(dead_code, non_snake_case, non_upper_case_globals)]

use std::path::PathBuf;
use ndarray::{ self as nd, s };
use num_complex::Complex64 as C64;
use ndarray_linalg::{ Eigh, UPLO };
use ssh_cavity_sim::{
    mkdir,
    write_npz,
    dynamics::{
        bloch_ssh, k_mesh, BzConvention, HBuilderSshCavity, SshCavityParams,
    },
    plot,
    topology,
};

/// Call `print!` and immediately flush.
#[macro_export]
macro_rules! print_flush {
    ( $fmt:literal $(, $val:expr )* $(,)?) => {
        print!($fmt $(, $val )*);
        std::io::Write::flush(&mut std::io::stdout()).unwrap();
    }
}

const NK: usize = 401;
const NRATIO: usize = 80;
const NG: usize = 40;

fn base_params() -> SshCavityParams {
    SshCavityParams {
        hop: [1.0, 1.0],
        ncells: 3,
        nmax: 2,
        g: 0.0,
        omega: 1.0,
    }
}

/// Lower-band Zak phase as a function of the intracell/intercell hopping
/// ratio.
fn zak_sweep() -> anyhow::Result<(nd::Array1<f64>, nd::Array1<f64>)> {
    let mesh = k_mesh(NK, BzConvention::PositiveBranch);
    let ratio: nd::Array1<f64> = nd::Array1::linspace(0.05, 2.0, NRATIO);
    let mut zak: nd::Array1<f64> = nd::Array1::zeros(NRATIO);
    for (q, (&r, z)) in ratio.iter().zip(zak.iter_mut()).enumerate() {
        print_flush!("\r  ratio {:3} / {} ", q + 1, NRATIO);
        let hop = [r, 1.0];
        let mut avec: nd::Array3<C64> = nd::Array3::zeros((NK, 2, 2));
        for (k, &kval) in mesh.iter().enumerate() {
            let (_, mut V) = bloch_ssh(hop, kval).eigh(UPLO::Lower)?;
            for mut col in V.columns_mut() {
                let phase = col[0] / col[0].norm();
                col.mapv_inplace(|a| a / phase);
            }
            avec.slice_mut(s![k, .., ..]).assign(&V);
        }
        let phases = topology::zak_phases(&avec, Some(1), None)?;
        *z = phases[0];
    }
    println!();
    Ok((ratio, zak))
}

/// Ground-state entanglement entropies of the full chain-cavity system as a
/// function of the coupling strength.
fn entropy_sweep()
    -> anyhow::Result<(nd::Array1<f64>, nd::Array1<f64>, nd::Array1<f64>)>
{
    let gs: nd::Array1<f64> = nd::Array1::linspace(0.0, 1.5, NG);
    let mut eigvecs: Vec<nd::Array2<C64>> = Vec::with_capacity(NG);
    let mut params = base_params();
    params.hop = [0.6, 1.0];
    for (q, &g) in gs.iter().enumerate() {
        print_flush!("\r  g {:3} / {} ", q + 1, NG);
        params.g = g;
        let builder = HBuilderSshCavity::new(params)?;
        let (_, V) = builder.diagonalize()?;
        eigvecs.push(V);
    }
    println!();
    let (s_phot, s_latt)
        = topology::entropy_scan(&eigvecs, 0, params.space())?;
    Ok((gs, s_phot, s_latt))
}

fn main() -> anyhow::Result<()> {
    let (ratio, zak) = zak_sweep()?;
    let (gs, s_phot, s_latt) = entropy_sweep()?;

    // segment data for a gradient-colored rendering of the phase diagram
    let segments
        = plot::gradient_segments(&ratio, &zak, &ratio, None, 4)?;
    let seg_x0: nd::Array1<f64> = segments.iter().map(|s| s.x[0]).collect();
    let seg_x1: nd::Array1<f64> = segments.iter().map(|s| s.x[1]).collect();
    let seg_y0: nd::Array1<f64> = segments.iter().map(|s| s.y[0]).collect();
    let seg_y1: nd::Array1<f64> = segments.iter().map(|s| s.y[1]).collect();
    let seg_c: nd::Array1<f64>
        = segments.iter().map(|s| s.color).collect();

    let outdir = PathBuf::from("output/zak_scan");
    mkdir!(outdir);
    write_npz!(
        outdir.join("zak_scan.npz"),
        arrays: {
            "ratio" => &ratio,
            "zak" => &zak,
            "g" => &gs,
            "entropy_photon" => &s_phot,
            "entropy_lattice" => &s_latt,
            "seg_x0" => &seg_x0,
            "seg_x1" => &seg_x1,
            "seg_y0" => &seg_y0,
            "seg_y1" => &seg_y1,
            "seg_color" => &seg_c,
        }
    );

    println!("done");
    Ok(())
}
