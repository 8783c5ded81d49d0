//! Recursive filter design command.

use clap::{Args, ValueEnum};
use seismo_design::{Characteristic, DesignSpec, FilterDesign, Mapping, Recurrence, Response, design, save_paz};
use serde::Serialize;
use std::path::PathBuf;

/// Filter family.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Family {
    /// Maximally flat group delay
    Bessel,
    /// Maximally flat magnitude
    Butterworth,
    /// Equiripple passband (needs --ripple)
    Chebyshev,
    /// Two-pole Z-plane resonator (--q, infinite when omitted)
    Resonator,
    /// Proportional-integral
    Pi,
}

/// Response shape.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shape {
    /// Low-pass
    Lowpass,
    /// High-pass
    Highpass,
    /// Band-pass
    Bandpass,
    /// Band-stop
    Bandstop,
    /// All-pass (resonators only)
    Allpass,
}

#[derive(Args)]
pub struct DesignArgs {
    /// Filter family
    #[arg(long, value_enum)]
    family: Family,

    /// Response shape
    #[arg(long, value_enum)]
    response: Shape,

    /// Sample rate in Hz
    #[arg(long)]
    sample_rate: f64,

    /// Corner (or resonator centre) frequency in Hz
    #[arg(long)]
    corner: f64,

    /// Upper corner in Hz for band-pass and band-stop designs
    #[arg(long)]
    upper: Option<f64>,

    /// Prototype order
    #[arg(long, default_value = "1")]
    order: usize,

    /// Chebyshev passband ripple in dB (negative)
    #[arg(long, allow_hyphen_values = true)]
    ripple: Option<f64>,

    /// Resonator quality factor
    #[arg(long)]
    q: Option<f64>,

    /// Keep only the prototype poles whose bits are set
    #[arg(long)]
    pole_mask: Option<u64>,

    /// Do not pre-warp the corners
    #[arg(long)]
    no_prewarp: bool,

    /// Use the matched-z transform instead of the bilinear transform
    #[arg(long)]
    matched_z: bool,

    /// Add a conjugate zero pair on the unit circle at this frequency (Hz)
    #[arg(long)]
    extra_zero: Option<f64>,

    /// Write the Z-plane poles and zeros to a PAZ file
    #[arg(long, value_name = "FILE")]
    paz: Option<PathBuf>,

    /// Print the design as JSON instead of the text summary
    #[arg(long)]
    json: bool,

    /// Also print this many samples of the impulse response
    #[arg(long, value_name = "N")]
    impulse: Option<usize>,
}

/// Machine-readable design summary.
#[derive(Serialize)]
struct DesignReport {
    characteristic: &'static str,
    response: &'static str,
    order: usize,
    sample_rate: f64,
    raw_alphas: [f64; 2],
    warped_alphas: [f64; 2],
    dc_gain: [f64; 2],
    fc_gain: [f64; 2],
    hf_gain: [f64; 2],
    zeros: Vec<[f64; 2]>,
    poles: Vec<[f64; 2]>,
    x_coeffs: Vec<f64>,
    y_coeffs: Vec<f64>,
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    impulse: Option<Vec<f64>>,
}

impl DesignReport {
    fn new(filter: &FilterDesign, impulse: Option<Vec<f64>>) -> Self {
        let pair = |c: seismo_core::Complex64| [c.re, c.im];
        Self {
            characteristic: filter.spec.characteristic.name(),
            response: filter.spec.response.name(),
            order: filter.spec.order,
            sample_rate: filter.spec.sample_rate,
            raw_alphas: [filter.raw_alphas.0, filter.raw_alphas.1],
            warped_alphas: [filter.warped_alphas.0, filter.warped_alphas.1],
            dc_gain: pair(filter.dc_gain),
            fc_gain: pair(filter.fc_gain),
            hf_gain: pair(filter.hf_gain),
            zeros: filter.zplane.zeros.iter().copied().map(pair).collect(),
            poles: filter.zplane.poles.iter().copied().map(pair).collect(),
            x_coeffs: filter.x_coeffs.clone(),
            y_coeffs: filter.y_coeffs.clone(),
            warnings: filter.warnings.iter().map(ToString::to_string).collect(),
            impulse,
        }
    }
}

fn build_spec(args: &DesignArgs) -> anyhow::Result<DesignSpec> {
    let characteristic = match args.family {
        Family::Bessel => Characteristic::Bessel,
        Family::Butterworth => Characteristic::Butterworth,
        Family::Chebyshev => {
            let Some(ripple_db) = args.ripple else {
                anyhow::bail!("Chebyshev designs need --ripple (e.g. --ripple -0.5)");
            };
            Characteristic::Chebyshev { ripple_db }
        }
        Family::Resonator => Characteristic::Resonator { q: args.q },
        Family::Pi => Characteristic::ProportionalIntegral,
    };
    let response = match args.response {
        Shape::Lowpass => Response::Lowpass,
        Shape::Highpass => Response::Highpass,
        Shape::Bandpass => Response::Bandpass,
        Shape::Bandstop => Response::Bandstop,
        Shape::Allpass => Response::Allpass,
    };

    let mut spec = DesignSpec::new(characteristic, response, args.sample_rate).with_order(args.order);
    spec = match args.upper {
        Some(upper) => spec.with_band(args.corner, upper),
        None => spec.with_corner(args.corner),
    };
    if let Some(mask) = args.pole_mask {
        spec = spec.with_pole_mask(mask);
    }
    if args.no_prewarp {
        spec = spec.without_prewarp();
    }
    if args.matched_z {
        spec = spec.with_mapping(Mapping::MatchedZ);
    }
    if let Some(freq) = args.extra_zero {
        spec = spec.with_extra_zero(freq);
    }
    Ok(spec)
}

fn impulse_response(filter: &FilterDesign, len: usize) -> Vec<f64> {
    let mut runner = Recurrence::new(filter);
    (0..len)
        .map(|i| runner.process(if i == 0 { 1.0 } else { 0.0 }))
        .collect()
}

/// Run the design command.
pub fn run(args: DesignArgs) -> anyhow::Result<()> {
    let spec = build_spec(&args)?;
    let filter = design(&spec)?;
    for warning in &filter.warnings {
        tracing::warn!(%warning, "design warning");
    }

    if let Some(path) = &args.paz {
        let command_line = std::env::args().collect::<Vec<_>>().join(" ");
        save_paz(&filter, &command_line, path)?;
    }

    let impulse = args.impulse.map(|len| impulse_response(&filter, len));

    if args.json {
        let report = DesignReport::new(&filter, impulse);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", filter.summary());
    if let Some(values) = impulse {
        println!("\nImpulse response:");
        for (i, value) in values.iter().enumerate() {
            println!("  {i:4}  {value:+.10e}");
        }
    }
    Ok(())
}
