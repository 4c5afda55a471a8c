use std::process;

use log::LevelFilter;
use nalgebra::Complex;
use simple_logger::SimpleLogger;

use pole_place::io::{self as report, DesignSummary};
use pole_place::placement::{closed_loop_poles, pair_poles, place_poles, PlacementConfig};
use pole_place::PlantBuilder;

const USAGE: &str = "usage: pole-place [--length M] [--inertia KGM2] [--poles P1,P2,..] \
                     [--json PATH] [--csv PATH]\n\
                     poles accept a+bi / a-bi for complex values";

struct Args {
    length: Option<f64>,
    inertia: Option<f64>,
    poles: Vec<Complex<f64>>,
    json: Option<String>,
    csv: Option<String>,
}

fn parse_pole(s: &str) -> Option<Complex<f64>> {
    let s = s.trim();
    let Some(body) = s.strip_suffix('i') else {
        return s.parse().ok().map(|re| Complex::new(re, 0.0));
    };
    // split at the last sign that is not a leading sign or an exponent sign
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&i| (bytes[i] == b'+' || bytes[i] == b'-') && !matches!(bytes[i - 1], b'e' | b'E'))?;
    let re: f64 = body[..split].parse().ok()?;
    let im: f64 = match &body[split..] {
        "+" => 1.0,
        "-" => -1.0,
        im => im.parse().ok()?,
    };
    Some(Complex::new(re, im))
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        length: None,
        inertia: None,
        poles: vec![Complex::new(-3.0, 0.0); 4],
        json: None,
        csv: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || it.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--length" => args.length = Some(value()?.parse().map_err(|e| format!("--length: {e}"))?),
            "--inertia" => args.inertia = Some(value()?.parse().map_err(|e| format!("--inertia: {e}"))?),
            "--poles" => {
                let raw = value()?;
                args.poles = raw
                    .split(',')
                    .map(|p| parse_pole(p).ok_or_else(|| format!("bad pole '{p}'")))
                    .collect::<Result<_, _>>()?;
            }
            "--json" => args.json = Some(value()?),
            "--csv" => args.csv = Some(value()?),
            "-h" | "--help" => return Err(USAGE.into()),
            other => return Err(format!("unknown argument '{other}'\n{USAGE}")),
        }
    }
    Ok(args)
}

fn main() {
    if let Err(e) = SimpleLogger::new().with_level(LevelFilter::Info).env().init() {
        eprintln!("logger: {e}");
    }

    let args = match parse_args() {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("{msg}");
            process::exit(2);
        }
    };

    // -----------------------------------------------------------------------
    // Plant: beam rig, L = 0.5 m, Jb = 0.02 kg·m^2 unless overridden
    // -----------------------------------------------------------------------
    let mut builder = PlantBuilder::new();
    if let Some(l) = args.length {
        builder = builder.length(l);
    }
    if let Some(j) = args.inertia {
        builder = builder.inertia(j);
    }
    let plant = builder.build();
    let config = PlacementConfig::default();

    let sys = match plant.state_space() {
        Ok(s) => s,
        Err(e) => {
            log::error!("invalid plant: {e}");
            process::exit(1);
        }
    };

    // -----------------------------------------------------------------------
    // Design
    // -----------------------------------------------------------------------
    let gain = match place_poles(&sys, &args.poles, &config) {
        Ok(k) => k,
        Err(e) => {
            log::error!("pole placement failed: {e}");
            process::exit(1);
        }
    };

    let summary = match DesignSummary::new(&sys, &args.poles, &gain, &config) {
        Ok(s) => s,
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        }
    };

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  POLE PLACEMENT (Ackermann)");
    println!("====================================================================");
    println!();
    println!("  Plant: L = {} m, Jb = {} kg·m^2", plant.length, plant.inertia);
    println!(
        "  Controllability: rank {}/{}, rcond {:.3e}",
        summary.controllability_rank, summary.state_dim, summary.controllability_rcond
    );
    println!("  Desired polynomial: {:?}", summary.coefficients);
    println!();
    println!("  {gain}");
    println!();
    println!("  {:>10}  {:>10}    {:>10}  {:>10}", "desired", "", "achieved", "");
    println!("  {}", "─".repeat(48));
    let achieved = closed_loop_poles(&sys, &gain);
    for (d, a) in args.poles.iter().zip(pair_poles(&achieved, &args.poles)) {
        match a {
            Some(a) => println!("  {:>10.4}  {:>+10.4}i   {:>10.4}  {:>+10.4}i", d.re, d.im, a.re, a.im),
            None => println!("  {:>10.4}  {:>+10.4}i   {:>10}", d.re, d.im, "-"),
        }
    }
    println!();
    println!("  Max pole error: {:.3e}", summary.max_pole_error);
    println!("====================================================================");
    println!();

    if !write_reports(args.json.as_deref(), args.csv.as_deref(), &summary, &args.poles, &achieved) {
        process::exit(1);
    }
}

/// Write the optional JSON and CSV reports. False if any write failed.
fn write_reports(
    json: Option<&str>,
    csv: Option<&str>,
    summary: &DesignSummary,
    desired: &[Complex<f64>],
    achieved: &[Complex<f64>],
) -> bool {
    let mut ok = true;
    if let Some(path) = json {
        match report::write_design_file(path, summary) {
            Ok(()) => log::info!("design written to {path}"),
            Err(e) => {
                log::error!("failed to write {path}: {e}");
                ok = false;
            }
        }
    }
    if let Some(path) = csv {
        match report::write_pole_table_file(path, desired, achieved) {
            Ok(()) => log::info!("pole table written to {path}"),
            Err(e) => {
                log::error!("failed to write {path}: {e}");
                ok = false;
            }
        }
    }
    ok
}
