use regionview::cli::{Args, Parser};
use regionview::data::Scene;
use regionview::fade::FadeParam;
use regionview::utils::logger;
use regionview::waveform::{DrawInstruction, RepaintGuard};
use std::sync::Arc;

fn main() {
    let args = Args::parse();
    if let Err(e) = logger::init(logger::level_from_verbosity(args.log_level)) {
        eprintln!("failed to install logger: {e}");
    }
    if let Err(e) = run(&args) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> regionview::Result<()> {
    let scene = args.scene()?;
    let peaks = Arc::new(scene.audio.peaks()?);
    let mapper = scene.mapper();
    let mut guard = RepaintGuard::new();
    let draws = guard
        .map_if_changed(&mapper, &scene.regions, &peaks, Some(scene.audio.duration()))
        .unwrap_or_default();
    log::info!(
        "{} draw instructions for {} regions over {} peak frames",
        draws.len(),
        scene.regions.len(),
        peaks.num_frames()
    );
    if args.json {
        println!("{}", serde_json::to_string_pretty(&draws)?);
    } else {
        print_draws(&draws);
    }
    print_fades(&scene, args.steps);
    Ok(())
}

fn print_draws(draws: &[DrawInstruction]) {
    println!("region\tch\tpixels\tlane\tframes");
    for d in draws {
        println!(
            "{}\t{}\t{}..{}\t{:.1}..{:.1}\t{}..{}",
            d.region.as_deref().unwrap_or("-"),
            d.channel,
            d.pixel_start,
            d.pixel_end,
            d.channel_top,
            d.channel_bottom,
            d.frame_start,
            d.frame_end
        );
    }
}

fn print_fades(scene: &Scene, steps: usize) {
    for region in &scene.regions {
        let fade: FadeParam = scene.fade.clone();
        let duration = region.duration as f64;
        fade.fit_to(duration);
        println!("\n{region} fade envelope");
        println!("x\tin\tout\tgain");
        for p in fade.envelope(duration, steps) {
            let elapsed = p.x * duration;
            println!(
                "{:.3}\t{:.4}\t{:.4}\t{:.4}",
                p.x,
                fade.gain_in(elapsed),
                fade.gain_out(elapsed, duration),
                p.y
            );
        }
    }
}
