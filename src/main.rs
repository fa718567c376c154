// src/main.rs

use log::{error, info, warn};
use env_logger::Env;

use littlewood::config::ExplorerConfig;
use littlewood::core::thread_pool;
use littlewood::enumeration::{Explorer, RootEvent, RootSink, RunParameters, RunSummary};
use littlewood::math::Complex;
use littlewood::sampling::RenderBudget;

/// Tracks how many roots arrived and the box they fit in.
#[derive(Default)]
struct ExtentSink {
    roots: u64,
    min: Option<Complex>,
    max: Option<Complex>,
}

impl RootSink for ExtentSink {
    fn emit(&mut self, event: &RootEvent) {
        let z = event.root;
        self.roots += 1;
        self.min = Some(self.min.map_or(z, |m| Complex::new(m.re.min(z.re), m.im.min(z.im))));
        self.max = Some(self.max.map_or(z, |m| Complex::new(m.re.max(z.re), m.im.max(z.im))));
    }

    fn finish(&mut self, summary: &RunSummary) {
        info!("Sink received {} roots for run {}", self.roots, summary.run_id);
        if let (Some(min), Some(max)) = (self.min, self.max) {
            info!("Extent: re [{:.4}, {:.4}], im [{:.4}, {:.4}]", min.re, max.re, min.im, max.im);
        }
    }
}

fn main() {
    let config = ExplorerConfig::load().unwrap_or_else(|e| {
        eprintln!("Falling back to default configuration: {}", e);
        ExplorerConfig::default()
    });

    // Initialize the logger
    let env = Env::default()
        .filter_or("LITTLEWOOD_LOG", config.log_level.as_str())
        .write_style_or("LITTLEWOOD_LOG_STYLE", "always");
    env_logger::Builder::from_env(env).init();

    if let Err(e) = thread_pool::configure(config.threads) {
        warn!("Continuing with the existing thread pool: {}", e);
    }

    // littlewood [degree] [budget]
    let args: Vec<String> = std::env::args().collect();
    let degree = args.get(1).and_then(|s| s.parse::<usize>().ok()).unwrap_or(12);
    let budget = match args.get(2).map(String::as_str) {
        Some("unbounded") => RenderBudget::Unbounded,
        Some(s) => s.parse::<u64>().map(RenderBudget::Limited).unwrap_or_else(|_| config.render.render_budget()),
        None => config.render.render_budget(),
    };

    let palette = vec![Complex::new(1.0, 0.0), Complex::new(-1.0, 0.0)];
    let params = RunParameters::from_config(degree, palette, &config).with_budget(budget);
    if let Err(e) = params.validate() {
        error!("Invalid run parameters: {}", e);
        std::process::exit(1);
    }

    let mut explorer = Explorer::new();
    let mut run = explorer.start_run(params);

    let handle = run.handle();
    if let Err(e) = ctrlc::set_handler(move || {
        handle.cancel();
    }) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }

    let mut sink = ExtentSink::default();
    match explorer.run_to_completion(&mut run, &mut sink) {
        Some(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Could not serialize summary: {}", e),
        },
        None => warn!("Run {} was cancelled after {} units", run.id(), run.units()),
    }
}
