use clap::Parser;
use colored::Colorize;
use log::LevelFilter;

use raven_tester::driver::web::WebLauncher;
use raven_tester::runner::{Selection, TestRunner};
use raven_tester::utils::config::Config;

#[derive(Parser)]
#[command(name = "raven-tester")]
#[command(version = "0.1.0")]
#[command(about = "End-to-end browser tests for the RavenCode front end", long_about = None)]
struct Cli {
    /// Test suite to run
    #[arg(long, default_value = "all", value_parser = ["authentication", "modules", "legacy", "all"])]
    suite: String,

    /// Run a single named test instead of a suite
    #[arg(long)]
    test: Option<String>,

    /// Run the browser without a window
    #[arg(long, default_value = "false")]
    headless: bool,

    /// Default element wait in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Debug-level diagnostics
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Trace-level diagnostics
    #[arg(long, default_value = "false")]
    debug: bool,
}

fn init_logging(cli: &Cli) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.debug {
        builder.filter_level(LevelFilter::Trace);
    } else if cli.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let success = run(cli).await;
    std::process::exit(if success { 0 } else { 1 });
}

async fn run(cli: Cli) -> bool {
    let (config, config_error) = match Config::from_env() {
        Ok(config) => (config.with_overrides(cli.headless, cli.timeout), None),
        Err(e) => (Config::default(), Some(e)),
    };
    let selection = match cli.test {
        Some(name) => Selection::Test(name),
        None => Selection::Suite(cli.suite),
    };

    let mut runner = TestRunner::new(Box::new(WebLauncher), config);

    // installed before the preflight; suites still close their session on stop
    let handler = runner.interrupt();
    if let Err(e) = ctrlc::set_handler(move || {
        println!("\n{} Stopping test execution...", "⏹️ ".yellow());
        handler.trigger();
    }) {
        log::warn!("could not install Ctrl-C handler: {}", e);
    }

    let completed = match config_error {
        Some(e) => {
            runner
                .logger_mut()
                .fail(format!("Test execution failed with error: {}", e));
            false
        }
        None => runner.run(&selection).await,
    };

    let success = completed && runner.any_passed();

    // a failed report write is already in the log as FAIL
    if let Ok(id) = runner.finish() {
        println!("\n📊 Report generated: {}", id.file_name());
    }

    if success {
        println!("\n{}", "✅ Test execution completed successfully!".green());
    } else {
        println!("\n{}", "❌ Test execution completed with failures!".red());
    }
    success
}
