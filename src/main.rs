use clap::Parser;
use colored::Colorize;
use polynomial::error::Result;
use polynomial::expr::Expr;
use polynomial::fold::{depth, size, Fold};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

/// Build, print and evaluate a handful of polynomial expressions
#[derive(Parser, Debug)]
#[command(name = "polynomial")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bind X to this value in every evaluation (default: 4 and 2)
    #[arg(short, long = "x-value", allow_negative_numbers = true)]
    x: Option<i64>,

    /// Also print the simplified form of each expression
    #[arg(short, long)]
    simplify: bool,

    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    if let Err(e) = run(&cli) {
        eprintln!("{}", format!("Error: {e}").red());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // 4 + 3 + X + 1 * ( X * X + 1 )
    let poly = Expr::add(
        Expr::add(Expr::int(4), Expr::int(3)),
        Expr::add(
            Expr::var(),
            Expr::mul(
                Expr::int(1),
                Expr::add(Expr::mul(Expr::var(), Expr::var()), Expr::int(1)),
            ),
        ),
    );
    println!("Original polynomial: {poly}");

    println!("\n--- Sub and Div ---");
    println!("Subtraction: {}", Expr::sub(Expr::int(10), Expr::int(3)));
    println!("Division: {}", Expr::div(Expr::int(15), Expr::int(3)));

    println!("\n--- Evaluation ---");
    // 2 * X - 1 + 6 / 2
    let simple_poly = Expr::add(
        Expr::sub(Expr::mul(Expr::int(2), Expr::var()), Expr::int(1)),
        Expr::div(Expr::int(6), Expr::int(2)),
    );
    report("Test polynomial", &simple_poly, cli.x.unwrap_or(4), cli.simplify)?;
    report("Original polynomial", &poly, cli.x.unwrap_or(2), cli.simplify)?;
    Ok(())
}

fn report(name: &str, expr: &Expr, x: i64, simplify: bool) -> Result<()> {
    let (nodes, levels) = size().zip(depth()).fold(expr);
    tracing::info!(name, nodes, levels, "evaluating");

    println!("{name}: {expr}");
    println!("Nodes: {nodes}, depth: {levels}");
    println!("Evaluation for X={x}: {}", expr.evaluate(x)?);
    if simplify {
        println!("Simplified: {}", expr.simplify()?);
    }
    Ok(())
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
