//! promql CLI
//!
//! Command-line interface for the PromQL builder:
//! - Render JSON expression trees to PromQL
//! - Build vector selectors from arguments
//! - Print example queries
//! - Generate a default config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use promql_builder::config::{generate_default_config, Config, LoggingConfig, OutputFormat};
use promql_builder::promql::{
    avg_over_time, div, gt, histogram_quantile, n, rate, subquery, sum, topk, vector,
    Builder, Expr, LabelMatchingOperator, LabelSelectorBuilder, VectorExprBuilder,
};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "promql")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build and render PromQL expressions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text, json). Defaults to the configured format.
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a JSON expression tree
    Render {
        /// Path to the JSON file, or - for stdin
        input: String,
    },

    /// Build a vector selector
    Vector {
        /// Metric name
        metric: String,
        /// Label matchers: name=value, name!=value, name=~regex, name!~regex
        #[arg(short, long = "label")]
        labels: Vec<String>,
        /// Range, turning the selector into a range vector (e.g. 5m)
        #[arg(long)]
        range: Option<String>,
        /// Offset modifier (e.g. 1d)
        #[arg(long)]
        offset: Option<String>,
        /// @ modifier (e.g. 1609746000, start(), end())
        #[arg(long)]
        at: Option<String>,
    },

    /// Print example queries
    Demo,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_tracing(&config.logging);

    let format = cli.format.unwrap_or(config.output.format);

    match cli.command {
        Commands::Render { input } => {
            let content = read_input(&input)?;
            let expr = Expr::from_json(&content)
                .with_context(|| format!("Invalid expression in {}", input))?;
            tracing::debug!(kind = expr.kind(), "Rendering expression");
            print_expr(expr, format)?;
        }

        Commands::Vector {
            metric,
            labels,
            range,
            offset,
            at,
        } => {
            let mut selector = vector(metric)?;
            for matcher in &labels {
                selector = selector.label_selector(parse_matcher(matcher)?);
            }
            selector = apply_modifiers(selector, range, offset, at);
            print_expr(selector, format)?;
        }

        Commands::Demo => {
            for (title, expr) in demo_queries()? {
                match format {
                    OutputFormat::Text => println!("# {}\n{}\n", title, expr),
                    OutputFormat::Json => println!("{}", expr.to_json()?),
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("promql_builder={}", logging.level)));

    let json = logging.format.eq_ignore_ascii_case("json");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let pretty_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .init();
}

fn read_input(input: &str) -> anyhow::Result<String> {
    let mut content = String::new();
    if input == "-" {
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
    } else {
        content = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input))?;
    }
    Ok(content)
}

fn print_expr(expr: impl Builder<Expr>, format: OutputFormat) -> anyhow::Result<()> {
    let expr = expr.build();
    match format {
        OutputFormat::Text => println!("{}", expr),
        OutputFormat::Json => println!("{}", expr.to_json()?),
    }
    Ok(())
}

fn apply_modifiers(
    mut selector: VectorExprBuilder,
    range: Option<String>,
    offset: Option<String>,
    at: Option<String>,
) -> VectorExprBuilder {
    if let Some(range) = range {
        selector = selector.range(range);
    }
    if let Some(offset) = offset {
        selector = selector.offset(offset);
    }
    if let Some(at) = at {
        selector = selector.at(at);
    }
    selector
}

/// Parse `name<op>value` where op is one of `=`, `!=`, `=~`, `!~`
fn parse_matcher(matcher: &str) -> anyhow::Result<LabelSelectorBuilder> {
    let Some(split) = matcher.find(['=', '!']) else {
        bail!("Invalid label matcher '{}': expected name=value", matcher);
    };
    let (name, rest) = matcher.split_at(split);

    let (operator, value) = if let Some(value) = rest.strip_prefix("=~") {
        (LabelMatchingOperator::MatchRegexp, value)
    } else if let Some(value) = rest.strip_prefix("!~") {
        (LabelMatchingOperator::NotMatchRegexp, value)
    } else if let Some(value) = rest.strip_prefix("!=") {
        (LabelMatchingOperator::NotEqual, value)
    } else if let Some(value) = rest.strip_prefix('=') {
        (LabelMatchingOperator::Equal, value)
    } else {
        bail!("Invalid label matcher '{}': unknown operator", matcher);
    };

    let selector = LabelSelectorBuilder::new(name.trim())
        .with_context(|| format!("Invalid label matcher '{}'", matcher))?
        .operator(operator)
        .value(value);
    Ok(selector)
}

fn demo_queries() -> anyhow::Result<Vec<(&'static str, Expr)>> {
    let requests = vector("http_requests_total")?.label("job", "api")?;

    let request_rate = sum(rate(requests.clone().range("5m"))).by(["instance"]);

    let errors = sum(rate(
        requests
            .clone()
            .label_match_regexp("code", "5..")?
            .range("5m"),
    ));
    let error_ratio = gt(div(errors, sum(rate(requests.range("5m")))), n(0.05));

    let latency = histogram_quantile(
        0.99,
        sum(rate(vector("http_request_duration_seconds_bucket")?.range("5m"))).by(["le"]),
    );

    let memory = topk(
        5.0,
        avg_over_time(
            subquery(vector("process_resident_memory_bytes")?)
                .range("1h")
                .resolution("5m"),
        ),
    );

    Ok(vec![
        ("Request rate per instance", request_rate.build()),
        ("Error ratio above 5%", error_ratio.build()),
        ("99th percentile latency", latency.build()),
        ("Top 5 memory consumers over the last hour", memory.build()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matcher_operators() {
        let cases = [
            ("job=api", r#"job="api""#),
            ("code!=200", r#"code!="200""#),
            ("path=~/api/.*", r#"path=~"/api/.*""#),
            ("env!~dev|test", r#"env!~"dev|test""#),
            ("empty=", r#"empty="""#),
        ];

        for (input, expected) in cases {
            assert_eq!(parse_matcher(input).unwrap().to_string(), expected);
        }
    }

    #[test]
    fn test_parse_matcher_rejects_invalid() {
        assert!(parse_matcher("job").is_err());
        assert!(parse_matcher("=api").is_err());
    }

    #[test]
    fn test_demo_queries_render() {
        let queries = demo_queries().unwrap();
        assert_eq!(queries.len(), 4);
        assert_eq!(
            queries[0].1.to_string(),
            r#"sum by (instance) (rate(http_requests_total{job="api"}[5m]))"#
        );
        assert_eq!(
            queries[3].1.to_string(),
            "topk(5, avg_over_time(process_resident_memory_bytes[1h:5m]))"
        );
    }
}
