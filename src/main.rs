use anyhow::{bail, Context};
use chrono::{DateTime, FixedOffset, Utc};
use clap::Parser;
use cronplan::{format::format_schedule, Expression};
use serde_json::json;
use std::io::{self, Read, Write};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_COUNT: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "cronplan", version)]
#[command(about = "Shows upcoming triggers of an AWS cron expression", long_about = None)]
struct Args {
    /// Cron expression, i.e. `5 0 * * ? *`; read from stdin if omitted.
    expression: Vec<String>,

    /// Number of triggers to show.
    #[arg(short = 'n', long, env = "CRONPLAN_COUNT", default_value_t = DEFAULT_COUNT)]
    count: usize,

    /// Print `{"expr": ..., "schedule": [...]}` instead of plain lines.
    #[arg(long)]
    json: bool,

    /// Reference time in RFC 3339 format, current time by default.
    #[arg(long, value_parser = DateTime::parse_from_rfc3339)]
    from: Option<DateTime<FixedOffset>>,

    /// Offset of the current time, used without `--from`.
    #[arg(long, env = "CRONPLAN_OFFSET", default_value = "+00:00", allow_hyphen_values = true)]
    offset: FixedOffset,
}

impl Args {
    fn expression_text(&self, stdin: impl Read) -> anyhow::Result<String> {
        let text = if self.expression.is_empty() {
            let mut text = String::new();
            let mut stdin = stdin;
            stdin
                .read_to_string(&mut text)
                .context("unable to read cron expression from stdin")?;
            text
        } else {
            self.expression.join(" ")
        };

        if text.trim().is_empty() {
            bail!("cron expression is empty");
        }

        Ok(text)
    }

    fn reference(&self) -> DateTime<FixedOffset> {
        self.from.unwrap_or_else(|| Utc::now().with_timezone(&self.offset))
    }
}

fn render_plain(schedule: &[String]) -> String {
    format!("{}\n", schedule.join("\n"))
}

fn render_json(expression: &str, schedule: &[String]) -> anyhow::Result<String> {
    let body = json!({
        "expr": expression,
        "schedule": schedule,
    });
    Ok(format!("{}\n", serde_json::to_string(&body)?))
}

fn run(args: &Args) -> anyhow::Result<String> {
    let text = args.expression_text(io::stdin().lock())?;
    let expression = Expression::new(text.as_str())?;
    let reference = args.reference();
    debug!(%expression, %reference, count = args.count, "calculating schedule");

    let schedule = format_schedule(&expression.next_n(&reference, args.count));
    if schedule.len() < args.count {
        debug!(%expression, found = schedule.len(), "expression has fewer upcoming triggers than requested");
    }

    if args.json {
        render_json(&text, &schedule)
    } else {
        Ok(render_plain(&schedule))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let output = run(&args)?;
    io::stdout()
        .lock()
        .write_all(output.as_bytes())
        .context("unable to write schedule")?;

    Ok(())
}
