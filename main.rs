use std::fs;
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::debug;

use kth_range::oplog::OpLog;
use kth_range::Order;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderArg {
    Largest,
    Smallest,
}

impl From<OrderArg> for Order {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Largest => Order::Largest,
            OrderArg::Smallest => Order::Smallest,
        }
    }
}

/// Answers K-th value queries over ranges of bins, after range inserts.
#[derive(Parser)]
#[command(name = "main", version)]
struct Cli {
    /// Operation log to replay; read from stdin when absent.
    input: Option<PathBuf>,
    /// Which order statistic `2`-type operations ask for.
    #[arg(long, value_enum, default_value = "largest")]
    order: OrderArg,
    /// Log at debug level (`RUST_LOG` takes precedence).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _r = env_logger::builder()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .format_target(false)
        .format_timestamp(None)
        .try_init();

    let input_buf = match &cli.input {
        Some(path) => fs::read(path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut v = vec![];
            std::io::stdin()
                .lock()
                .read_to_end(&mut v)
                .context("reading stdin")?;
            v
        }
    };
    debug!("read {} bytes of input", input_buf.len());

    let log = OpLog::parse(&input_buf).context("parsing operation log")?;

    let stdout = std::io::stdout();
    let mut output = BufWriter::with_capacity(1 << 16, stdout.lock());
    log.run(cli.order.into(), &mut output)
        .context("replaying operation log")?;
    output.flush()?;
    Ok(())
}
