//! Interactive driver for a single ring buffer.
//!
//! ```text
//! cargo run --example repl -- --capacity 4 --item-size 1 --override
//! > add 1 2 3
//! > peek -1
//! > get
//! > info
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use fixring::{Error, RingBuffer, RingBufferAttr};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "repl", about = "Exercise a fixed-item ring buffer from stdin")]
struct Args {
    /// Number of item slots
    #[arg(short, long, default_value_t = 8)]
    capacity: usize,

    /// Item size in bytes (overrides the config file)
    #[arg(short, long)]
    item_size: Option<usize>,

    /// Evict the oldest item when full (overrides the config file)
    #[arg(short = 'o', long = "override")]
    override_on_full: bool,

    /// TOML file with `name`, `item_size` and `override_on_full`
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_attr(args: &Args) -> Result<RingBufferAttr, Box<dyn std::error::Error>> {
    let mut attr = match &args.config {
        Some(path) => RingBufferAttr::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => RingBufferAttr::default().with_name("repl"),
    };
    if let Some(item_size) = args.item_size {
        attr.item_size = item_size;
    }
    if args.override_on_full {
        attr.override_on_full = true;
    }
    Ok(attr)
}

/// Byte values making up a whole number of items, or `None`.
fn parse_items(words: &[&str], item_size: usize) -> Option<Vec<u8>> {
    let bytes: Option<Vec<u8>> = words.iter().map(|w| w.parse::<u8>().ok()).collect();
    let bytes = bytes?;
    if bytes.is_empty() || bytes.len() % item_size != 0 {
        return None;
    }
    Some(bytes)
}

fn print_info(rb: &RingBuffer<'_>, out: &mut impl Write) -> Result<(), Error> {
    let _ = writeln!(
        out,
        "name={} capacity={} item_size={} taken={} free={} full={} empty={} override={}",
        rb.name()?.unwrap_or("-"),
        rb.capacity()?,
        rb.item_size()?,
        rb.taken()?,
        rb.free()?,
        rb.is_full()?,
        rb.is_empty()?,
        rb.override_on_full()?,
    );
    Ok(())
}

fn dispatch(rb: &mut RingBuffer<'_>, line: &str, out: &mut impl Write) -> Result<bool, Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&cmd, rest)) = words.split_first() else {
        return Ok(true);
    };
    let item_size = rb.item_size()?;

    match cmd {
        "add" => {
            let items = parse_items(rest, item_size)
                .ok_or(Error::InvalidArgument("expected a multiple of item_size byte values"))?;
            if items.len() == item_size {
                rb.add(&items)?;
            } else {
                rb.add_multi(&items)?;
            }
            let _ = writeln!(out, "ok");
        }
        "get" => {
            let n = match rest.first() {
                Some(w) => w.parse::<usize>().map_err(|_| Error::InvalidArgument("expected an item count"))?,
                None => 1,
            };
            let mut items = vec![0u8; n * item_size];
            if n == 1 {
                rb.get(&mut items)?;
            } else {
                rb.get_multi(&mut items)?;
            }
            let _ = writeln!(out, "{items:?}");
        }
        "peek" => {
            let index = rest
                .first()
                .and_then(|w| w.parse::<isize>().ok())
                .ok_or(Error::InvalidArgument("expected a signed index"))?;
            let mut item = vec![0u8; item_size];
            rb.get_by_index(&mut item, index)?;
            let _ = writeln!(out, "[{index}] {item:?}");
        }
        "dump" => {
            let capacity = rb.capacity()? as isize;
            let mut item = vec![0u8; item_size];
            for index in -capacity..0 {
                rb.get_by_index(&mut item, index)?;
                let _ = writeln!(out, "[{index}] {item:?}");
            }
        }
        "reset" => {
            rb.reset()?;
            let _ = writeln!(out, "ok");
        }
        "info" => print_info(rb, out)?,
        "quit" | "exit" => return Ok(false),
        "help" => {
            let _ = writeln!(out, "commands: add <bytes..> | get [n] | peek <idx> | dump | reset | info | quit");
        }
        other => {
            let _ = writeln!(out, "unknown command '{other}', try 'help'");
        }
    }
    Ok(true)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let attr = load_attr(&args)?;
    let mut rb = RingBuffer::new(args.capacity, attr)?;
    info!(capacity = args.capacity, "ring buffer ready, type 'help'");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match dispatch(&mut rb, &line, &mut stdout) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_capacity() => {
                warn!("{e}");
                writeln!(stdout, "{e}")?;
            }
            Err(e) => writeln!(stdout, "error: {e}")?,
        }
    }
    Ok(())
}
