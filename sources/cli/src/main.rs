use std::process::exit;

use anyhow::{anyhow, Result};
use args::{Cli, Command};
use bridge::{
    dispatch::{CallDisposition, CallSite},
    frame::{Frame, FrameStack},
    options::{BridgeOptions, KeyPolicy},
    value::{Object, Value},
    vm::NativeBridge,
};
use clap::Parser;
use support::signature::split_key;
use tracing::{error, info, warn, Level};
use tracing_subscriber::fmt;

mod args;

/// Read one command line argument as a VM value.
fn parse_literal(text: &str) -> Result<Value> {
    match text {
        "null" => return Ok(Value::Null),
        "true" => return Ok(Value::bool(true)),
        "false" => return Ok(Value::bool(false)),
        _ => {}
    }

    if let Some(string) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        return Ok(Value::string(string));
    }

    if let Some(long) = text.strip_suffix(['L', 'l']) {
        return long
            .parse::<i64>()
            .map(Value::long)
            .map_err(|e| anyhow!("bad long literal {:?}: {}", text, e));
    }

    if let Some(float) = text.strip_suffix(['F', 'f']) {
        return float
            .parse::<f32>()
            .map(Value::float)
            .map_err(|e| anyhow!("bad float literal {:?}: {}", text, e));
    }

    if let Ok(int) = text.parse::<i32>() {
        return Ok(Value::int(int));
    }

    text.parse::<f64>()
        .map(Value::double)
        .map_err(|_| anyhow!("cannot read {:?} as a literal", text))
}

fn call(
    bridge: &NativeBridge,
    signature: &str,
    literals: &[String],
    this: Option<&str>,
) -> Result<i32> {
    let (class_name, method_name, method_type) =
        split_key(signature).ok_or_else(|| anyhow!("{:?} is not a signature", signature))?;

    let mut site = CallSite::new(class_name, method_name, method_type);
    let mut operands = vec![];

    if let Some(class) = this {
        site = site.with_receiver();
        operands.push(Value::Object(Object::new(class)));
    }

    for literal in literals {
        operands.push(parse_literal(literal)?);
    }

    let frames = FrameStack::main().shared();
    frames
        .write()
        .push(Frame::new("gbridge", "main", "([Ljava/lang/String;)V"));

    let disposition = bridge.invoke(&frames, &site, &mut operands)?;
    if !operands.is_empty() {
        warn!("{} argument(s) were not used", operands.len());
    }

    match disposition {
        CallDisposition::Returned(Some(value)) => println!("{value}"),
        CallDisposition::Returned(None) => {}
        CallDisposition::Caught => println!("caught"),
        CallDisposition::Propagated(exception) => {
            eprintln!(
                "Exception in thread \"main\" {}: {}",
                exception.kind, exception
            );
            return Ok(1);
        }
    }

    Ok(0)
}

fn run(command: Command, options: BridgeOptions) -> Result<i32> {
    let bridge = NativeBridge::boot(options)?;
    let registry = bridge.registry();

    match command {
        Command::List { filter } => {
            registry
                .signatures()
                .into_iter()
                .filter(|key| filter.as_deref().map_or(true, |f| key.contains(f)))
                .for_each(|key| println!("{key}"));

            Ok(0)
        }
        Command::Check => {
            let problems = registry.verify();
            for problem in &problems {
                println!("{problem}");
            }

            println!(
                "{} signatures, {} problems",
                registry.len(),
                problems.len()
            );

            Ok(if problems.is_empty() { 0 } else { 1 })
        }
        Command::Coverage => {
            let traps = registry.traps();
            for (key, trap) in &traps {
                println!("{:<12} {}", trap.to_string(), key);
            }

            println!(
                "{} of {} signatures are trapped",
                traps.len(),
                registry.len()
            );

            Ok(0)
        }
        Command::Call {
            signature,
            args,
            this,
        } => call(&bridge, &signature, &args, this.as_deref()),
    }
}

fn main() {
    let args = Cli::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let format = fmt::format()
        .with_ansi(true)
        .without_time()
        .with_level(true)
        .with_target(false)
        .with_thread_names(false)
        .with_source_location(args.verbose > 0)
        .compact();

    tracing_subscriber::fmt()
        .with_max_level(level)
        .event_format(format)
        .with_writer(std::io::stderr)
        .init();

    let options = BridgeOptions {
        trace: args.trace,
        key_policy: if args.strict {
            KeyPolicy::Strict
        } else {
            KeyPolicy::Lenient
        },
        check_slots: args.check_slots,
    };

    info!("Booting native bridge");

    let code = match run(args.command, options) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    };

    exit(code)
}
