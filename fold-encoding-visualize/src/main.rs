use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use fold_encoding_expr::expr::{
    eval::{eval, eval_checked, eval_layer, eval_layer_checked, write},
    parse::parse,
    pattern::push_neg,
};
use fold_encoding_visualize::visualize::FevVizExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Evaluate and rewrite arithmetic expressions held in fold-encoded form.
///
/// Expressions use the printed form: integers, `(-e)` and `(a+b)`.
#[derive(Debug, Parser)]
#[command(name = "fev", version, about)]
struct Args {
    /// expressions to evaluate, eg "(1+(-2))"
    #[arg(required = true, allow_negative_numbers = true)]
    exprs: Vec<String>,

    /// also print each expression with negations pushed down to literals
    #[arg(long)]
    rewrite: bool,

    /// fail on overflow instead of wrapping
    #[arg(long)]
    checked: bool,

    /// write a JSON trace of each evaluation; with several expressions the index is appended to the file stem
    #[arg(long, value_name = "PATH")]
    trace: Option<PathBuf>,
}

fn trace_path(base: &Path, idx: usize, total: usize) -> PathBuf {
    if total == 1 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trace".to_string());
    let name = match base.extension() {
        Some(ext) => format!("{}-{}.{}", stem, idx, ext.to_string_lossy()),
        None => format!("{}-{}", stem, idx),
    };
    base.with_file_name(name)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    for (idx, src) in args.exprs.iter().enumerate() {
        let e = parse(src).with_context(|| format!("could not parse {:?}", src))?;
        let printed = write(&e);

        let value = if args.checked {
            eval_checked(&e).with_context(|| format!("could not evaluate {}", printed))?
        } else {
            eval(&e)
        };
        println!("{} = {}", printed, value);

        if args.rewrite {
            println!("{} => {}", printed, write(&push_neg(&e)));
        }

        if let Some(base) = &args.trace {
            let path = trace_path(base, idx, args.exprs.len());
            let viz = if args.checked {
                e.try_fold_v(eval_layer_checked).1
            } else {
                e.fold_v(eval_layer).1
            };
            viz.label("Evaluate", printed.as_str())
                .write(&path)
                .with_context(|| format!("could not write trace to {}", path.display()))?;
            info!(path = %path.display(), "trace written");
        }
    }

    Ok(())
}
