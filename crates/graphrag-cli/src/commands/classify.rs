use anyhow::{Context, Result};
use clap::Args;
use graphrag_core::{CacheStats, OptimizationStats, Query, QueryOptimizer, QueryPlan};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};

use super::print_table;
use crate::config::Config;

#[derive(Args)]
pub struct ClassifyArgs {
    /// File with one JSON query per line (stdin when omitted or "-")
    pub file: Option<String>,

    /// Emit one JSON object per query
    #[arg(long)]
    pub json: bool,

    /// Print cache statistics after the last query
    #[arg(long)]
    pub stats: bool,
}

/// Classification of a single input line
#[derive(Debug, Serialize)]
struct ClassifiedLine<'a> {
    line: usize,
    fingerprint: &'a str,
    fallback: bool,
    graph_type: &'a str,
}

pub fn execute(args: ClassifyArgs, cfg: &Config) -> Result<()> {
    let mut optimizer = QueryOptimizer::new(cfg.optimizer.clone())?;
    let reader = open_input(args.file.as_deref())?;

    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read line {}", line_no))?;
        if line.trim().is_empty() {
            continue;
        }

        let query = Query::parse(&line)
            .with_context(|| format!("invalid query on line {}", line_no))?;
        let plan = optimizer.optimize_query(&query);

        if args.json {
            println!("{}", serde_json::to_string(&classified(line_no, &plan))?);
        } else {
            rows.push(vec![
                line_no.to_string(),
                plan.fingerprint.to_string(),
                plan.graph_type.to_string(),
            ]);
        }
    }

    tracing::debug!(
        queries = optimizer.fingerprint_cache().accesses(),
        "classification finished"
    );

    if !args.json {
        print_table(&["Line", "Fingerprint", "Graph Type"], &rows);
    }

    if args.stats {
        print_stats(&optimizer.get_optimization_stats(), args.json)?;
    }

    Ok(())
}

fn open_input(file: Option<&str>) -> Result<Box<dyn BufRead>> {
    match file {
        None | Some("-") => Ok(Box::new(BufReader::new(io::stdin()))),
        Some(path) => {
            let file = File::open(path).with_context(|| format!("failed to open {}", path))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

fn classified(line: usize, plan: &QueryPlan) -> ClassifiedLine<'_> {
    ClassifiedLine {
        line,
        fingerprint: plan.fingerprint.as_str(),
        fallback: plan.fingerprint.is_fallback(),
        graph_type: plan.graph_type.as_str(),
    }
}

fn print_stats(stats: &OptimizationStats, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&serde_json::json!({ "stats": stats }))?);
        return Ok(());
    }

    let row = |name: &str, s: &CacheStats| {
        vec![
            name.to_string(),
            s.size.to_string(),
            s.max_size.to_string(),
            s.accesses.to_string(),
            s.hits.to_string(),
            format!("{:.1}%", s.hit_rate),
        ]
    };

    print_table(
        &["Cache", "Size", "Max Size", "Accesses", "Hits", "Hit Rate"],
        &[
            row("fingerprint", &stats.fingerprint_cache),
            row("graph_type", &stats.graph_type_cache),
        ],
    );
    Ok(())
}
