use std::env;
use std::fs;

use chapter_model::RuleSet;
use chunker_service::{accept_detected, run_pipeline, RunConfig};
use doc_chunker::csv_export::CsvEncoding;

fn print_usage() {
    eprintln!(
        "Usage:\n\
         chapter-export scan FILE.docx [--rules RULES.json] [--no-auto]\n\
         chapter-export export FILE.docx [--out OUT.csv] [--book NAME] [--author NAME]\n\
         \x20                 [--min N] [--max N] [--overlap PCT] [--rules RULES.json]\n\
         \x20                 [--no-auto] [--shift-jis]\n\
         \n\
         scan    prints the detected header table for review\n\
         export  runs the full pipeline and writes the chunk CSV\n\
         Notes: --overlap is a percentage (default 20); the default output path\n\
         derives from the input filename.\n"
    );
}

fn load_rules(path: &str) -> Result<RuleSet, String> {
    let json = fs::read_to_string(path).map_err(|e| format!("failed to read `{path}`: {e}"))?;
    RuleSet::from_json(&json).map_err(|e| format!("invalid rules in `{path}`: {e}"))
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    let mut it = s.chars();
    let truncated: String = it.by_ref().take(max_chars).collect();
    if it.next().is_some() { format!("{}…", truncated) } else { truncated }
}

fn take_positional(tail: &mut Vec<String>) -> Result<String, String> {
    if tail.is_empty() || tail[0].starts_with('-') {
        return Err("a .docx file path is required".into());
    }
    Ok(tail.remove(0))
}

fn do_scan(mut tail: Vec<String>) -> Result<(), String> {
    let doc_path = take_positional(&mut tail)?;

    let mut rules = RuleSet::default();
    let mut i = 0;
    while i < tail.len() {
        match tail[i].as_str() {
            "--rules" => {
                if i + 1 < tail.len() { rules = load_rules(&tail[i + 1])?; i += 2; } else { return Err("--rules requires path".into()); }
            }
            "--no-auto" => { rules.auto_detect = false; i += 1; }
            _ => { i += 1; }
        }
    }

    let output = doc_chunker::scan_docx_file(&doc_path, &rules).map_err(|e| e.to_string())?;

    println!(
        "{}: {} paragraphs, {} headers detected",
        output.info.source_path, output.info.paragraph_count, output.info.header_count
    );
    if let Some(size) = output.info.file_size_bytes {
        println!("size: {} bytes, sha256: {}", size, output.info.content_sha256.as_deref().unwrap_or("-"));
    }
    println!("{:>4}  {:<3} {:>5}  {:<7} {:>6}  text", "idx", "lvl", "score", "align", "max pt");
    for row in &output.rows {
        let lvl = row.level().map(|l| l.key()).unwrap_or("");
        let max_pt = row
            .features
            .max_font_size
            .map(|s| format!("{s:.1}"))
            .unwrap_or_else(|| "-".into());
        println!(
            "{:>4}  {:<3} {:>5}  {:<7} {:>6}  {}",
            row.idx,
            lvl,
            row.score,
            row.features.align.as_str(),
            max_pt,
            truncate_chars(&row.text, 60)
        );
    }
    Ok(())
}

fn derive_output_path(doc_path: &str) -> String {
    match doc_path.strip_suffix(".docx") {
        Some(stem) => format!("{stem}.chunks.csv"),
        None => format!("{doc_path}.chunks.csv"),
    }
}

fn do_export(mut tail: Vec<String>) -> Result<(), String> {
    let doc_path = take_positional(&mut tail)?;

    let mut config = RunConfig::default();
    let mut out_path: Option<String> = None;
    let mut encoding = CsvEncoding::Utf8Bom;

    let mut i = 0;
    while i < tail.len() {
        match tail[i].as_str() {
            "--out" => {
                if i + 1 < tail.len() { out_path = Some(tail[i + 1].clone()); i += 2; } else { return Err("--out requires path".into()); }
            }
            "--book" => {
                if i + 1 < tail.len() { config.book_name = tail[i + 1].clone(); i += 2; } else { return Err("--book requires value".into()); }
            }
            "--author" => {
                if i + 1 < tail.len() { config.author_name = tail[i + 1].clone(); i += 2; } else { return Err("--author requires value".into()); }
            }
            "--min" => {
                if i + 1 < tail.len() { config.chunk.min_words = tail[i + 1].parse().map_err(|_| "--min requires number")?; i += 2; } else { return Err("--min requires number".into()); }
            }
            "--max" => {
                if i + 1 < tail.len() { config.chunk.max_words = tail[i + 1].parse().map_err(|_| "--max requires number")?; i += 2; } else { return Err("--max requires number".into()); }
            }
            "--overlap" => {
                if i + 1 < tail.len() {
                    let pct: f64 = tail[i + 1].parse().map_err(|_| "--overlap requires percent")?;
                    config.chunk.overlap = pct / 100.0;
                    i += 2;
                } else {
                    return Err("--overlap requires percent".into());
                }
            }
            "--rules" => {
                if i + 1 < tail.len() { config.rules = load_rules(&tail[i + 1])?; i += 2; } else { return Err("--rules requires path".into()); }
            }
            "--no-auto" => { config.rules.auto_detect = false; i += 1; }
            "--shift-jis" => { encoding = CsvEncoding::ShiftJis; i += 1; }
            _ => { i += 1; }
        }
    }

    let out = out_path.unwrap_or_else(|| derive_output_path(&doc_path));
    let report = run_pipeline(&doc_path, &out, &config, encoding, accept_detected)
        .map_err(|e| e.to_string())?;

    for warning in &report.warnings {
        eprintln!("warn: {}", warning);
    }
    if report.chunks_written > 0 {
        println!(
            "Wrote {} chunks from {} rows ({} headers) to {}",
            report.chunks_written, report.rows_scanned, report.headers_detected, out
        );
    }
    Ok(())
}

fn main() {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        return;
    }
    let cmd = args.remove(0);
    let res = match cmd.as_str() {
        "scan" => do_scan(args),
        "export" => do_export(args),
        _ => {
            print_usage();
            return;
        }
    };
    if let Err(err) = res {
        eprintln!("Error: {}", err);
        print_usage();
        std::process::exit(1);
    }
}
