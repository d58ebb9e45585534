use std::path::PathBuf;

use temario_core::load_tree;
use temario_embed::{CachedProvider, FileCache, OllamaConfig, OllamaEmbedder};
use temario_similarity::{AnalyzerOptions, AnalyzerReport, SimilarityAnalyzer};

use crate::markdown;
use crate::SimilarityArgs;

const MAX_PRINTED_NOTES: usize = 50;

fn default_cache_path() -> PathBuf {
    PathBuf::from("themes_embeddings_cache.json")
}

pub fn run_similarity(args: SimilarityArgs) -> Result<(), String> {
    let config = super::load_config(args.config.as_deref())?;
    let tree = load_tree(&args.themes).map_err(|e| e.to_string())?;

    let mut options = AnalyzerOptions::from(&config);
    if let Some(threshold) = args.threshold {
        options.threshold = threshold;
    }

    let mut ollama = OllamaConfig::default();
    if let Some(endpoint) = args.endpoint.clone() {
        ollama.endpoint = endpoint;
    }
    if let Some(model) = args.model.clone() {
        ollama.model = model;
    }
    let model = ollama.model.clone();
    let embedder = OllamaEmbedder::new(ollama);

    let report = if args.no_cache {
        let analyzer = SimilarityAnalyzer::new(embedder, options);
        analyzer.run(&tree).map_err(|e| e.to_string())?
    } else {
        let cache_path = args.cache.clone().unwrap_or_else(default_cache_path);
        let cache = FileCache::load_or_create(&cache_path, &model)?;
        if let Some(reason) = &cache.reset_reason {
            eprintln!("embedding cache reset: {}", reason);
        }
        let analyzer = SimilarityAnalyzer::new(CachedProvider::new(embedder, cache), options);
        let report = analyzer.run(&tree).map_err(|e| e.to_string())?;
        analyzer.provider().persist()?;
        report
    };

    let generated_at = super::now_utc_rfc3339();
    render(&args, &report, &model, &generated_at, options.top_n)?;
    Ok(())
}

fn render(
    args: &SimilarityArgs,
    report: &AnalyzerReport,
    model: &str,
    generated_at: &str,
    top_n: usize,
) -> Result<(), String> {
    if args.json {
        let payload = serde_json::json!({
            "command": "similarity",
            "themes": args.themes.to_string_lossy(),
            "generated_at": generated_at,
            "model": model,
            "report": report,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).map_err(|e| format!("json encode: {}", e))?
        );
    } else {
        println!("themes={}", args.themes.display());
        println!("model={}", model);
        println!("threshold={}", report.threshold);
        println!("l2_pairs={}", report.l2_pair_count);
        println!("l3_pairs={}", report.l3_pair_count);
        println!("notes={}", report.notes.len());

        for pair in report.top(top_n) {
            println!(
                "pair severity={} level={} parent={} codes={}<->{} score={:.3} labels={} <-> {}",
                pair.severity,
                pair.level,
                pair.parent,
                pair.code_a,
                pair.code_b,
                pair.score,
                pair.label_a,
                pair.label_b
            );
        }
        if report.pairs.len() > top_n {
            println!(
                "pairs_truncated=true shown={} total={}",
                top_n,
                report.pairs.len()
            );
        }

        for note in report.notes.iter().take(MAX_PRINTED_NOTES) {
            println!("note code={} message={}", note.code, note.message);
        }
        if report.notes.len() > MAX_PRINTED_NOTES {
            println!(
                "notes_truncated=true shown={} total={}",
                MAX_PRINTED_NOTES,
                report.notes.len()
            );
        }
    }

    if let Some(out) = &args.out {
        let md = markdown::render_similarity(
            report,
            &args.themes.to_string_lossy(),
            model,
            generated_at,
        );
        std::fs::write(out, md).map_err(|e| format!("write {}: {}", out.display(), e))?;
        if !args.json {
            println!("report={}", out.display());
        }
    }

    Ok(())
}
