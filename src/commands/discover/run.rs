use chrono::Utc;

use super::*;

use crate::cli::DiscoverArgs;
use crate::model::{DiscoverPaths, DiscoverRunManifest, SourceDigest};
use crate::util::{
    ensure_directory, now_utc_string, read_json_lines, sha256_file, utc_compact_string,
    write_json_lines, write_json_pretty,
};

pub fn run(args: DiscoverArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let output_root = args.output_root.join(&args.science_id);
    ensure_directory(&output_root)?;

    let passages_path = args
        .passages_path
        .clone()
        .unwrap_or_else(|| output_root.join("passages.jsonl"));
    let divisions_path = args
        .divisions_path
        .clone()
        .unwrap_or_else(|| output_root.join("divisions.jsonl"));
    let toc_entries_path = output_root.join("toc_entries.jsonl");
    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        output_root.join(format!("discover_run_{}.json", utc_compact_string(started_ts)))
    });

    info!(
        science_id = %args.science_id,
        pages = %args.pages_path.display(),
        run_id = %run_id,
        "starting structure discovery"
    );

    let catalog = PatternCatalog::load(&args.catalog_path)?;
    let pages: Vec<PageRecord> = read_json_lines(&args.pages_path)?;
    let markup = fs::read_to_string(&args.markup_path)
        .with_context(|| format!("failed to read {}", args.markup_path.display()))?;

    let options = DiscoveryOptions {
        max_heading_line_chars: args.max_heading_line_chars,
        long_passage_pages: args.long_passage_pages,
    };
    let report = discover_structure(&markup, &pages, &catalog, &args.science_id, &options)?;

    let mut warnings = Vec::<String>::new();
    if report.counts.markup_content_page_count != pages.len() {
        let message = format!(
            "markup holds {} content pages but {} page records were supplied",
            report.counts.markup_content_page_count,
            pages.len()
        );
        warn!(
            markup_pages = report.counts.markup_content_page_count,
            page_records = pages.len(),
            "page count mismatch between markup and page records"
        );
        warnings.push(message);
    }
    if report.counts.unmapped_candidate_count > 0 {
        warnings.push(format!(
            "{} tagged headings referenced printed pages missing from the page records",
            report.counts.unmapped_candidate_count
        ));
    }
    if !report.toc_coverage.unmatched_titles.is_empty() {
        warn!(
            unmatched = report.toc_coverage.unmatched_titles.len(),
            entries = report.toc_coverage.toc_entry_count,
            "table-of-contents entries without a detected heading"
        );
    }

    write_json_lines(&passages_path, &report.passages)?;
    write_json_lines(&divisions_path, &report.divisions)?;
    write_json_lines(&toc_entries_path, &report.toc_entries)?;

    let mut sources = Vec::<SourceDigest>::with_capacity(3);
    for path in [&args.pages_path, &args.markup_path, &args.catalog_path] {
        sources.push(SourceDigest {
            path: path.display().to_string(),
            sha256: sha256_file(path)?,
        });
    }

    let manifest = DiscoverRunManifest {
        manifest_version: 1,
        run_id,
        science_id: args.science_id.clone(),
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_discover_command(&args),
        paths: DiscoverPaths {
            output_root: output_root.display().to_string(),
            passages_path: passages_path.display().to_string(),
            divisions_path: divisions_path.display().to_string(),
            manifest_path: manifest_path.display().to_string(),
        },
        counts: report.counts,
        toc_coverage: report.toc_coverage,
        sources,
        warnings,
    };

    write_json_pretty(&manifest_path, &manifest)?;

    info!(path = %passages_path.display(), "wrote passages");
    info!(path = %manifest_path.display(), "wrote discover run manifest");
    info!(
        passages = manifest.counts.passage_count,
        divisions = manifest.counts.division_count,
        "structure discovery completed"
    );

    Ok(())
}

fn render_discover_command(args: &DiscoverArgs) -> String {
    format!(
        "kitab-structure discover --pages-path {} --markup-path {} --catalog-path {} --science-id {} --output-root {} --max-heading-line-chars {} --long-passage-pages {}",
        args.pages_path.display(),
        args.markup_path.display(),
        args.catalog_path.display(),
        args.science_id,
        args.output_root.display(),
        args.max_heading_line_chars,
        args.long_passage_pages
    )
}
