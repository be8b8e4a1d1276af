//! `keywords` and `news` command handlers.

use datapulse_core::{AppConfig, Dataset, KeywordCatalog};
use datapulse_news::{extract_keywords, NewsAnalyzer, NewsConfig, Report};

pub(crate) fn run_keywords(dataset: &Dataset, catalog: &KeywordCatalog) {
    let extraction = extract_keywords(dataset, catalog);
    if extraction.columns_skipped > 0 {
        println!(
            "warning: {} column(s) contradicted their type and contributed only their name",
            extraction.columns_skipped
        );
    }
    for keyword in &extraction.keywords {
        println!("{keyword}");
    }
}

/// Run the news analysis and print either impact cards or the raw report.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or JSON output fails.
pub(crate) async fn run_news(
    config: &AppConfig,
    catalog: KeywordCatalog,
    dataset: &Dataset,
    json: bool,
) -> anyhow::Result<()> {
    let analyzer = NewsAnalyzer::http(NewsConfig::from_app_config(config), catalog)?;
    let report = analyzer.analyze(dataset).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

pub(crate) fn render_report(report: &Report) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    if report.keywords.is_empty() {
        out.push_str("no keywords could be derived from the dataset\n");
        return out;
    }
    if report.impacts.is_empty() {
        let _ = writeln!(
            out,
            "no news found for {} keyword(s)",
            report.keywords.len()
        );
        return out;
    }

    let counts = report.label_counts();
    let _ = writeln!(
        out,
        "positive: {}  negative: {}  neutral: {}",
        counts.positive, counts.negative, counts.neutral
    );
    for impact in &report.impacts {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", impact.title);
        let _ = writeln!(
            out,
            "  {} ({:.2}) from {}",
            impact.sentiment_label, impact.confidence, impact.source
        );
        if !impact.summary.is_empty() {
            let _ = writeln!(out, "  {}", impact.summary);
        }
        let _ = writeln!(out, "  {}", impact.url);
    }
    out
}
