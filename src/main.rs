use anyhow::{Context, Result};
use permitwatch::{
    bind::{Binder, GraphHost},
    chart::ChartSpec,
    config::Config,
    dataset::PermitTable,
    fetch, pages,
    pages::permitting_time,
    telemetry,
};
use reqwest::Client;
use std::{fs, path::PathBuf, sync::Arc};
use tokio::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Page host adapter for static output: every committed figure is written to
/// `figures/<graph_id>.json` as a Plotly figure.
struct FigureDir {
    dir: PathBuf,
}

impl GraphHost for FigureDir {
    fn replace_figure(&mut self, graph_id: &str, figure: &ChartSpec) {
        let path = self.dir.join(format!("{graph_id}.json"));
        let json = figure.to_plotly();
        if let Err(e) = fs::write(&path, json.to_string()) {
            error!(graph = %graph_id, "failed to write figure: {e}");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) resolve configuration ────────────────────────────────────
    let config = Config::from_env()?;
    let pages_dir = config.out_dir.join("pages");
    let figures_dir = config.out_dir.join("figures");
    for d in [&pages_dir, &figures_dir] {
        fs::create_dir_all(d).with_context(|| format!("creating {}", d.display()))?;
    }

    // ─── 3) fetch the dataset once ───────────────────────────────────
    let client = Client::new();
    let start = Instant::now();
    let raw = fetch::fetch_parquet(&client, &config.permit_time_url).await?;
    info!(elapsed = ?start.elapsed(), "dataset fetched");

    // ─── 4) decode into the process-wide immutable table ─────────────
    let table = Arc::new(PermitTable::from_parquet_bytes(raw)?);

    // ─── 5) assemble pages and write manifests ───────────────────────
    let site = pages::all(&table);
    for page in &site {
        let slug = page_slug(&page.path);
        let path = pages_dir.join(format!("{slug}.json"));
        let json = serde_json::to_string_pretty(page)
            .with_context(|| format!("serializing page {}", page.path))?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(page = %page.path, out = %path.display(), "wrote page");
    }

    // ─── 6) bind interactive graphs and commit their initial figures ──
    let mut host = FigureDir { dir: figures_dir };
    let mut binders = [
        (
            Binder::new(
                table.clone(),
                permitting_time::CHECKLIST_GRAPH_ID,
                &permitting_time::default_checklist_selection(),
            ),
            permitting_time::default_checklist_selection(),
        ),
        (
            Binder::new(
                table.clone(),
                permitting_time::DETAIL_GRAPH_ID,
                &permitting_time::default_detail_selection(),
            ),
            permitting_time::default_detail_selection(),
        ),
    ];
    for (binder, selection) in &mut binders {
        binder.apply(selection, &mut host);
        info!(graph = %binder.graph_id(), "committed initial figure");
    }

    // ─── 7) done ─────────────────────────────────────────────────────
    telemetry::track_event(
        "site_build",
        &[
            ("pages", &site.len().to_string()),
            ("cities", &table.cities().len().to_string()),
        ],
    );
    info!("all done");
    Ok(())
}

/// File stem for a page path: "/" → "home", "/permitting-time" →
/// "permitting-time".
fn page_slug(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "home".to_string()
    } else {
        trimmed.replace('/', "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use permitwatch::bind::Selection;
    use permitwatch::dataset::PermitRecord;
    use tempfile::tempdir;

    #[test]
    fn page_slugs() {
        assert_eq!(page_slug("/"), "home");
        assert_eq!(page_slug("/permitting-time"), "permitting-time");
        assert_eq!(page_slug("/a/b"), "a-b");
    }

    #[test]
    fn figure_host_writes_plotly_json() -> Result<()> {
        let dir = tempdir()?;
        let table = Arc::new(PermitTable::from_records(vec![PermitRecord {
            city: "Kirkland".to_string(),
            date: "2020-01-01".parse().unwrap(),
            median_issue_days: 100.0,
            application_count: 5,
        }]));
        let mut host = FigureDir {
            dir: dir.path().to_path_buf(),
        };
        let mut binder = Binder::new(table, "g", &Selection::cities(["Kirkland"]));
        binder.apply(&Selection::cities(["Kirkland"]), &mut host);

        let written = fs::read_to_string(dir.path().join("g.json"))?;
        let fig: serde_json::Value = serde_json::from_str(&written)?;
        assert_eq!(fig["data"][0]["name"], "Kirkland");
        Ok(())
    }
}
