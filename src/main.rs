use anyhow::Result;
use chancesplit::{config::SplitConfig, split};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) split chance.csv in the current directory ────────────────
    let cfg = SplitConfig::default();
    let manifest = split::run(&cfg)?;

    // ─── 3) per-part summary, oldest → newest ────────────────────────
    for p in &manifest.parts {
        info!(
            file = %p.file,
            rows = p.rows,
            first = %format!(
                "{}#{}",
                p.first_date.as_deref().unwrap_or("-"),
                p.first_draw.as_deref().unwrap_or("-")
            ),
            last = %format!(
                "{}#{}",
                p.last_date.as_deref().unwrap_or("-"),
                p.last_draw.as_deref().unwrap_or("-")
            ),
            "part"
        );
    }
    info!("regenerated parts + manifest");
    Ok(())
}
