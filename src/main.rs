use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use std::path::PathBuf;

use swingsite::config::SiteConfig;
use swingsite::fetch::SourceFetcher;
use swingsite::logging::{log, obj, v_str, Domain, Level};
use swingsite::site::{build_site, detail_view, map_view, tracker_view};

const USAGE: &str = "usage: swingsite [build [OUT_DIR] | map | state QUERY | tracker]";

#[tokio::main]
async fn main() -> Result<()> {
    let mut cfg = SiteConfig::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cmd = args.first().map(String::as_str).unwrap_or("build");
    let arg = args.get(1);
    if let ("build", Some(out)) = (cmd, arg) {
        cfg.out_dir = PathBuf::from(out);
    }
    let fetcher = SourceFetcher::new(&cfg)?;

    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("command", v_str(cmd)),
            ("races", v_str(&cfg.races_path)),
            ("tracker", v_str(&cfg.tracker_path)),
            ("topology", v_str(&cfg.topology_url)),
        ]),
    );

    match cmd {
        "build" => {
            let report = build_site(&cfg, &fetcher, Utc::now()).await?;
            for page in &report.pages {
                println!("{:<16} {:?} {} bytes", page.file, page.status, page.bytes);
            }
        }
        "map" => {
            println!("{}", map_view(&fetcher, &cfg).await.page.render());
        }
        "state" => {
            let query = arg.map(String::as_str).unwrap_or("");
            println!("{}", detail_view(&fetcher, &cfg, Some(query)).await.page.render());
        }
        "tracker" => {
            println!("{}", tracker_view(&fetcher, &cfg, Utc::now()).await.page.render());
        }
        other => {
            log(
                Level::Error,
                Domain::System,
                "bad_command",
                obj(&[("command", json!(other))]),
            );
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
    Ok(())
}
