use wscr::UpdateOutcome;

#[derive(clap::Parser)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create the webcomic schema and comics table
    Init,
    /// Fetch each page and reconcile it against the stored record
    Poll {
        #[arg(value_name = "url", required = true)]
        urls: Vec<String>,
    },
    /// Print the stored record for a page's source
    Show { url: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use clap::Parser;

    pretty_env_logger::init_timed();
    wscr::db::init_db().await;

    let args = Args::parse();
    let conn = wscr::db::get_connection().await?;

    match args.command {
        Commands::Init => {
            wscr::db::init_schema(&conn).await?;
            tracing::info!(target: "poller", "schema ready");
        }
        Commands::Poll { urls } => {
            let client = wscr::scrape::basic()?;
            for url in urls {
                match wscr::scrape::poll_and_update(&client, &conn, &url).await {
                    Ok(UpdateOutcome::Initiated(comic)) => {
                        tracing::info!(target: "poller", "\x1b[36m[{}] initiated: {}\x1b[0m", comic.source, comic.title);
                    }
                    Ok(UpdateOutcome::Updated(comic)) => {
                        tracing::info!(target: "poller", "\x1b[36m[{}] updated: {}\x1b[0m", comic.source, comic.title);
                    }
                    Ok(UpdateOutcome::UpToDate) => {
                        tracing::info!(target: "poller", "{url} up to date");
                    }
                    Err(e) => {
                        let e = anyhow::Error::from(e);
                        tracing::error!(target: "poller", "\x1b[31m{url}: {e:#}\x1b[0m");
                    }
                }
            }
        }
        Commands::Show { url } => {
            let key = wscr::identify(&url)?;
            match wscr::comic::find_one(&conn, &key).await? {
                Some(comic) => println!("{}", serde_json::to_string_pretty(&comic)?),
                None => anyhow::bail!("no record for {key}"),
            }
        }
    }

    Ok(())
}
