use core::time::Duration;
use std::sync::LazyLock;

use reqwest::Client;
use scraper::{Html, Selector};

use crate::comic::{Comic, UpdateOutcome, reconcile};
use crate::error::{Error, Result};
use crate::extract;
use crate::source::identify;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

pub fn basic() -> reqwest::Result<Client> {
    Client::builder()
        .connect_timeout(const { Duration::from_secs(8) })
        .timeout(const { Duration::from_secs(30) })
        .user_agent(USER_AGENT)
        .build()
}

static SEL_PAGE_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").unwrap());

/// Fetch a comic page and build the candidate record. Nothing is persisted
/// here.
pub async fn fetch_comic(client: &Client, url: &str) -> Result<Comic> {
    let body = fetch(client, url).await?;
    let page = Html::parse_document(&body);
    parse_comic(url, &page)
}

async fn fetch(client: &Client, url: &str) -> Result<String> {
    let wrap = |source| Error::Fetch {
        url: url.to_owned(),
        source,
    };

    let response = client.get(url).send().await.map_err(wrap)?;
    let response = response.error_for_status().map_err(wrap)?;
    response.text().await.map_err(wrap)
}

/// Candidate record from an already-parsed page. Rules that produce no
/// explicit title fall back to the page's `<title>` element.
pub fn parse_comic(url: &str, page: &Html) -> Result<Comic> {
    let key = identify(url)?;
    let raw = extract::extract(&key, page)?;

    let title = match raw.title {
        Some(title) => title,
        None => page
            .select(&SEL_PAGE_TITLE)
            .next()
            .map(|el| el.text().map(str::trim).collect::<String>())
            .filter(|title| !title.is_empty())
            .ok_or_else(|| Error::Parse {
                key: key.clone(),
                what: "title element",
            })?,
    };

    Ok(Comic {
        source: key,
        title,
        url: raw.url,
        subtitle: raw.subtitle,
    })
}

/// One full poll round-trip: fetch, extract, reconcile against the stored
/// record.
pub async fn poll_and_update(
    http: &Client,
    db: &tokio_postgres::Client,
    url: &str,
) -> Result<UpdateOutcome> {
    let candidate = fetch_comic(http, url).await?;
    reconcile(db, candidate).await
}
