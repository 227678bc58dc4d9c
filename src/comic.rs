use serde::{Deserialize, Serialize};
use tokio_postgres::Client;

use crate::error::{Error, Result};
use crate::source::SourceKey;

/// The persisted entity, one row per source. Candidates built by the
/// fetch-and-parse pipeline look exactly the same, they are just not saved
/// yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comic {
    pub source: SourceKey,
    pub title: String,
    pub url: String,
    pub subtitle: String,
}

/// Terminal states of a reconcile call. `UpToDate` is the common case under
/// repeated polling and deliberately lives on the success channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Initiated(Comic),
    Updated(Comic),
    UpToDate,
}

// A changed title is the signal that a new strip was published; url and
// subtitle ride along with it and are never refreshed on their own. The
// conditional upsert keeps read-compare-write atomic against concurrent
// pollers: no returned row means the stored title already matched, and
// xmax = 0 separates a fresh insert from an overwrite.
const SQL_RECONCILE: &str = "insert into webcomic.comics (source, title, url, subtitle) \
     values ($1, $2, $3, $4) \
     on conflict (source) do update \
     set title = excluded.title, url = excluded.url, subtitle = excluded.subtitle \
     where comics.title <> excluded.title \
     returning (xmax = 0)";

pub async fn reconcile(conn: &Client, candidate: Comic) -> Result<UpdateOutcome> {
    let stmt = conn
        .prepare(SQL_RECONCILE)
        .await
        .map_err(|e| persistence(&candidate.source, e))?;
    let row = conn
        .query_opt(&stmt, &[
            &&*candidate.source,
            &candidate.title,
            &candidate.url,
            &candidate.subtitle,
        ])
        .await
        .map_err(|e| persistence(&candidate.source, e))?;

    Ok(match row {
        None => UpdateOutcome::UpToDate,
        Some(row) => {
            let inserted: bool = row.try_get(0).map_err(|e| persistence(&candidate.source, e))?;
            if inserted {
                UpdateOutcome::Initiated(candidate)
            } else {
                UpdateOutcome::Updated(candidate)
            }
        }
    })
}

pub async fn find_one(conn: &Client, source: &str) -> Result<Option<Comic>> {
    const SQL: &str = "select source, title, url, subtitle from webcomic.comics where source = $1";

    let wrap = |e| Error::Persistence {
        key: source.into(),
        source: e,
    };

    let stmt = conn.prepare(SQL).await.map_err(wrap)?;
    let Some(row) = conn.query_opt(&stmt, &[&source]).await.map_err(wrap)? else {
        return Ok(None);
    };

    Ok(Some(Comic {
        source: row.try_get::<_, &str>(0).map_err(wrap)?.into(),
        title: row.try_get(1).map_err(wrap)?,
        url: row.try_get(2).map_err(wrap)?,
        subtitle: row.try_get(3).map_err(wrap)?,
    }))
}

fn persistence(key: &SourceKey, source: tokio_postgres::Error) -> Error {
    Error::Persistence {
        key: key.clone(),
        source,
    }
}
