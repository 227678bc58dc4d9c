//! Round-trips against a live postgres. Run with `cargo test -- --ignored`
//! once a local server is reachable (same DB_* env knobs as the library).

use compact_str::CompactString;
use tokio_postgres::NoTls;
use wscr::comic::{Comic, UpdateOutcome, find_one, reconcile};

async fn connect() -> tokio_postgres::Client {
    let host = option_env!("DB_HOST").unwrap_or("/var/run/postgresql");
    let user = option_env!("DB_USER").unwrap_or("postgres");
    let dbname = option_env!("DB_NAME").unwrap_or("postgres");

    let mut config = tokio_postgres::Config::new();
    config.host_path(host).user(user).dbname(dbname);
    if let Some(password) = option_env!("DB_PASSWORD") {
        config.password(password);
    }

    let (client, connection) = config.connect(NoTls).await.unwrap();
    tokio::spawn(connection);

    wscr::db::init_schema(&client).await.unwrap();
    client
}

fn candidate(source: &str, title: &str) -> Comic {
    Comic {
        source: CompactString::from(source),
        title: title.to_owned(),
        url: format!("https://{source}.example/strips/{title}.png"),
        subtitle: format!("caption for {title}"),
    }
}

async fn wipe(conn: &tokio_postgres::Client, source: &str) {
    conn.execute("delete from webcomic.comics where source = $1", &[&source])
        .await
        .unwrap();
}

async fn count(conn: &tokio_postgres::Client, source: &str) -> i64 {
    conn.query_one(
        "select count(*) from webcomic.comics where source = $1",
        &[&source],
    )
    .await
    .unwrap()
    .get(0)
}

#[tokio::test]
#[ignore = "needs a local postgres"]
async fn initiated_then_up_to_date() {
    let conn = connect().await;
    wipe(&conn, "polltest-idem").await;

    let first = reconcile(&conn, candidate("polltest-idem", "A")).await.unwrap();
    assert!(matches!(first, UpdateOutcome::Initiated(_)));

    let second = reconcile(&conn, candidate("polltest-idem", "A")).await.unwrap();
    assert!(matches!(second, UpdateOutcome::UpToDate));

    assert_eq!(count(&conn, "polltest-idem").await, 1);
}

#[tokio::test]
#[ignore = "needs a local postgres"]
async fn title_change_refreshes_url_and_subtitle() {
    let conn = connect().await;
    wipe(&conn, "polltest-change").await;

    reconcile(&conn, candidate("polltest-change", "A")).await.unwrap();

    let outcome = reconcile(&conn, candidate("polltest-change", "B")).await.unwrap();
    assert!(matches!(outcome, UpdateOutcome::Updated(_)));

    let stored = find_one(&conn, "polltest-change").await.unwrap().unwrap();
    assert_eq!(stored.title, "B");
    assert_eq!(stored.url, "https://polltest-change.example/strips/B.png");
    assert_eq!(stored.subtitle, "caption for B");
    assert_eq!(count(&conn, "polltest-change").await, 1);
}

#[tokio::test]
#[ignore = "needs a local postgres"]
async fn repeated_polls_never_double_insert() {
    let conn = connect().await;
    wipe(&conn, "polltest-repeat").await;

    for _ in 0..5 {
        reconcile(&conn, candidate("polltest-repeat", "A")).await.unwrap();
    }

    assert_eq!(count(&conn, "polltest-repeat").await, 1);
}

#[tokio::test]
#[ignore = "needs a local postgres"]
async fn find_one_misses_cleanly() {
    let conn = connect().await;
    wipe(&conn, "polltest-miss").await;

    assert_eq!(find_one(&conn, "polltest-miss").await.unwrap(), None);
}
