use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::{Error, Result};

/// What a site rule pulls out of a page. `title` is only set by rules whose
/// site carries a better title than the page's `<title>` element; callers
/// fall back to the latter otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExtract {
    pub title: Option<String>,
    pub url: String,
    pub subtitle: String,
}

type Rule = fn(&Html) -> Result<RawExtract>;

/// One entry per supported site, keyed by source key. Adding a site means
/// adding a rule function and one row here.
static REGISTRY: &[(&str, Rule)] = &[
    ("abstrusegoose", abstrusegoose),
    ("girlgeniusonline", girlgeniusonline),
    ("smbc-comics", smbc_comics),
    ("xkcd", xkcd),
];

pub fn extract(key: &str, page: &Html) -> Result<RawExtract> {
    match REGISTRY.iter().find(|(k, _)| *k == key) {
        Some((_, rule)) => rule(page),
        None => Err(Error::UnsupportedSource(key.into())),
    }
}

fn missing(key: &'static str, what: &'static str) -> Error {
    Error::Parse {
        key: key.into(),
        what,
    }
}

/// Sites serve the strip image as absolute, scheme-relative or root-relative
/// URLs; stored records must always be absolute.
fn absolutize(host: &str, src: &str) -> String {
    if src.starts_with("http://") || src.starts_with("https://") {
        src.to_owned()
    } else if let Some(rest) = src.strip_prefix("//") {
        format!("https://{rest}")
    } else if let Some(rest) = src.strip_prefix('/') {
        format!("https://{host}/{rest}")
    } else {
        format!("https://{host}/{src}")
    }
}

fn nth_child(el: ElementRef<'_>, n: usize) -> Option<ElementRef<'_>> {
    el.child_elements().nth(n)
}

fn collect_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}

static SEL_XKCD_CTITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#ctitle").unwrap());
static SEL_XKCD_IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#comic > img").unwrap());

// https://xkcd.com/
fn xkcd(page: &Html) -> Result<RawExtract> {
    const KEY: &str = "xkcd";

    let img = page
        .select(&SEL_XKCD_IMG)
        .next()
        .ok_or_else(|| missing(KEY, "#comic img"))?;
    let src = img.attr("src").ok_or_else(|| missing(KEY, "img src"))?;
    let subtitle = img
        .attr("title")
        .ok_or_else(|| missing(KEY, "img title"))?;

    Ok(RawExtract {
        title: page.select(&SEL_XKCD_CTITLE).next().map(collect_text),
        url: absolutize("xkcd.com", src),
        subtitle: subtitle.to_owned(),
    })
}

static SEL_GG_DATE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#datestring").unwrap());
static SEL_GG_BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#comicbody").unwrap());

// http://www.girlgeniusonline.com/comic
// No usable ids on the strip itself; everything hangs off fixed positions
// under #comicbody.
fn girlgeniusonline(page: &Html) -> Result<RawExtract> {
    const KEY: &str = "girlgeniusonline";

    let body = page
        .select(&SEL_GG_BODY)
        .next()
        .ok_or_else(|| missing(KEY, "#comicbody"))?;
    let src = nth_child(body, 1)
        .and_then(|img| img.attr("src"))
        .ok_or_else(|| missing(KEY, "strip image under #comicbody"))?;
    let caption = [2usize, 0, 2, 0, 0]
        .iter()
        .try_fold(body, |el, &n| nth_child(el, n))
        .ok_or_else(|| missing(KEY, "caption block under #comicbody"))?;

    Ok(RawExtract {
        title: page.select(&SEL_GG_DATE).next().map(collect_text),
        url: absolutize("www.girlgeniusonline.com", src),
        subtitle: collect_text(caption),
    })
}

static SEL_SMBC_IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#cc-comic").unwrap());

// https://www.smbc-comics.com/
fn smbc_comics(page: &Html) -> Result<RawExtract> {
    const KEY: &str = "smbc-comics";

    let img = page
        .select(&SEL_SMBC_IMG)
        .next()
        .ok_or_else(|| missing(KEY, "#cc-comic"))?;
    let src = img.attr("src").ok_or_else(|| missing(KEY, "img src"))?;
    let subtitle = img
        .attr("title")
        .ok_or_else(|| missing(KEY, "img title"))?;

    Ok(RawExtract {
        title: None,
        url: absolutize("www.smbc-comics.com", src),
        subtitle: subtitle.to_owned(),
    })
}

static SEL_AG_IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[title]").unwrap());

// https://abstrusegoose.com/
// The strip is the only captioned image on the page.
fn abstrusegoose(page: &Html) -> Result<RawExtract> {
    const KEY: &str = "abstrusegoose";

    let img = page
        .select(&SEL_AG_IMG)
        .next()
        .ok_or_else(|| missing(KEY, "captioned img"))?;
    let src = img.attr("src").ok_or_else(|| missing(KEY, "img src"))?;
    let subtitle = img
        .attr("title")
        .ok_or_else(|| missing(KEY, "img title"))?;

    Ok(RawExtract {
        title: None,
        url: absolutize("abstrusegoose.com", src),
        subtitle: subtitle.to_owned(),
    })
}
