use actix_web::{HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use thiserror::Error as ThisError;
use url::Url;

use super::{Error, Result};
use crate::database::{PageRequest, Paginated};
use crate::types;

const PAGE_PARAM: &str = "page";

#[derive(Debug, ThisError)]
#[error("Invalid page.")]
struct InvalidPage;

/// `?page=N` of a listing, 1-based.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
  page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  number: u64,
  size: u64,
}

impl PageQuery {
  /// Anything but a positive integer is an unknown page.
  pub fn resolve(&self, size: NonZeroU32) -> Result<Page> {
    let number = match self.page.as_deref().map(str::trim) {
      None => 1,
      Some(page) => page
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| Error::from_context(types::Error::NotFound, InvalidPage))?,
    };
    Ok(Page {
      number,
      size: u64::from(size.get()),
    })
  }
}

impl Page {
  #[must_use]
  pub fn request(&self) -> PageRequest {
    PageRequest {
      offset: (self.number - 1).saturating_mul(self.size),
      limit: self.size,
    }
  }

  fn last(&self, count: u64) -> u64 {
    count.div_ceil(self.size).max(1)
  }
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub count: u64,
  pub next: Option<String>,
  pub previous: Option<String>,
  pub results: Vec<T>,
}

/// Wraps one page of a listing in the `{count, next, previous,
/// results}` envelope. Pages past the last one are not found, the
/// first page always exists.
pub fn respond<T: Serialize>(
  req: &HttpRequest,
  page: Page,
  data: Paginated<T>,
) -> Result<HttpResponse> {
  let last = page.last(data.count);
  if page.number > last {
    return Err(Error::from_context(types::Error::NotFound, InvalidPage));
  }

  let url = req.full_url();
  let next = (page.number < last).then(|| page_url(&url, Some(page.number + 1)));
  let previous = (page.number > 1).then(|| match page.number - 1 {
    1 => page_url(&url, None),
    n => page_url(&url, Some(n)),
  });

  Ok(HttpResponse::Ok().json(Envelope {
    count: data.count,
    next,
    previous,
    results: data.items,
  }))
}

/// Rewrites the `page` parameter of `url`, dropping it for `None`.
fn page_url(url: &Url, page: Option<u64>) -> String {
  let mut url = url.clone();
  let pairs = url
    .query_pairs()
    .filter(|(key, _)| key != PAGE_PARAM)
    .map(|(key, value)| (key.into_owned(), value.into_owned()))
    .collect::<Vec<_>>();

  if pairs.is_empty() && page.is_none() {
    url.set_query(None);
  } else {
    let mut query = url.query_pairs_mut();
    query.clear().extend_pairs(pairs);
    if let Some(page) = page {
      query.append_pair(PAGE_PARAM, &page.to_string());
    }
  }
  url.to_string()
}
