use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::num::{NonZeroU32, NonZeroUsize};

#[derive(Debug, Clone, Deserialize)]
pub struct Http {
  /// **Environment variables**:
  /// - `TALLY_HTTP_IP`
  #[serde(default = "Http::default_ip")]
  pub ip: IpAddr,
  /// **Environment variables**:
  /// - `TALLY_HTTP_PORT`
  #[serde(default = "Http::default_port")]
  pub port: u16,
  /// Amount of HTTP workers. Defaults to the amount of physical
  /// CPU cores.
  ///
  /// **Environment variables**:
  /// - `TALLY_HTTP_WORKERS`
  pub workers: Option<NonZeroUsize>,
}

impl Http {
  const fn default_ip() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
  }

  const fn default_port() -> u16 {
    8000
  }
}

impl Default for Http {
  fn default() -> Self {
    Self {
      ip: Self::default_ip(),
      port: Self::default_port(),
      workers: None,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
  /// Amount of items per page in every listing.
  ///
  /// **Environment variables**:
  /// - `TALLY_PAGINATION_PAGE_SIZE`
  #[serde(default = "Pagination::default_page_size")]
  pub page_size: NonZeroU32,
}

impl Pagination {
  const DEFAULT_PAGE_SIZE: u32 = 10;

  const fn default_page_size() -> NonZeroU32 {
    match NonZeroU32::new(Self::DEFAULT_PAGE_SIZE) {
      Some(n) => n,
      None => panic!("DEFAULT_PAGE_SIZE is accidentally set to 0"),
    }
  }
}

impl Default for Pagination {
  fn default() -> Self {
    Self {
      page_size: Self::default_page_size(),
    }
  }
}
