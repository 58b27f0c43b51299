//! Constants for the screening service.

/// Default URL of the OFAC Specially Designated Nationals (SDN) list.
pub const DEFAULT_SDN_URL: &str = "https://www.treasury.gov/ofac/downloads/sdn.xml";

/// Default timeout for downloading the SDN document, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECONDS: u64 = 120;

/// Default interval between automatic refreshes, in hours.
pub const DEFAULT_REFRESH_INTERVAL_HOURS: u64 = 24;

/// Substring of `idType` that marks a crypto wallet identifier.
///
/// OFAC labels these as e.g. "Digital Currency Address - XBT" (XBT = Bitcoin,
/// ETH = Ethereum, XMR = Monero, USDT = Tether, ...). Matching is exact-case
/// substring, mirroring the source labeling.
pub const DIGITAL_CURRENCY_MARKER: &str = "Digital Currency Address";

/// Entity name used when an SDN entry carries no usable name fields.
pub const UNKNOWN_ENTITY: &str = "Unknown Entity";
