/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const CALENDAR_ROUTE_COMPONENT: &str = "calendar";
pub const CALENDAR_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", CALENDAR_ROUTE_COMPONENT);

pub const ADMIN_ROUTE_COMPONENT: &str = "admin";
pub const ADMIN_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", ADMIN_ROUTE_COMPONENT);

/// Header carrying the acting resident, set by the trusted front proxy.
pub const RESIDENT_ID_HEADER: &str = "x-resident-id";

/// Community offset used when none is configured.
pub const DEFAULT_UTC_OFFSET: &str = "+03:00";

/// Upper bound on instants generated per event and window.
pub const DEFAULT_MAX_OCCURRENCES: u16 = 1000;
