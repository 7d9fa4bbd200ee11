//! helperbox
//!
//! Stateless helper functions for everyday web back-end chores: reshaping
//! keyed data, formatting strings and dates, building RSS feeds and sitemaps,
//! handling cookies and basic authentication, and moving files, CSV tables
//! and zip archives around.
//!
//! # Features
//!
//! - **Keyed data**: prefix/postfix keys, insert after a key, filter, dedupe and sort rows
//! - **Strings**: zero padding, Unicode-aware capitalization, `array (...)` style dumps
//! - **Dates**: day ranges, second breakdowns, DST-aware zone offsets
//! - **Feeds**: RSS 2.0, sitemaps and sitemap indexes, generic XML trees
//! - **Web**: basic auth, XHR detection, cookie parsing and expiry over injected request/response traits
//! - **Files**: directory listing, recursive removal, CSV files, `data:` URIs, zip extraction
//! - **Random**: Base58 identifiers and weighted selection
//!
//! # Quick Start
//!
//! ```rust
//! use helperbox::array::insert_after_key;
//! use helperbox::feed::{create_sitemap, SitemapUrl};
//! use helperbox::strings::add_zero_prefix;
//! use serde_json::json;
//!
//! let map = json!({"a": 1, "c": 3});
//! let map = insert_after_key(map.as_object().unwrap(), "a", "b", json!(2));
//! assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
//!
//! assert_eq!(add_zero_prefix("7", 2), "007");
//!
//! let sitemap = create_sitemap(&[SitemapUrl::new("https://example.com")], false);
//! assert_eq!(sitemap, "<url><loc>https://example.com</loc></url>");
//! ```

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod error;
pub mod types;

// Data shaping
pub mod array;
pub mod strings;
pub mod tabular;
pub mod datetime;

// Document generation
pub mod xml;
pub mod feed;

// Environment
pub mod web;
pub mod fs;
pub mod random;

// Re-exports for convenience
pub use error::{HelperError, Result};
pub use types::{Map, Row};

pub use array::{
    add_postfix_to_array_keys, add_prefix_to_array_keys, create_sql_values_string,
    filter_list_of_arrays_by_key_value_pairs, insert_after_key, quick_sort, range_generator,
    remove_duplicates_from_multi_dimensional_array, remove_prefix_from_array_keys, sort_by_date,
    RangeGenerator, DEFAULT_SQL_QUOTE,
};
pub use datetime::{
    get_dates_between_dates, get_normalized_day_of_week, get_timezone_offset, seconds_to_time,
    TimeBreakdown, DEFAULT_DATE_FORMAT,
};
pub use feed::{create_rss, create_sitemap, create_sitemap_index, SitemapEntry, SitemapUrl};
pub use fs::{
    get_base64_image, get_files_in_directory, remove_directory_recursively, unzip, ListingOptions,
};
pub use random::{generate_base58_id, get_random_weighted_element, DEFAULT_BASE58_LENGTH};
pub use strings::{
    add_zero_prefix, get_class_name_from_object, get_class_name_from_string, mb_ucfirst,
    pretty_var_export_hard, pretty_var_export_soft, str_repeat_with_separator, var_export,
    DEFAULT_ZERO_PREFIX_ORDER,
};
pub use tabular::{csv_string_to_array, put_array_to_csv_file, tab_delimited_string_to_array};
pub use web::{
    auth, clear_all_cookies, get_full_url, get_response_header, is_ajax, parse_cookies,
    remove_cookie, RecordedResponse, RequestContext, ResponseSink, ServerRequest, SetCookie,
};
pub use xml::{add_children_to_element, array_to_xml, is_valid_name, XmlElement, XmlValue};
