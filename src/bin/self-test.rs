/*!
 * helperbox self-test program
 *
 * Runs every helper family against a set of known input/output vectors and
 * reports PASS/FAIL per check. The vectors are embedded; a replacement JSON
 * file with the same layout can be passed as the first argument.
 *
 * Usage: self-test [CONFIG.json] [--json]
 *
 * Exits with status 1 when any check fails.
 */

#![warn(clippy::all, clippy::pedantic)]
#![forbid(unsafe_code)]

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use colored::Colorize;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::fs;
use tracing_subscriber::EnvFilter;

use helperbox::{
    add_zero_prefix, array_to_xml, auth, create_sitemap, create_sitemap_index,
    create_sql_values_string, csv_string_to_array, generate_base58_id, get_dates_between_dates,
    get_random_weighted_element, get_response_header, get_timezone_offset, mb_ucfirst,
    parse_cookies, pretty_var_export_hard, pretty_var_export_soft, put_array_to_csv_file,
    quick_sort, remove_directory_recursively, remove_duplicates_from_multi_dimensional_array,
    seconds_to_time, str_repeat_with_separator, tab_delimited_string_to_array, RecordedResponse,
    ServerRequest, SitemapEntry, SitemapUrl, TimeBreakdown, DEFAULT_BASE58_LENGTH,
};

/* Console output */
struct Logger;

impl Logger {
    fn section(title: &str) {
        println!("\n{}", title.blue().bold());
    }

    fn check(name: &str, passed: bool, detail: Option<&str>) {
        if passed {
            println!("  {} {}", "✅ PASS".green(), name);
        } else {
            println!("  {} {}", "❌ FAIL".red(), name);
            if let Some(detail) = detail {
                println!("    {}", detail.red());
            }
        }
    }
}

/* Embedded check vectors */
const DEFAULT_CONFIG_JSON: &str = r##"{
  "checks": {
    "strings": {
      "zeroPrefix": [
        {"value": "0", "order": 1, "expected": "00"},
        {"value": "11", "order": 1, "expected": "11"},
        {"value": "11", "order": 3, "expected": "0011"},
        {"value": "100", "order": 2, "expected": "100"}
      ],
      "ucfirst": [["hello", "Hello"], ["привет", "Привет"], ["123", "123"]],
      "repeat": [
        {"unit": "a", "count": 2, "separator": "|", "expected": "a|a"},
        {"unit": "a", "count": 0, "separator": "|", "expected": ""}
      ],
      "varExport": {
        "input": {"a": 1, "b": {"c": 3}},
        "soft": "array (\n  'a' => 1,\n  'b' => array (\n    'c' => 3,\n  ),\n)",
        "hard": "[\n  'a' => 1,\n  'b' => [\n    'c' => 3,\n  ],\n]"
      }
    },
    "arrays": {
      "quickSort": {
        "input": [43, 21, 2, 1, 9, 24, 2, 99, 23, 8, 7, 114, 92, 5],
        "expected": [1, 2, 2, 5, 7, 8, 9, 21, 23, 24, 43, 92, 99, 114]
      },
      "duplicates": {
        "input": [{"a": 1, "b": 2}, {"a": 3, "b": 4}, {"a": 1, "b": 2}],
        "expected": [{"a": 1, "b": 2}, {"a": 3, "b": 4}]
      },
      "sqlValues": {"input": [1, "one", "\""], "expected": "(1, \"one\", \"\\\"\")"}
    },
    "dates": {
      "between": [
        {"start": "1969-12-31", "end": "1970-01-02", "format": "Y-m-d",
         "expected": ["1969-12-31", "1970-01-01", "1970-01-02"]},
        {"start": "12/31/1969", "end": "01/02/1970", "format": "m/d/Y",
         "expected": ["12/31/1969", "01/01/1970", "01/02/1970"]}
      ],
      "secondsToTime": {"seconds": 90061, "expected": {"days": 1, "hours": 1, "minutes": 1, "seconds": 1}},
      "timezoneOffsets": {"Europe/Minsk": 10800, "Asia/Tokyo": 32400, "UTC": 0}
    },
    "tabular": {
      "csv": {
        "input": "\n    First name,Last name\n    John,Doe\n    \"Richard\", \"Roe\"\n",
        "removeFirstLine": true,
        "expected": [["John", "Doe"], ["Richard", "Roe"]]
      },
      "tab": {"input": "a\tb\tc\nd\tf\tg", "expected": [["a", "b", "c"], ["d", "f", "g"]]}
    },
    "feeds": {
      "sitemap": {
        "items": [{"loc": "https://shiftcalendar.online", "lastmod": "1970-01-01", "changefreq": "always", "priority": "0.0"}],
        "expected": "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"><url><loc>https://shiftcalendar.online</loc><lastmod>1970-01-01</lastmod><changefreq>always</changefreq><priority>0.0</priority></url></urlset>"
      },
      "sitemapIndex": {
        "items": [{"loc": "https://shiftcalendar.online/sitemap.xml", "lastmod": "1970-01-01"}],
        "expected": "<sitemap><loc>https://shiftcalendar.online/sitemap.xml</loc><lastmod>1970-01-01</lastmod></sitemap>"
      },
      "xml": {
        "input": [{"a": 1, "b": 1}, {"a": 2, "b": 2}],
        "expected": "<?xml version=\"1.0\"?>\n<data value=\"\"><item0><a>1</a><b>1</b></item0><item1><a>2</a><b>2</b></item1></data>\n"
      }
    },
    "web": {
      "cookies": {"header": " c=3; b=2; a=1 ", "expected": {"a": "1", "b": "2", "c": "3"}},
      "responseHeader": {
        "name": "content-type",
        "lines": ["HTTP/1.1 200 OK", "Content-Type: text/html; charset=utf-8 "],
        "expected": "text/html; charset=utf-8"
      },
      "credentials": {"root": "toor"}
    },
    "random": {"base58Lengths": [8, 10, 32]}
  }
}"##;

struct ConfigLoader {
    config: Value,
}

impl ConfigLoader {
    fn new(config_path: Option<&str>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Cannot open config file: {path}"))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse JSON configuration: {path}"))?
            }
            None => serde_json::from_str(DEFAULT_CONFIG_JSON)
                .context("Failed to parse embedded configuration")?,
        };

        Ok(Self { config })
    }

    fn get_value(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.config, |current, key| current.get(key))
    }

    fn section<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self
            .get_value(path)
            .ok_or_else(|| anyhow!("Missing configuration section: {path}"))?;
        serde_json::from_value(value.clone())
            .with_context(|| format!("Malformed configuration section: {path}"))
    }
}

/* Vector shapes */
#[derive(Debug, Deserialize)]
struct ZeroPrefixCase {
    value: String,
    order: u32,
    expected: String,
}

#[derive(Debug, Deserialize)]
struct RepeatCase {
    unit: String,
    count: usize,
    separator: String,
    expected: String,
}

#[derive(Debug, Deserialize)]
struct VarExportCase {
    input: Value,
    soft: String,
    hard: String,
}

#[derive(Debug, Deserialize)]
struct Expectation<I, E> {
    input: I,
    expected: E,
}

#[derive(Debug, Deserialize)]
struct DateRangeCase {
    start: String,
    end: String,
    format: String,
    expected: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SecondsCase {
    seconds: u64,
    expected: TimeBreakdown,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvCase {
    input: String,
    remove_first_line: bool,
    expected: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SitemapCase<T> {
    items: Vec<T>,
    expected: String,
}

#[derive(Debug, Deserialize)]
struct CookieCase {
    header: String,
    expected: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ResponseHeaderCase {
    name: String,
    lines: Vec<String>,
    expected: String,
}

/* Results */
#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct Report {
    #[serde(rename = "crate")]
    crate_name: String,
    version: String,
    timestamp: String,
    passed: usize,
    total: usize,
    checks: Vec<CheckResult>,
}

struct SelfTestRunner {
    config: ConfigLoader,
    json_output: bool,
    results: Vec<CheckResult>,
}

impl SelfTestRunner {
    fn new(config_path: Option<&str>, json_output: bool) -> Result<Self> {
        Ok(Self {
            config: ConfigLoader::new(config_path)?,
            json_output,
            results: Vec::new(),
        })
    }

    fn section(&self, title: &str) {
        if !self.json_output {
            Logger::section(title);
        }
    }

    fn record(&mut self, name: &str, passed: bool, error: Option<String>) {
        if !self.json_output {
            Logger::check(name, passed, error.as_deref());
        }
        self.results.push(CheckResult {
            name: name.to_string(),
            passed,
            error: if passed { None } else { error },
        });
    }

    fn expect_eq<T: PartialEq + Debug>(&mut self, name: &str, actual: &T, expected: &T) {
        let passed = actual == expected;
        let detail = (!passed).then(|| format!("expected {expected:?}, got {actual:?}"));
        self.record(name, passed, detail);
    }

    fn run_all(&mut self) -> Result<bool> {
        if !self.json_output {
            println!("{}", "═══════════════════════════════════════════".blue());
            println!("{}", format!("    helperbox v{} Self-Test", helperbox::VERSION).blue());
            println!("{}", "═══════════════════════════════════════════".blue());
        }

        self.check_strings()?;
        self.check_arrays()?;
        self.check_dates()?;
        self.check_tabular()?;
        self.check_feeds()?;
        self.check_web()?;
        self.check_random()?;
        self.check_files();

        let passed = self.results.iter().filter(|r| r.passed).count();
        let total = self.results.len();

        if self.json_output {
            let report = Report {
                crate_name: "helperbox".to_string(),
                version: helperbox::VERSION.to_string(),
                timestamp: Utc::now().format("%Y-%m-%dT%H:%M:%S.%3fZ").to_string(),
                passed,
                total,
                checks: std::mem::take(&mut self.results),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialize results")?
            );
        } else {
            self.display_summary(passed, total);
        }

        Ok(passed == total)
    }

    fn check_strings(&mut self) -> Result<()> {
        self.section("1. Strings");

        let cases: Vec<ZeroPrefixCase> = self.config.section("checks.strings.zeroPrefix")?;
        for case in cases {
            let name = format!("add_zero_prefix({:?}, {})", case.value, case.order);
            self.expect_eq(&name, &add_zero_prefix(&case.value, case.order), &case.expected);
        }

        let cases: Vec<(String, String)> = self.config.section("checks.strings.ucfirst")?;
        for (input, expected) in cases {
            self.expect_eq(&format!("mb_ucfirst({input:?})"), &mb_ucfirst(&input), &expected);
        }

        let cases: Vec<RepeatCase> = self.config.section("checks.strings.repeat")?;
        for case in cases {
            let name = format!("str_repeat_with_separator({:?}, {})", case.unit, case.count);
            let actual = str_repeat_with_separator(&case.unit, case.count, &case.separator);
            self.expect_eq(&name, &actual, &case.expected);
        }

        let case: VarExportCase = self.config.section("checks.strings.varExport")?;
        self.expect_eq("pretty_var_export_soft", &pretty_var_export_soft(&case.input), &case.soft);
        self.expect_eq("pretty_var_export_hard", &pretty_var_export_hard(&case.input), &case.hard);
        Ok(())
    }

    fn check_arrays(&mut self) -> Result<()> {
        self.section("2. Arrays");

        let case: Expectation<Vec<i64>, Vec<i64>> = self.config.section("checks.arrays.quickSort")?;
        self.expect_eq("quick_sort", &quick_sort(&case.input), &case.expected);

        let case: Expectation<Vec<Value>, Vec<Value>> =
            self.config.section("checks.arrays.duplicates")?;
        let actual = remove_duplicates_from_multi_dimensional_array(case.input);
        self.expect_eq("remove_duplicates_from_multi_dimensional_array", &actual, &case.expected);

        let case: Expectation<Vec<Value>, String> = self.config.section("checks.arrays.sqlValues")?;
        let actual = create_sql_values_string(&case.input, helperbox::DEFAULT_SQL_QUOTE);
        self.expect_eq("create_sql_values_string", &actual, &case.expected);
        Ok(())
    }

    fn check_dates(&mut self) -> Result<()> {
        self.section("3. Dates");

        let cases: Vec<DateRangeCase> = self.config.section("checks.dates.between")?;
        for case in cases {
            let name = format!("get_dates_between_dates({}, {})", case.start, case.end);
            match get_dates_between_dates(&case.start, &case.end, &case.format) {
                Ok(actual) => self.expect_eq(&name, &actual, &case.expected),
                Err(e) => self.record(&name, false, Some(e.to_string())),
            }
        }

        let case: SecondsCase = self.config.section("checks.dates.secondsToTime")?;
        let name = format!("seconds_to_time({})", case.seconds);
        self.expect_eq(&name, &seconds_to_time(case.seconds), &case.expected);

        let offsets: BTreeMap<String, i32> = self.config.section("checks.dates.timezoneOffsets")?;
        for (zone, expected) in offsets {
            let name = format!("get_timezone_offset({zone})");
            match get_timezone_offset(&zone) {
                Ok(actual) => self.expect_eq(&name, &actual, &expected),
                Err(e) => self.record(&name, false, Some(e.to_string())),
            }
        }
        Ok(())
    }

    fn check_tabular(&mut self) -> Result<()> {
        self.section("4. Tables");

        let case: CsvCase = self.config.section("checks.tabular.csv")?;
        match csv_string_to_array(&case.input, case.remove_first_line) {
            Ok(actual) => self.expect_eq("csv_string_to_array", &actual, &case.expected),
            Err(e) => self.record("csv_string_to_array", false, Some(e.to_string())),
        }

        let case: Expectation<String, Vec<Vec<String>>> = self.config.section("checks.tabular.tab")?;
        let actual = tab_delimited_string_to_array(&case.input);
        self.expect_eq("tab_delimited_string_to_array", &actual, &case.expected);
        Ok(())
    }

    fn check_feeds(&mut self) -> Result<()> {
        self.section("5. Feeds");

        let case: SitemapCase<SitemapUrl> = self.config.section("checks.feeds.sitemap")?;
        self.expect_eq("create_sitemap", &create_sitemap(&case.items, true), &case.expected);

        let case: SitemapCase<SitemapEntry> = self.config.section("checks.feeds.sitemapIndex")?;
        let actual = create_sitemap_index(&case.items, false);
        self.expect_eq("create_sitemap_index (unwrapped)", &actual, &case.expected);

        let case: Expectation<Value, String> = self.config.section("checks.feeds.xml")?;
        self.expect_eq("array_to_xml", &array_to_xml(&case.input), &case.expected);
        Ok(())
    }

    fn check_web(&mut self) -> Result<()> {
        self.section("6. Web");

        let case: CookieCase = self.config.section("checks.web.cookies")?;
        self.expect_eq("parse_cookies", &parse_cookies(&case.header), &case.expected);

        let case: ResponseHeaderCase = self.config.section("checks.web.responseHeader")?;
        let actual = get_response_header(&case.name, &case.lines);
        self.expect_eq("get_response_header", &actual, &case.expected);

        let credentials: HashMap<String, String> = self.config.section("checks.web.credentials")?;
        let accepted = credentials.iter().all(|(user, password)| {
            let request =
                ServerRequest::new("https", "localhost", 443, "/").with_basic_auth(user, password);
            auth(&request, &mut RecordedResponse::default(), &credentials)
        });
        self.expect_eq("auth (valid credentials)", &accepted, &true);

        let mut response = RecordedResponse::default();
        let anonymous = ServerRequest::new("https", "localhost", 443, "/");
        let rejected = !auth(&anonymous, &mut response, &credentials)
            && response.status == Some(http::StatusCode::UNAUTHORIZED);
        self.expect_eq("auth (challenge on missing credentials)", &rejected, &true);
        Ok(())
    }

    fn check_random(&mut self) -> Result<()> {
        self.section("7. Random");

        let lengths: Vec<usize> = self.config.section("checks.random.base58Lengths")?;
        for length in lengths {
            let id = generate_base58_id(length);
            let valid = id.len() == length
                && id.bytes().all(|b| helperbox::random::BASE58_ALPHABET.contains(&b));
            self.expect_eq(&format!("generate_base58_id({length})"), &valid, &true);
        }
        self.expect_eq(
            "generate_base58_id default length",
            &generate_base58_id(DEFAULT_BASE58_LENGTH).len(),
            &8,
        );

        let weights = [("never", 0_u64), ("always", 7), ("also never", 0)];
        let always = (0..200).all(|_| get_random_weighted_element(&weights) == Some(&"always"));
        self.expect_eq("get_random_weighted_element (zero weights)", &always, &true);
        Ok(())
    }

    fn check_files(&mut self) {
        self.section("8. Files");

        let scratch = std::env::temp_dir()
            .join(format!("helperbox-self-test-{}", generate_base58_id(12)));
        let csv_path = scratch.join("people.csv");
        let rows = [["John", "Doe"], ["Richard", "Roe"]];

        let written =
            fs::create_dir_all(&scratch).is_ok() && put_array_to_csv_file(&csv_path, &rows);
        let read_back = fs::read_to_string(&csv_path).unwrap_or_default();
        self.expect_eq(
            "put_array_to_csv_file",
            &(written, read_back.as_str()),
            &(true, "John,Doe\nRichard,Roe\n"),
        );

        match remove_directory_recursively(&scratch) {
            Ok(removed) => self.expect_eq(
                "remove_directory_recursively",
                &(removed, scratch.exists()),
                &(true, false),
            ),
            Err(e) => self.record("remove_directory_recursively", false, Some(e.to_string())),
        }
    }

    fn display_summary(&self, passed: usize, total: usize) {
        println!("\n{}", "═══════════════════════════════════════════".blue());
        println!("{}", "            TEST SUMMARY REPORT".blue());
        println!("{}", "═══════════════════════════════════════════".blue());

        let line = format!("Checks Passed: {passed}/{total}");
        if passed == total {
            println!("{}", line.green());
        } else {
            println!("{}", line.red());
            println!("\n{}", "Failed Checks:".red());
            for result in self.results.iter().filter(|r| !r.passed) {
                println!("  - {}", result.name);
            }
        }
        println!("{}", "═══════════════════════════════════════════".blue());
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let json_output = args.iter().any(|arg| arg == "--json");
    let config_path = args.iter().find(|arg| !arg.starts_with("--")).map(String::as_str);

    let mut runner = SelfTestRunner::new(config_path, json_output)
        .context("Failed to initialize test runner")?;
    let all_passed = runner.run_all().context("Test execution failed")?;

    if !all_passed {
        std::process::exit(1);
    }
    Ok(())
}
