//! Line-oriented console front-end
//!
//! Stands in for the browser page: stdin lines become UI gestures. Popups,
//! camera moves, the detail panel and the last-updated text are printed to
//! stdout, notices to stderr.

use anyhow::{bail, Result};
use atlas_app::{DetailPanel, MarkerSummary, Notice, Notifier, StatusReport};
use atlas_core::{ActiveFilterSet, CountryCollection, LngLat, Severity};
use atlas_render::{Cursor, LayerStack, MapRenderer, Popup};
use tracing::debug;

pub const HELP: &str = "\
commands:
  click <id|name>          open the popup and detail panel for a marker
  hover [id]               enter a marker, or leave with no id
  filter <bucket> on|off   toggle a severity bucket (low, moderate, high, veryHigh, severe)
  search <query>           fly to a country by name
  refresh                  reload the feed
  markers                  list visible markers
  status                   print the current state
  quit                     stop";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Click(String),
    Hover(Option<String>),
    Filter { bucket: Severity, checked: bool },
    Search(String),
    Refresh,
    Markers,
    Status,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "click" => {
            if rest.is_empty() {
                bail!("usage: click <id|name>");
            }
            Command::Click(rest.to_string())
        }
        "hover" => Command::Hover((!rest.is_empty()).then(|| rest.to_string())),
        "filter" => {
            let mut parts = rest.split_whitespace();
            let (Some(bucket), Some(state), None) = (parts.next(), parts.next(), parts.next())
            else {
                bail!("usage: filter <bucket> on|off");
            };
            let bucket = Severity::parse_ignore_case(bucket)?;
            let checked = match state.to_ascii_lowercase().as_str() {
                "on" => true,
                "off" => false,
                other => bail!("expected on or off, got {other:?}"),
            };
            Command::Filter { bucket, checked }
        }
        // The query is passed through untouched, blank included
        "search" => Command::Search(rest.to_string()),
        "refresh" => Command::Refresh,
        "markers" | "ls" => Command::Markers,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command {other:?}, try help"),
    };
    Ok(Some(command))
}

/// Resolve a click target against visible markers: exact id first, then name
pub fn resolve_marker<'a>(
    markers: &'a [MarkerSummary],
    target: &str,
) -> Option<&'a MarkerSummary> {
    markers
        .iter()
        .find(|m| m.id == target)
        .or_else(|| markers.iter().find(|m| m.name.eq_ignore_ascii_case(target)))
}

/// [`LayerStack`] that echoes what a map would show
pub struct ConsoleMap {
    stack: LayerStack,
}

impl ConsoleMap {
    pub fn new(stack: LayerStack) -> Self {
        Self { stack }
    }

    pub fn stack(&self) -> &LayerStack {
        &self.stack
    }
}

impl MapRenderer for ConsoleMap {
    fn set_data(&mut self, collection: &CountryCollection) {
        self.stack.set_data(collection);
        println!("map: {} markers loaded", collection.len());
    }

    fn apply_filter(&mut self, filters: &ActiveFilterSet) {
        self.stack.apply_filter(filters);
        debug!("{} markers visible", self.stack.rendered_markers().len());
    }

    fn fly_to(&mut self, target: LngLat, zoom: f64) {
        self.stack.fly_to(target, zoom);
        // No frame loop here, so land immediately
        self.stack.finish_flight();
        println!(
            "map: centered on {:.2}, {:.2} at zoom {:.1}",
            target.lat, target.lon, zoom
        );
    }

    fn show_popup(&mut self, popup: Popup) {
        println!("{}", render_popup(&popup));
        self.stack.show_popup(popup);
    }

    fn close_popup(&mut self) {
        self.stack.close_popup();
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.stack.set_cursor(cursor);
    }

    fn has_layers(&self) -> bool {
        self.stack.has_layers()
    }
}

/// Notices go to stderr, detail panel and last-updated text to stdout
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notice: Notice) {
        eprintln!("! {notice}");
    }

    fn show_detail(&mut self, detail: &DetailPanel) {
        println!("detail:\n{}", render_detail(detail));
    }

    fn show_last_updated(&mut self, label: &str) {
        println!("{label}");
    }
}

pub fn render_popup(popup: &Popup) -> String {
    let mut out = match &popup.flag {
        Some(flag) => format!("[{}] ({flag})", popup.title),
        None => format!("[{}]", popup.title),
    };
    for (label, value) in &popup.rows {
        out.push_str(&format!("\n  {label}: {value}"));
    }
    out
}

pub fn render_detail(detail: &DetailPanel) -> String {
    [
        ("Country", &detail.name),
        ("Lat", &detail.lat),
        ("Lon", &detail.lon),
        ("Total cases", &detail.cases),
        ("Cases / 1M", &detail.cpm),
        ("Active", &detail.active),
        ("Recovered", &detail.recovered),
        ("Deaths", &detail.deaths),
        ("Updated", &detail.updated),
    ]
    .iter()
    .map(|(label, value)| format!("  {label}: {value}"))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn render_status(status: &StatusReport) -> String {
    let filters: Vec<&str> = status.filters.iter().map(|b| b.as_str()).collect();
    let mut out = format!(
        "loaded: {}{}\nmarkers: {} visible of {} ({} records)\nfilters: {}",
        status.loaded,
        if status.loading { " (loading)" } else { "" },
        status.visible,
        status.features,
        status.records,
        if filters.is_empty() { "none".to_string() } else { filters.join(", ") },
    );
    if let Some(label) = &status.last_updated {
        out.push('\n');
        out.push_str(label);
    }
    match &status.detail {
        Some(detail) => {
            out.push_str("\ndetail:\n");
            out.push_str(&render_detail(detail));
        }
        None => out.push_str("\ndetail: none"),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(id: &str, name: &str) -> MarkerSummary {
        MarkerSummary {
            id: id.to_string(),
            name: name.to_string(),
            severity: Severity::Low,
        }
    }

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse_command("  ").unwrap(), None);
        assert_eq!(parse_command("refresh").unwrap(), Some(Command::Refresh));
        assert_eq!(parse_command("QUIT").unwrap(), Some(Command::Quit));
        assert_eq!(
            parse_command("click 250").unwrap(),
            Some(Command::Click("250".to_string()))
        );
        assert_eq!(
            parse_command("click United Kingdom").unwrap(),
            Some(Command::Click("United Kingdom".to_string()))
        );
        assert!(parse_command("click").is_err());
        assert!(parse_command("fly north").is_err());
    }

    #[test]
    fn test_parse_hover_enter_and_leave() {
        assert_eq!(
            parse_command("hover 276").unwrap(),
            Some(Command::Hover(Some("276".to_string())))
        );
        assert_eq!(parse_command("hover").unwrap(), Some(Command::Hover(None)));
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_command("filter veryhigh off").unwrap(),
            Some(Command::Filter {
                bucket: Severity::VeryHigh,
                checked: false
            })
        );
        assert_eq!(
            parse_command("filter low ON").unwrap(),
            Some(Command::Filter {
                bucket: Severity::Low,
                checked: true
            })
        );
        assert!(parse_command("filter extreme on").is_err());
        assert!(parse_command("filter low maybe").is_err());
        assert!(parse_command("filter low").is_err());
    }

    #[test]
    fn test_search_keeps_query_text() {
        assert_eq!(
            parse_command("search  new zealand ").unwrap(),
            Some(Command::Search("new zealand".to_string()))
        );
        assert_eq!(
            parse_command("search").unwrap(),
            Some(Command::Search(String::new()))
        );
    }

    #[test]
    fn test_resolve_marker_prefers_id() {
        let markers = vec![marker("250", "France"), marker("Kosovo", "Kosovo")];
        assert_eq!(resolve_marker(&markers, "250").unwrap().name, "France");
        assert_eq!(resolve_marker(&markers, "france").unwrap().id, "250");
        assert_eq!(resolve_marker(&markers, "Kosovo").unwrap().id, "Kosovo");
        assert!(resolve_marker(&markers, "Spain").is_none());
    }

    #[test]
    fn test_render_popup() {
        let popup = Popup {
            anchor: LngLat::new(2.0, 46.0),
            title: "France".to_string(),
            flag: None,
            rows: vec![("Total cases".to_string(), "1,000".to_string())],
        };
        assert_eq!(render_popup(&popup), "[France]\n  Total cases: 1,000");
    }
}
