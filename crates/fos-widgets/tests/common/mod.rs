//! Shared fixtures for widget integration tests

#![allow(dead_code)]

use fos_dom::NodeId;
use fos_widgets::WidgetHost;
use tracing_subscriber::EnvFilter;

/// Route widget logs to the test harness (`RUST_LOG=fos_widgets=trace`)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Page with an accordion, a dialog and surrounding content
pub const PAGE: &str = r##"
<!DOCTYPE html>
<html>
<head><title>Widgets</title></head>
<body>
  <button id="opener">Open settings</button>
  <nav id="nav"><a id="link" href="#top">Top</a></nav>
  <div id="acc" ACC_FLAGS>
    <h3 role="tab" id="first-heading"><span id="label">One</span></h3>
    <div role="tabpanel">Panel one <a id="inner" href="#one">more</a></div>
    <h3 role="tab">Two</h3>
    <div role="tabpanel">Panel two</div>
    <h3 role="tab">Three</h3>
    <div role="tabpanel">Panel three</div>
  </div>
  <div id="custom" tabindex="3">Custom stop</div>
  <span id="skip" tabindex="-1">Skipped</span>
  <div id="settings" role="dialog" DIALOG_FLAGS>
    <h2>Settings</h2>
    <input id="name">
    <button id="save">Save</button>
  </div>
  <footer id="foot" inert><button id="legal">Legal</button></footer>
</body>
</html>
"##;

/// Parse `PAGE` with the given container flags
pub fn host(accordion_flags: &str, dialog_flags: &str) -> WidgetHost {
    init_tracing();
    let html = PAGE
        .replace("ACC_FLAGS", accordion_flags)
        .replace("DIALOG_FLAGS", dialog_flags);
    WidgetHost::from_html(&html).expect("fixture parses")
}

pub fn id(host: &WidgetHost, id: &str) -> NodeId {
    host.element(id).unwrap_or_else(|| panic!("no element #{id}"))
}

/// Names of the dispatched events, in order
pub fn event_names(host: &WidgetHost) -> Vec<String> {
    host.document()
        .dispatched_events()
        .iter()
        .map(|e| e.event_type.clone())
        .collect()
}

pub fn count_events(host: &WidgetHost, name: &str) -> usize {
    host.document()
        .dispatched_events()
        .iter()
        .filter(|e| e.event_type == name)
        .count()
}

/// `(node, inert, tabindex)` for every element in the document
pub fn interactive_snapshot(host: &WidgetHost) -> Vec<(NodeId, Option<String>, Option<String>)> {
    let tree = host.document().tree();
    tree.element_descendants(tree.root())
        .map(|n| {
            (
                n,
                tree.get_attribute(n, "inert").map(str::to_string),
                tree.get_attribute(n, "tabindex").map(str::to_string),
            )
        })
        .collect()
}
