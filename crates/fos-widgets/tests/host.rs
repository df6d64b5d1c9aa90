//! Host wiring: id generators, configuration and input routing

mod common;

use common::{PAGE, init_tracing};
use fos_widgets::{HostConfig, Key, KeyEvent, TrapStrategy, WidgetHost};

fn page() -> fos_dom::Document {
    init_tracing();
    fos_html::parse(&PAGE.replace("ACC_FLAGS", "").replace("DIALOG_FLAGS", "")).unwrap()
}

#[test]
fn test_injected_id_generators() {
    let mut next: u64 = 41;
    let mut host = WidgetHost::with_id_generators(
        page(),
        HostConfig::default(),
        Box::new(move || {
            next += 1;
            next
        }),
        Box::new(|| 7u64),
    );
    let acc = host.element("acc").unwrap();
    let settings = host.element("settings").unwrap();
    let accordion = host.enhance_accordion(acc, None).unwrap();
    let dialog = host.enhance_dialog(settings, None).unwrap();

    let tree = host.document().tree();
    let panel = host.accordion(accordion).unwrap().pairs()[1].panel;
    assert_eq!(tree.get_attribute(panel, "id"), Some("fos-accordion-42-panel-1"));
    let surface = host.dialog(dialog).unwrap().surface();
    assert_eq!(tree.get_attribute(surface, "aria-labelledby"), Some("fos-dialog-7-title"));
}

#[test]
fn test_generated_ids_stay_unique() {
    // Both accordions draw the same instance number
    let html = r#"
        <div id="a"><div role="tab">A</div><div role="tabpanel">a</div></div>
        <div id="b"><div role="tab">B</div><div role="tabpanel">b</div></div>"#;
    let mut host = WidgetHost::with_id_generators(
        fos_html::parse(html).unwrap(),
        HostConfig::default(),
        Box::new(|| 1u64),
        Box::new(|| 1u64),
    );
    let a = host.element("a").unwrap();
    let b = host.element("b").unwrap();
    let a = host.enhance_accordion(a, None).unwrap();
    let b = host.enhance_accordion(b, None).unwrap();

    let tree = host.document().tree();
    let first = host.accordion(a).unwrap().pairs()[0].heading;
    let second = host.accordion(b).unwrap().pairs()[0].heading;
    assert_eq!(tree.get_attribute(first, "id"), Some("fos-accordion-1-heading-0"));
    assert_eq!(tree.get_attribute(second, "id"), Some("fos-accordion-1-heading-0-2"));
}

#[test]
fn test_host_default_trap() {
    let config = HostConfig {
        id_prefix: "ui".into(),
        default_trap: TrapStrategy::TabOrder,
    };
    let mut host = WidgetHost::with_config(page(), config);
    let settings = host.element("settings").unwrap();
    let dialog = host.enhance_dialog(settings, None).unwrap();

    assert_eq!(host.dialog(dialog).unwrap().config().trap, TrapStrategy::TabOrder);
    let surface = host.dialog(dialog).unwrap().surface();
    assert_eq!(
        host.document().tree().get_attribute(surface, "aria-labelledby"),
        Some("ui-dialog-1-title")
    );

    host.open_dialog(dialog);
    assert_eq!(host.pending_tasks(), 1);
}

#[test]
fn test_tab_without_widgets_walks_document() {
    let mut host = WidgetHost::new(page());
    let opener = host.element("opener").unwrap();
    let link = host.element("link").unwrap();

    // Nothing focused: Tab starts at the first tabbable element
    host.key_down(Key::Tab);
    assert_eq!(host.document().active_element(), opener);
    host.key_down(Key::Tab);
    assert_eq!(host.document().active_element(), link);
}

#[test]
fn test_shift_tab_without_focus_wraps_to_last() {
    let mut host = WidgetHost::new(page());
    let save = host.element("save").unwrap();
    let opener = host.element("opener").unwrap();

    host.key_down(KeyEvent::new(Key::Tab).shift());
    assert_eq!(host.document().active_element(), save);
    host.key_down(Key::Tab);
    assert_eq!(host.document().active_element(), opener);
}

#[test]
fn test_inert_target_ignored() {
    let mut host = WidgetHost::new(page());
    let legal = host.element("legal").unwrap();
    assert!(!host.pointer_down(legal).handled);
    assert!(!host.key_down_on(legal, Key::Enter).handled);
}
