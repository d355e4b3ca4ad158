//! Drives the whole page the way the event loop does: frames at advancing
//! clock times, scrolling between them.

use std::time::Duration;

use folio_tui::config::SECTION_KEYS;
use folio_tui::form::{Field, SubmitStatus};
use folio_tui::pipeline::{Page, set_terminal_size};
use folio_tui::scene::scene_count;
use folio_tui::style::{is_style_active, style_ref_count};
use folio_tui::{GateState, SiteConfig, SiteHandle, build_site};

fn setup() -> (SiteHandle, Page) {
    set_terminal_size(80, 24);
    let site = build_site(&SiteConfig::default()).unwrap();
    let mut page = Page::new();
    let ticker = site.controller();
    page.add_frame_hook(move |now| ticker.tick(now));
    (site, page)
}

/// Page down one screen per two frames until the end stops moving.
fn scroll_through(page: &mut Page, start: Duration) -> Duration {
    let mut now = start;
    let mut settled = 0;
    for _ in 0..200 {
        let before = page.scroll();
        page.page_by(1);
        for _ in 0..2 {
            now += Duration::from_millis(33);
            page.frame(now);
        }
        if page.scroll() == before && page.scroll() == page.max_scroll() {
            settled += 1;
            if settled == 3 {
                break;
            }
        } else {
            settled = 0;
        }
    }
    now
}

#[test]
fn test_far_sections_wait_until_scrolled_near() {
    let (mut site, mut page) = setup();

    page.frame(Duration::ZERO);
    page.frame(Duration::from_millis(33));

    let contact = site.gate("contact").unwrap();
    assert_eq!(contact.state(), GateState::Observing);
    assert!(!contact.has_triggered());
    assert!(!is_style_active("contact-animations"));
    assert!(is_style_active("hero-animations"));

    site.teardown();
}

#[test]
fn test_scrolling_reveals_every_section_once() {
    let (mut site, mut page) = setup();
    page.frame(Duration::ZERO);

    let now = scroll_through(&mut page, Duration::ZERO);

    for key in &SECTION_KEYS[1..] {
        let gate = site.gate(key).unwrap();
        assert_eq!(gate.state(), GateState::Revealed, "{key}");
        assert!(gate.revealed().get());
    }
    assert_eq!(site.revealed().len(), 8);
    assert_eq!(scene_count(), 9);
    for key in SECTION_KEYS {
        let id = if key == "hero" { "hero-animations".to_string() } else { format!("{key}-animations") };
        assert_eq!(style_ref_count(&id), 1, "{id}");
    }

    // Back to the top: revealed sections stay revealed
    page.scroll_to(0);
    let buffer = page.frame(now + Duration::from_secs(10));
    assert_eq!(site.revealed().len(), 8);
    let rows: Vec<String> = (0..buffer.height()).map(|y| buffer.row_text(y)).collect();
    assert!(rows.iter().any(|row| row.contains("Hei, I'm Alex Doe")), "{rows:#?}");

    site.teardown();
    for key in SECTION_KEYS {
        let id = if key == "hero" { "hero-animations".to_string() } else { format!("{key}-animations") };
        assert!(!is_style_active(&id), "{id}");
    }
    assert_eq!(scene_count(), 0);
}

#[test]
fn test_contact_form_round_trip() {
    let (mut site, mut page) = setup();
    page.frame(Duration::ZERO);
    let now = scroll_through(&mut page, Duration::ZERO);

    let controller = site.controller();
    let form = controller.form();
    form.type_str("Ada");
    form.focus(Field::Email);
    form.type_str("ada@example.com");
    form.focus(Field::Message);
    form.type_str("Loved the scenes.");

    controller.submit(now).unwrap();
    assert_eq!(form.status(), SubmitStatus::Submitting);

    page.frame(now + Duration::from_secs(1));
    assert_eq!(form.status(), SubmitStatus::Submitting);

    page.frame(now + Duration::from_secs(2));
    assert_eq!(form.status(), SubmitStatus::Success);
    assert_eq!(form.value(Field::Name), "");

    page.frame(now + Duration::from_secs(8));
    assert_eq!(form.status(), SubmitStatus::Idle);

    site.teardown();
}
